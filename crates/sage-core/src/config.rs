//! Configuration types for the index location, generation, and session defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Env var consulted when the config file carries no generation API key.
const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Complete assistant configuration.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct SageConfig {
    /// Corpus index configuration.
    pub index: IndexConfig,
    /// Generation provider configuration.
    pub generation: GenerationConfig,
    /// Session defaults.
    pub session: SessionConfig,
}

/// Where the persisted corpus index lives and how queries are embedded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Directory holding the persisted index artifacts.
    pub dir: PathBuf,
    /// Embedding model used for query-time embeddings.
    pub embedding_model: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("corpus_index"),
            embedding_model: "all-minilm".to_owned(),
        }
    }
}

/// Generation provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Model name used for answer and flashcard generation.
    pub model: String,
    /// API key for the generation provider.
    pub api_key: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_owned(),
            api_key: None,
        }
    }
}

/// Per-session defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Language code responses are requested in.
    pub language: String,
    /// Number of flashcards requested per deck.
    pub flashcard_count: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            language: "en".to_owned(),
            flashcard_count: 5,
        }
    }
}

impl SageConfig {
    /// Get the default config directory path (`~/.sage`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_owned()))?;
        Ok(home.join(".sage"))
    }

    /// Get the default config file path (`~/.sage/config.toml`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from the default location (`~/.sage/config.toml`)
    /// If the config doesn't exist, creates it with default values
    ///
    /// # Errors
    /// Returns an error if the config cannot be read or created
    pub fn load_or_create() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            let config = Self::default();
            config.save_to_file(&config_path)?;
            Ok(config)
        }
    }

    /// Load config from a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|error| Error::Config(format!("Failed to read config: {error}")))?;
        let config: Self = toml::from_str(&contents)
            .map_err(|error| Error::Config(format!("Failed to parse config: {error}")))?;

        tracing::debug!(
            "Loaded config from {:?}: api_key={}",
            path,
            if config.generation.api_key.is_some() {
                "present"
            } else {
                "missing"
            }
        );

        Ok(config)
    }

    /// Save config to a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|error| {
                Error::Config(format!("Failed to create config directory: {error}"))
            })?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|error| Error::Config(format!("Failed to serialize config: {error}")))?;

        let header = "# Sage Configuration File\n\
                      # This file is automatically generated on first run\n\
                      # Edit this file to customize your settings\n\n";

        fs::write(path, format!("{header}{contents}"))
            .map_err(|error| Error::Config(format!("Failed to write config: {error}")))?;

        Ok(())
    }

    /// Get the generation API key, checking config first, then the environment.
    pub fn generation_api_key(&self) -> Option<String> {
        self.generation
            .api_key
            .clone()
            .or_else(|| env::var(ENV_GEMINI_API_KEY).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SageConfig::default();
        assert_eq!(config.index.dir, PathBuf::from("corpus_index"));
        assert_eq!(config.session.language, "en");
        assert_eq!(config.session.flashcard_count, 5);
    }

    #[test]
    fn test_config_round_trip() {
        let config = SageConfig::default();
        let toml_text = toml::to_string_pretty(&config).expect("serialize failed");
        let deserialized: SageConfig = toml::from_str(&toml_text).expect("deserialize failed");
        assert_eq!(config.generation.model, deserialized.generation.model);
    }

    #[test]
    fn test_api_key_loading_from_toml() {
        use std::io::Write as _;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[index]
dir = "corpus_index"
embedding_model = "all-minilm"

[generation]
model = "gemini-2.0-flash"
api_key = "test_key_123"

[session]
language = "tr"
flashcard_count = 8
"#;

        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        temp_file
            .write_all(toml_content.as_bytes())
            .expect("Failed to write to temp file");

        let config = SageConfig::load_from_file(temp_file.path())
            .expect("Failed to load config from temp file");

        assert_eq!(config.generation.api_key, Some("test_key_123".to_owned()));
        assert_eq!(config.session.language, "tr");
        assert_eq!(config.session.flashcard_count, 8);
    }

    #[test]
    fn test_save_and_reload() {
        let temp = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = temp.path().join("nested").join("config.toml");

        let config = SageConfig::default();
        config.save_to_file(&path).expect("Failed to save config");

        let reloaded = SageConfig::load_from_file(&path).expect("Failed to reload config");
        assert_eq!(reloaded.index.embedding_model, config.index.embedding_model);
    }
}
