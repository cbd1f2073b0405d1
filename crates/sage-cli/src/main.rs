//! Sage CLI - interactive study assistant over a pre-built knowledge corpus.
//!
//! The binary is presentation only: it wires configuration, the shared
//! corpus index, and the generation provider together, then renders session
//! state while the engine performs every transition.

use anyhow::{Context as _, Result};
use clap::Parser as _;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use sage_core::SageConfig;
use sage_engine::Session;
use sage_providers::GeminiProvider;

mod cli;
mod repl;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Cli::parse();

    let mut config = SageConfig::load_or_create().context("failed to load configuration")?;
    if let Some(dir) = args.index_dir {
        config.index.dir = dir;
    }
    if let Some(language) = args.language {
        config.session.language = language;
    }
    if let Some(model) = args.model {
        config.generation.model = model;
    }

    // A missing or corrupt index is fatal: nothing works without the corpus.
    let index = sage_index::shared_index(&config.index.dir, &config.index.embedding_model)
        .context("cannot load the corpus index")?;

    let generator = GeminiProvider::from_config_or_env(config.generation_api_key())
        .context("cannot configure the generation provider")?
        .with_model(config.generation.model.clone());

    let mut session = Session::new();
    session.set_language(config.session.language.clone());

    repl::run(
        &mut session,
        &index,
        &generator,
        config.session.flashcard_count,
    )
    .await
}
