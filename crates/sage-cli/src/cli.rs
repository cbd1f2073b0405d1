//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

/// Interactive study assistant over a pre-built knowledge corpus.
#[derive(Debug, Parser)]
#[command(name = "sage", version, about)]
pub struct Cli {
    /// Directory holding the corpus index artifacts (overrides config)
    #[arg(long)]
    pub index_dir: Option<PathBuf>,

    /// Language code responses are requested in (overrides config)
    #[arg(long)]
    pub language: Option<String>,

    /// Generation model name (overrides config)
    #[arg(long)]
    pub model: Option<String>,
}
