//! CLI argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure for promptforge
#[derive(Parser, Debug)]
#[command(
    name = "promptforge",
    version,
    about = "Turn an application idea into a detailed code-generation prompt"
)]
pub struct Cli {
    /// Configuration file path (defaults to ./promptforge.toml, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Provider selection shared by every command that talks to a model
#[derive(Args, Debug, Clone, Default)]
pub struct ProviderArgs {
    /// openai, anthropic, gemini or openai-compatible
    #[arg(long)]
    pub provider: Option<String>,

    /// Model identifier, e.g. gpt-4o or claude-3-5-sonnet-latest
    #[arg(long)]
    pub model: Option<String>,

    /// Base URL for OpenAI Compatible servers, e.g. http://localhost:11434/v1
    #[arg(long)]
    pub endpoint: Option<String>,

    /// API key; takes precedence over environment and config file
    #[arg(long)]
    pub api_key: Option<String>,

    /// Read the API key from this environment variable instead of the provider default
    #[arg(long)]
    pub api_key_env: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a prompt from an application description
    Generate {
        /// What the application should do
        #[arg(required = true)]
        description: Vec<String>,

        #[command(flatten)]
        provider: ProviderArgs,

        /// Application category (slug or label), e.g. html-games
        #[arg(long)]
        category: Option<String>,

        /// concise, standard or detailed
        #[arg(long)]
        verbosity: Option<String>,

        /// Wait for the full answer instead of streaming it
        #[arg(long)]
        no_stream: bool,

        /// Also write the generated prompt to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print the history record as JSON (credential masked) after generating
        #[arg(long)]
        record: bool,
    },

    /// Check that the credential and endpoint are accepted by the provider
    Test {
        #[command(flatten)]
        provider: ProviderArgs,
    },

    /// List application categories and verbosity levels
    Categories,
}
