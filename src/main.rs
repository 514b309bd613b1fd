//! promptforge - application idea to code-generation prompt

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, GenerateOptions};
use promptforge_core::config::{ConfigManager, load_dotenv};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    load_dotenv()?;
    let manager = match &args.config {
        Some(path) => ConfigManager::load_from_file(path)?,
        None => ConfigManager::load()?,
    };
    if let Some(path) = manager.config_path() {
        tracing::debug!(path = %path.display(), "using configuration file");
    }
    let config = manager.into_config();

    match args.command {
        Commands::Generate {
            description,
            provider,
            category,
            verbosity,
            no_stream,
            output,
            record,
        } => {
            let options = GenerateOptions {
                description: description.join(" "),
                provider,
                category,
                verbosity,
                no_stream,
                output,
                record,
            };
            cli::handle_generate_command(&config, options).await?;
        }
        Commands::Test { provider } => {
            if !cli::handle_test_command(&config, &provider).await? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Categories => cli::handle_categories_command(),
    }

    Ok(ExitCode::SUCCESS)
}

/// Logs go to stderr so streamed output on stdout stays clean
fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "promptforge=debug,promptforge_core=debug"
    } else {
        "promptforge=info,promptforge_core=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
