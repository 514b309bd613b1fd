//! Credential lookup for each provider.
//!
//! Environment variables (including values loaded from `.env`) win over the
//! `[api_keys]` table of the configuration file. An explicit key passed by the
//! caller is handled before either of these and never reaches this module.

use crate::config::constants::env;
use crate::config::loader::ApiKeysConfig;
use crate::llm::types::Provider;
use anyhow::{Result, anyhow};
use tracing::{debug, warn};

/// Environment variables consulted for a provider, in priority order
pub fn env_vars_for(provider: Provider) -> &'static [&'static str] {
    match provider {
        Provider::OpenAI => &[env::OPENAI_API_KEY],
        Provider::Anthropic => &[env::ANTHROPIC_API_KEY],
        Provider::Gemini => &[env::GEMINI_API_KEY, env::GOOGLE_API_KEY],
        Provider::OpenAICompatible => &[env::OPENAI_COMPATIBLE_API_KEY],
    }
}

/// Load environment variables from a `.env` file in the current directory.
/// A missing file is not an error.
pub fn load_dotenv() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!(path = %path.display(), "loaded environment variables");
            Ok(())
        }
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            warn!(error = %e, "failed to load .env file");
            Ok(())
        }
    }
}

/// Get the API key for `provider` from the process environment or the config file
pub fn get_api_key(provider: Provider, config: &ApiKeysConfig) -> Result<String> {
    resolve_api_key(provider, config, |name| std::env::var(name).ok())
}

/// Same as [`get_api_key`] with an injectable environment lookup
pub fn resolve_api_key<F>(provider: Provider, config: &ApiKeysConfig, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let env_vars = env_vars_for(provider);

    for name in env_vars.iter().copied() {
        if let Some(key) = lookup(name).filter(|key| !key.trim().is_empty()) {
            return Ok(key);
        }
    }

    if let Some(key) = config
        .for_provider(provider)
        .filter(|key| !key.trim().is_empty())
    {
        return Ok(key.to_string());
    }

    Err(anyhow!(
        "No API key found for {provider}. Set {} (or add it to .env) or configure [api_keys] in promptforge.toml",
        env_vars.join(" or ")
    ))
}
