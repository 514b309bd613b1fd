//! Command-line interface module
//!
//! Argument parsing plus one handler per subcommand. Generated text goes to
//! stdout; status lines and logs go to stderr.

pub mod args;
pub mod categories;
pub mod generate;
pub mod test_connection;

pub use args::*;
pub use categories::handle_categories_command;
pub use generate::{GenerateOptions, handle_generate_command};
pub use test_connection::handle_test_command;

use anyhow::{Context, Result};
use promptforge_core::config::{PromptforgeConfig, get_api_key};
use promptforge_core::llm::{AdapterRegistry, Provider};
use tracing::debug;

/// Provider settings after merging flags, environment and configuration
#[derive(Debug, Clone)]
pub struct ResolvedProvider {
    pub provider: Provider,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub credential: Option<String>,
}

impl ResolvedProvider {
    pub fn resolve(args: &ProviderArgs, config: &PromptforgeConfig) -> Result<Self> {
        let provider = match args.provider.as_deref() {
            Some(value) => value.parse::<Provider>()?,
            None => config.defaults.provider,
        };

        let model = args
            .model
            .clone()
            .filter(|model| !model.trim().is_empty())
            .or_else(|| config.model_for(provider));

        let endpoint = args.endpoint.clone().or_else(|| {
            provider
                .requires_endpoint()
                .then(|| config.endpoints.compatible_base_url.clone())
                .flatten()
        });

        let credential = resolve_credential(provider, args, config);
        debug!(
            %provider,
            model = model.as_deref().unwrap_or(""),
            has_endpoint = endpoint.is_some(),
            has_credential = credential.is_some(),
            "resolved provider settings"
        );

        Ok(Self {
            provider,
            model,
            endpoint,
            credential,
        })
    }
}

fn resolve_credential(
    provider: Provider,
    args: &ProviderArgs,
    config: &PromptforgeConfig,
) -> Option<String> {
    if let Some(key) = args.api_key.clone().filter(|key| !key.trim().is_empty()) {
        return Some(key);
    }

    if let Some(name) = &args.api_key_env {
        return std::env::var(name).ok().filter(|key| !key.trim().is_empty());
    }

    match get_api_key(provider, &config.api_keys) {
        Ok(key) => Some(key),
        Err(error) => {
            debug!(%error, "no stored credential");
            None
        }
    }
}

/// Registry honoring the configured endpoints and user agent
pub fn build_registry(config: &PromptforgeConfig) -> Result<AdapterRegistry> {
    let http_client = config
        .http
        .build_client()
        .context("Failed to initialize HTTP client")?;
    Ok(AdapterRegistry::with_endpoints(
        http_client,
        config.provider_endpoints(),
    ))
}
