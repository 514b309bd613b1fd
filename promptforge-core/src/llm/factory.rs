use super::providers::{AnthropicProvider, GeminiProvider, OpenAIProvider};
use crate::config::constants::urls;
use crate::llm::error::ProviderError;
use crate::llm::provider::ProviderAdapter;
use crate::llm::types::Provider;
use reqwest::Client as HttpClient;
use std::collections::HashMap;
use std::sync::Arc;

/// Fixed endpoints for the hosted providers, overridable for proxies and tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    pub openai_url: String,
    pub anthropic_url: String,
    pub gemini_base_url: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            openai_url: urls::OPENAI_CHAT_COMPLETIONS.to_string(),
            anthropic_url: urls::ANTHROPIC_MESSAGES.to_string(),
            gemini_base_url: urls::GEMINI_API_BASE.to_string(),
        }
    }
}

/// Provider adapter registry
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<Provider, Arc<dyn ProviderAdapter>>,
}

impl AdapterRegistry {
    /// Registry with no adapters; every lookup fails
    pub fn empty() -> Self {
        Self::default()
    }

    /// All built-in adapters against the public endpoints
    pub fn with_defaults(http_client: HttpClient) -> Self {
        Self::with_endpoints(http_client, ProviderEndpoints::default())
    }

    pub fn with_endpoints(http_client: HttpClient, endpoints: ProviderEndpoints) -> Self {
        let mut registry = Self::empty();

        registry.register(Arc::new(OpenAIProvider::with_url(
            http_client.clone(),
            endpoints.openai_url,
        )));
        registry.register(Arc::new(OpenAIProvider::compatible(http_client.clone())));
        registry.register(Arc::new(AnthropicProvider::with_url(
            http_client.clone(),
            endpoints.anthropic_url,
        )));
        registry.register(Arc::new(GeminiProvider::with_base_url(
            http_client,
            endpoints.gemini_base_url,
        )));

        registry
    }

    /// Register an adapter under the provider it reports, replacing any previous one
    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        self.adapters.insert(adapter.provider(), adapter);
    }

    pub fn resolve(&self, provider: Provider) -> Result<Arc<dyn ProviderAdapter>, ProviderError> {
        self.adapters
            .get(&provider)
            .cloned()
            .ok_or_else(|| ProviderError::unsupported_provider(provider))
    }

    /// Registered providers in declaration order
    pub fn providers(&self) -> Vec<Provider> {
        Provider::ALL
            .into_iter()
            .filter(|provider| self.adapters.contains_key(provider))
            .collect()
    }
}
