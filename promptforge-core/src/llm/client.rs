use super::factory::AdapterRegistry;
use super::probe::ConnectivityProbe;
use crate::history::PromptRecord;
use crate::llm::error::ProviderError;
use crate::llm::provider::{AdapterCall, PartialCallback};
use crate::llm::types::{GenerationRequest, endpoint_of};
use crate::prompts::PromptTemplateBuilder;
use reqwest::Client as HttpClient;
use std::sync::Arc;
use tracing::{Instrument, debug, info, info_span, warn};

/// Public entry point for prompt generation.
///
/// Cloning is cheap and clones share the adapter registry. The client keeps no
/// per-call state, so concurrent calls are independent.
#[derive(Clone)]
pub struct GenerationClient {
    registry: Arc<AdapterRegistry>,
}

impl Default for GenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationClient {
    /// Client with every built-in adapter pointed at the public endpoints
    pub fn new() -> Self {
        Self::with_registry(AdapterRegistry::with_defaults(HttpClient::new()))
    }

    pub fn with_registry(registry: AdapterRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Connectivity probe sharing this client's adapters
    pub fn probe(&self) -> ConnectivityProbe {
        ConnectivityProbe::from_shared(Arc::clone(&self.registry))
    }

    /// Generate a prompt for `request`.
    ///
    /// With `on_partial`, streaming-capable providers deliver the whole text
    /// accumulated so far after every fragment. The returned string is always
    /// the complete text. Errors come back normalized.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        on_partial: Option<PartialCallback<'_>>,
    ) -> Result<String, ProviderError> {
        let span = info_span!(
            "generate",
            provider = %request.provider,
            model = %request.model_identifier,
            category = %request.app_category,
        );

        self.run(request, on_partial)
            .instrument(span)
            .await
            .map_err(|error| {
                let error = error.normalized();
                warn!(kind = %error.kind(), error = %error, "prompt generation failed");
                error
            })
    }

    /// Run [`generate`](Self::generate) and package the outcome for the
    /// history collaborator. Nothing is stored here.
    pub async fn generate_record(
        &self,
        request: &GenerationRequest,
        on_partial: Option<PartialCallback<'_>>,
    ) -> Result<PromptRecord, ProviderError> {
        let text = self.generate(request, on_partial).await?;
        Ok(PromptRecord::from_request(request, text))
    }

    async fn run(
        &self,
        request: &GenerationRequest,
        on_partial: Option<PartialCallback<'_>>,
    ) -> Result<String, ProviderError> {
        let adapter = self.registry.resolve(request.provider)?;
        request.validate()?;

        let endpoint = endpoint_of(&request.endpoint_override);
        let endpoint = if request.provider.requires_endpoint() {
            endpoint
        } else {
            if let Some(ignored) = endpoint {
                warn!(endpoint = ignored, "endpoint override ignored for this provider");
            }
            None
        };

        let system_instruction =
            PromptTemplateBuilder::build(request.app_category, request.verbosity);
        debug!(
            instruction_chars = system_instruction.len(),
            stream = on_partial.is_some(),
            "dispatching generation"
        );

        let call = AdapterCall {
            description: &request.description_text,
            system_instruction: &system_instruction,
            credential: &request.credential,
            model: &request.model_identifier,
            endpoint,
        };
        let text = adapter.call(call, on_partial).await?;

        info!(chars = text.len(), "prompt generated");
        Ok(text)
    }
}
