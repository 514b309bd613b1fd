use crate::config::constants::{defaults, urls};
use crate::gemini::{Client, GenerationConfig};
use crate::llm::error::ProviderError;
use crate::llm::provider::{AdapterCall, PartialCallback, ProbeCall, ProviderAdapter};
use crate::llm::types::Provider;
use crate::prompts::merge_instruction;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client as HttpClient;
use tracing::{debug, warn};

/// Adapter delegating to the Gemini client layer
pub struct GeminiProvider {
    http_client: HttpClient,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(http_client: HttpClient) -> Self {
        Self::with_base_url(http_client, urls::GEMINI_API_BASE)
    }

    pub fn with_base_url(http_client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    fn client(&self, credential: &str, model: &str) -> Client {
        Client::new(self.http_client.clone(), credential, model).with_base_url(&self.base_url)
    }
}

#[async_trait]
impl ProviderAdapter for GeminiProvider {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    async fn call(
        &self,
        call: AdapterCall<'_>,
        on_partial: Option<PartialCallback<'_>>,
    ) -> Result<String, ProviderError> {
        let client = self.client(call.credential, call.model);
        let prompt = merge_instruction(call.system_instruction, call.description);

        let Some(on_partial) = on_partial else {
            let response = client.generate_content(&prompt, None).await?;
            return response.text().ok_or_else(|| {
                ProviderError::malformed("Google Gemini response did not contain any text")
            });
        };

        let stream = client.generate_content_stream(&prompt).await?;
        let mut stream = std::pin::pin!(stream);
        let mut text = String::new();
        while let Some(fragment) = stream.next().await {
            text.push_str(&fragment?);
            on_partial(&text);
        }

        if text.is_empty() {
            warn!(model = client.model(), "Gemini stream ended without text");
            return Err(ProviderError::malformed(
                "Google Gemini stream did not contain any text",
            ));
        }
        debug!(model = client.model(), chars = text.len(), "Gemini stream complete");
        Ok(text)
    }

    async fn test_call(&self, probe: ProbeCall<'_>) -> Result<(), ProviderError> {
        let client = self.client(probe.credential, probe.model);
        let config = GenerationConfig {
            max_output_tokens: Some(defaults::PROBE_MAX_TOKENS),
            temperature: None,
        };

        client
            .generate_content(defaults::PROBE_PROMPT, Some(config))
            .await?;
        Ok(())
    }
}
