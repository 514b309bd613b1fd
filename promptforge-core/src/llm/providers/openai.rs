use crate::config::constants::{defaults, message_roles, models, urls};
use crate::llm::error::ProviderError;
use crate::llm::provider::{AdapterCall, PartialCallback, ProbeCall, ProviderAdapter};
use crate::llm::stream::decode_stream;
use crate::llm::types::{Provider, missing_endpoint_error};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::{Value, json};
use tracing::debug;

/// Where the chat completions URL comes from
#[derive(Debug, Clone, PartialEq, Eq)]
enum EndpointPolicy {
    /// Well-known URL, caller endpoints are ignored
    Fixed(String),
    /// Caller must supply a base URL; `/chat/completions` is appended
    CallerBaseUrl,
}

/// Adapter for the OpenAI chat completions API and servers that mimic it
pub struct OpenAIProvider {
    http_client: HttpClient,
    provider: Provider,
    endpoint: EndpointPolicy,
}

impl OpenAIProvider {
    /// Official OpenAI endpoint
    pub fn new(http_client: HttpClient) -> Self {
        Self::with_url(http_client, urls::OPENAI_CHAT_COMPLETIONS)
    }

    /// OpenAI adapter pointed at a different fixed chat completions URL
    pub fn with_url(http_client: HttpClient, url: impl Into<String>) -> Self {
        Self {
            http_client,
            provider: Provider::OpenAI,
            endpoint: EndpointPolicy::Fixed(url.into()),
        }
    }

    /// Self-hosted or third-party server speaking the OpenAI protocol
    pub fn compatible(http_client: HttpClient) -> Self {
        Self {
            http_client,
            provider: Provider::OpenAICompatible,
            endpoint: EndpointPolicy::CallerBaseUrl,
        }
    }

    /// Resolve the URL for one call, failing before any network access when
    /// a compatible server has no base URL
    pub fn resolve_endpoint(&self, endpoint: Option<&str>) -> Result<String, ProviderError> {
        match &self.endpoint {
            EndpointPolicy::Fixed(url) => Ok(url.clone()),
            EndpointPolicy::CallerBaseUrl => endpoint
                .and_then(compatible_chat_url)
                .ok_or_else(missing_endpoint_error),
        }
    }

    fn name(&self) -> &'static str {
        self.provider.label()
    }

    fn build_request(&self, call: &AdapterCall<'_>, stream: bool) -> Value {
        json!({
            "model": call.model,
            "messages": [
                {
                    "role": message_roles::SYSTEM,
                    "content": call.system_instruction
                },
                {
                    "role": message_roles::USER,
                    "content": call.description
                }
            ],
            "stream": stream
        })
    }

    fn build_probe_request(&self, model: &str) -> Value {
        json!({
            "model": model,
            "messages": [
                {
                    "role": message_roles::USER,
                    "content": defaults::PROBE_PROMPT
                }
            ],
            "max_tokens": defaults::PROBE_MAX_TOKENS
        })
    }

    fn probe_model<'a>(&self, model: &'a str) -> Result<&'a str, ProviderError> {
        if !model.trim().is_empty() {
            return Ok(model);
        }
        match self.provider {
            Provider::OpenAICompatible => Err(ProviderError::configuration(
                "Model identifier is required to test an OpenAI Compatible provider",
            )),
            _ => Ok(models::openai::DEFAULT_MODEL),
        }
    }

    async fn post(
        &self,
        url: &str,
        credential: &str,
        body: &Value,
    ) -> Result<reqwest::Response, ProviderError> {
        let response = self
            .http_client
            .post(url)
            .bearer_auth(credential)
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(self.name(), e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_http(self.name(), status, error_text));
        }

        Ok(response)
    }
}

#[async_trait]
impl ProviderAdapter for OpenAIProvider {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn call(
        &self,
        call: AdapterCall<'_>,
        on_partial: Option<PartialCallback<'_>>,
    ) -> Result<String, ProviderError> {
        let url = self.resolve_endpoint(call.endpoint)?;
        let stream = on_partial.is_some();
        let request = self.build_request(&call, stream);
        debug!(provider = self.name(), %url, model = call.model, stream, "sending chat completion request");

        let response = self.post(&url, call.credential, &request).await?;

        match on_partial {
            Some(on_partial) => {
                decode_stream(self.name(), response.bytes_stream(), on_partial).await
            }
            None => {
                let body = response
                    .text()
                    .await
                    .map_err(|e| ProviderError::from_reqwest(self.name(), e))?;
                parse_chat_completion(self.name(), &body)
            }
        }
    }

    async fn test_call(&self, probe: ProbeCall<'_>) -> Result<(), ProviderError> {
        let url = self.resolve_endpoint(probe.endpoint)?;
        let model = self.probe_model(probe.model)?;
        let request = self.build_probe_request(model);
        debug!(provider = self.name(), %url, model, "probing chat completion endpoint");

        self.post(&url, probe.credential, &request).await?;
        Ok(())
    }
}

/// `<base>/chat/completions` with a single trailing slash removed from the base
pub fn compatible_chat_url(base_url: &str) -> Option<String> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return None;
    }
    let base = trimmed.strip_suffix('/').unwrap_or(trimmed);
    Some(format!("{base}{}", urls::CHAT_COMPLETIONS_PATH))
}

/// Extract `choices[0].message.content` from a non-streaming response
pub fn parse_chat_completion(provider: &str, body: &str) -> Result<String, ProviderError> {
    let response: Value = serde_json::from_str(body).map_err(|e| {
        ProviderError::malformed(format!("{provider} response is not valid JSON: {e}"))
    })?;

    response
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            ProviderError::malformed(format!(
                "{provider} response is missing choices[0].message.content"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::error::ErrorKind;

    fn call() -> AdapterCall<'static> {
        AdapterCall {
            description: "A breakout clone",
            system_instruction: "You are an expert",
            credential: "sk-test",
            model: "gpt-4o",
            endpoint: None,
        }
    }

    #[test]
    fn compatible_url_strips_single_trailing_slash() {
        assert_eq!(
            compatible_chat_url("http://localhost:11434/v1/").as_deref(),
            Some("http://localhost:11434/v1/chat/completions")
        );
        assert_eq!(
            compatible_chat_url("https://api.together.xyz/v1").as_deref(),
            Some("https://api.together.xyz/v1/chat/completions")
        );
        assert_eq!(compatible_chat_url("  "), None);
    }

    #[test]
    fn compatible_adapter_requires_endpoint() {
        let adapter = OpenAIProvider::compatible(HttpClient::new());
        let error = adapter.resolve_endpoint(None).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ConfigurationError);
        assert!(adapter.resolve_endpoint(Some("http://llm.local/v1")).is_ok());
    }

    #[test]
    fn official_adapter_ignores_caller_endpoint() {
        let adapter = OpenAIProvider::new(HttpClient::new());
        assert_eq!(
            adapter.resolve_endpoint(Some("http://elsewhere")).unwrap(),
            urls::OPENAI_CHAT_COMPLETIONS
        );
    }

    #[test]
    fn request_carries_system_and_user_messages() {
        let adapter = OpenAIProvider::new(HttpClient::new());
        let request = adapter.build_request(&call(), true);
        assert_eq!(request["model"], "gpt-4o");
        assert_eq!(request["stream"], true);
        assert_eq!(request["messages"][0]["role"], "system");
        assert_eq!(request["messages"][0]["content"], "You are an expert");
        assert_eq!(request["messages"][1]["role"], "user");
        assert_eq!(request["messages"][1]["content"], "A breakout clone");
    }

    #[test]
    fn probe_request_is_one_token() {
        let adapter = OpenAIProvider::new(HttpClient::new());
        let request = adapter.build_probe_request(adapter.probe_model("").unwrap());
        assert_eq!(request["model"], models::openai::DEFAULT_MODEL);
        assert_eq!(request["max_tokens"], 1);

        let compatible = OpenAIProvider::compatible(HttpClient::new());
        assert_eq!(
            compatible.probe_model(" ").unwrap_err().kind(),
            ErrorKind::ConfigurationError
        );
    }

    #[test]
    fn parses_completion_content() {
        let body = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"Build a game"}}]}"#;
        assert_eq!(parse_chat_completion("OpenAI", body).unwrap(), "Build a game");
    }

    #[test]
    fn unexpected_shapes_are_malformed() {
        for body in [r#"{"choices":[]}"#, r#"{"result":"x"}"#, "not json"] {
            let error = parse_chat_completion("OpenAI", body).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::MalformedResponse, "{body}");
        }
    }
}
