use crate::config::constants::{defaults, message_roles, models, urls};
use crate::llm::error::ProviderError;
use crate::llm::provider::{AdapterCall, PartialCallback, ProbeCall, ProviderAdapter};
use crate::llm::types::Provider;
use crate::prompts::merge_instruction;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::{Value, json};
use tracing::debug;

const PROVIDER_NAME: &str = "Anthropic";

/// Adapter for the Anthropic Messages API.
///
/// The Messages call is made without streaming; a caller-supplied snapshot
/// callback receives the final text once.
pub struct AnthropicProvider {
    http_client: HttpClient,
    url: String,
}

impl AnthropicProvider {
    pub fn new(http_client: HttpClient) -> Self {
        Self::with_url(http_client, urls::ANTHROPIC_MESSAGES)
    }

    pub fn with_url(http_client: HttpClient, url: impl Into<String>) -> Self {
        Self {
            http_client,
            url: url.into(),
        }
    }

    fn build_request(&self, call: &AdapterCall<'_>) -> Value {
        json!({
            "model": call.model,
            "max_tokens": defaults::ANTHROPIC_MAX_TOKENS,
            "messages": [
                {
                    "role": message_roles::USER,
                    "content": merge_instruction(call.system_instruction, call.description)
                }
            ]
        })
    }

    fn build_probe_request(&self, model: &str) -> Value {
        let model = if model.trim().is_empty() {
            models::anthropic::DEFAULT_MODEL
        } else {
            model
        };
        json!({
            "model": model,
            "max_tokens": defaults::PROBE_MAX_TOKENS,
            "messages": [
                {
                    "role": message_roles::USER,
                    "content": defaults::PROBE_PROMPT
                }
            ]
        })
    }

    async fn post(&self, credential: &str, body: &Value) -> Result<reqwest::Response, ProviderError> {
        let response = self
            .http_client
            .post(&self.url)
            .header("x-api-key", credential)
            .header("anthropic-version", urls::ANTHROPIC_API_VERSION)
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER_NAME, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_http(PROVIDER_NAME, status, error_text));
        }

        Ok(response)
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicProvider {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    async fn call(
        &self,
        call: AdapterCall<'_>,
        on_partial: Option<PartialCallback<'_>>,
    ) -> Result<String, ProviderError> {
        let request = self.build_request(&call);
        debug!(provider = PROVIDER_NAME, url = %self.url, model = call.model, "sending messages request");

        let response = self.post(call.credential, &request).await?;
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER_NAME, e))?;
        let text = parse_messages_response(&body)?;

        if let Some(on_partial) = on_partial {
            on_partial(&text);
        }
        Ok(text)
    }

    async fn test_call(&self, probe: ProbeCall<'_>) -> Result<(), ProviderError> {
        let request = self.build_probe_request(probe.model);
        debug!(provider = PROVIDER_NAME, url = %self.url, "probing messages endpoint");

        self.post(probe.credential, &request).await?;
        Ok(())
    }
}

/// Extract `content[0].text` from a Messages API response
pub fn parse_messages_response(body: &str) -> Result<String, ProviderError> {
    let response: Value = serde_json::from_str(body).map_err(|e| {
        ProviderError::malformed(format!("{PROVIDER_NAME} response is not valid JSON: {e}"))
    })?;

    response
        .get("content")
        .and_then(|content| content.get(0))
        .and_then(|block| block.get("text"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            ProviderError::malformed(format!(
                "{PROVIDER_NAME} response is missing content[0].text"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::error::ErrorKind;

    #[test]
    fn request_merges_instruction_into_single_user_message() {
        let adapter = AnthropicProvider::new(HttpClient::new());
        let call = AdapterCall {
            description: "A tower defense game",
            system_instruction: "You are an expert",
            credential: "sk-ant",
            model: "claude-3-5-sonnet-latest",
            endpoint: None,
        };
        let request = adapter.build_request(&call);

        assert_eq!(request["max_tokens"], 1000);
        assert!(request.get("system").is_none());
        let messages = request["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(
            messages[0]["content"],
            "You are an expert\n\nUser Request: A tower defense game"
        );
    }

    #[test]
    fn probe_defaults_model_and_caps_tokens() {
        let adapter = AnthropicProvider::new(HttpClient::new());
        let request = adapter.build_probe_request("");
        assert_eq!(request["model"], models::anthropic::DEFAULT_MODEL);
        assert_eq!(request["max_tokens"], 1);
        assert_eq!(request["messages"][0]["content"], "ping");
    }

    #[test]
    fn parses_first_content_block() {
        let body = r#"{"id":"msg_1","type":"message","content":[{"type":"text","text":"Create a game"}]}"#;
        assert_eq!(parse_messages_response(body).unwrap(), "Create a game");
    }

    #[test]
    fn empty_content_is_malformed() {
        let error = parse_messages_response(r#"{"content":[]}"#).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MalformedResponse);
    }
}
