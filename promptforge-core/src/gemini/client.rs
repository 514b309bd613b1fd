use crate::config::constants::{models, sse, urls};
use crate::gemini::error::GeminiError;
use crate::gemini::models::{GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use crate::utils::sse::{LineBuffer, data_payload};
use async_stream::stream;
use futures::{Stream, StreamExt};
use reqwest::Client as ReqwestClient;
use tracing::{debug, warn};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Thin typed client for the Gemini `generateContent` family
#[derive(Clone)]
pub struct Client {
    http: ReqwestClient,
    api_key: String,
    model: String,
    base_url: String,
}

impl Client {
    /// An empty model is replaced with the stable default model
    pub fn new(http: ReqwestClient, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let model = model.into();
        let model = if model.trim().is_empty() {
            models::google::DEFAULT_MODEL.to_string()
        } else {
            model
        };

        Self {
            http,
            api_key: api_key.into(),
            model,
            base_url: urls::GEMINI_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.base_url.trim_end_matches('/'),
            self.model,
            method
        )
    }

    /// Generate content in one round trip
    pub async fn generate_content(
        &self,
        prompt: &str,
        config: Option<GenerationConfig>,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let mut request = GenerateContentRequest::from_prompt(prompt);
        request.generation_config = config;

        let url = self.endpoint("generateContent");
        let response = self.post(&url, &request).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Generate content as a lazy sequence of text fragments.
    ///
    /// Each server-sent event carries a partial `GenerateContentResponse`;
    /// its text is yielded as-is. Events that fail to decode are skipped.
    pub async fn generate_content_stream(
        &self,
        prompt: &str,
    ) -> Result<impl Stream<Item = Result<String, GeminiError>> + Send + 'static, GeminiError> {
        let request = GenerateContentRequest::from_prompt(prompt);
        let url = format!("{}?alt=sse", self.endpoint("streamGenerateContent"));
        let response = self.post(&url, &request).await?;
        let mut body = Box::pin(response.bytes_stream());

        Ok(stream! {
            let mut lines = LineBuffer::new();
            let mut failed = false;

            while let Some(chunk) = body.next().await {
                match chunk {
                    Ok(chunk) => {
                        for line in lines.push(&chunk) {
                            if let Some(text) = fragment_from_line(&line) {
                                yield Ok(text);
                            }
                        }
                    }
                    Err(error) => {
                        yield Err(GeminiError::Network(error));
                        failed = true;
                        break;
                    }
                }
            }

            if !failed {
                if let Some(text) = lines.finish().as_deref().and_then(fragment_from_line) {
                    yield Ok(text);
                }
            }
        })
    }

    async fn post(
        &self,
        url: &str,
        request: &GenerateContentRequest,
    ) -> Result<reqwest::Response, GeminiError> {
        debug!(%url, model = %self.model, "sending Gemini request");
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api { status, body });
        }

        Ok(response)
    }
}

fn fragment_from_line(line: &str) -> Option<String> {
    let payload = data_payload(line)?;
    if payload.is_empty() || payload == sse::DONE_SENTINEL {
        return None;
    }

    match serde_json::from_str::<GenerateContentResponse>(payload) {
        Ok(response) => response.text().filter(|text| !text.is_empty()),
        Err(error) => {
            warn!(%error, "skipping undecodable Gemini stream event");
            None
        }
    }
}
