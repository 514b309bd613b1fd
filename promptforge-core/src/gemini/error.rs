use crate::llm::error::ProviderError;
use reqwest::StatusCode;

const PROVIDER_NAME: &str = "Google Gemini";

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    /// Non-success HTTP status; `body` is the raw response text
    #[error("Gemini API returned HTTP {status}")]
    Api { status: StatusCode, body: String },
    #[error("Gemini network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Failed to decode Gemini response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<GeminiError> for ProviderError {
    fn from(error: GeminiError) -> Self {
        match error {
            GeminiError::Api { status, body } => ProviderError::from_http(PROVIDER_NAME, status, body),
            GeminiError::Network(error) => ProviderError::from_reqwest(PROVIDER_NAME, error),
            GeminiError::Decode(error) => ProviderError::malformed(format!(
                "{PROVIDER_NAME} response could not be decoded: {error}"
            )),
        }
    }
}
