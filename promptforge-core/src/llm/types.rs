use crate::llm::error::ProviderError;
use crate::prompts::{AppCategory, Verbosity};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported LLM backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "openai-compatible")]
    OpenAICompatible,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::OpenAI,
        Provider::Anthropic,
        Provider::Gemini,
        Provider::OpenAICompatible,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OpenAI",
            Provider::Anthropic => "Anthropic",
            Provider::Gemini => "Google Gemini",
            Provider::OpenAICompatible => "OpenAI Compatible",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Provider::OpenAI => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Gemini => "gemini",
            Provider::OpenAICompatible => "openai-compatible",
        }
    }

    /// Whether the caller must supply an endpoint for this provider
    pub fn requires_endpoint(&self) -> bool {
        matches!(self, Provider::OpenAICompatible)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Provider {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "openai" => Ok(Provider::OpenAI),
            "anthropic" => Ok(Provider::Anthropic),
            "gemini" | "google-gemini" | "google" => Ok(Provider::Gemini),
            "openai-compatible" | "compatible" => Ok(Provider::OpenAICompatible),
            _ => Err(ProviderError::unsupported_provider(s)),
        }
    }
}

/// One independent generation exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub description_text: String,
    pub app_category: AppCategory,
    pub verbosity: Verbosity,
    pub provider: Provider,
    pub credential: String,
    pub model_identifier: String,
    /// Base URL for OpenAI-compatible servers; ignored by other providers
    pub endpoint_override: Option<String>,
}

impl GenerationRequest {
    pub fn new(
        provider: Provider,
        description_text: impl Into<String>,
        credential: impl Into<String>,
        model_identifier: impl Into<String>,
    ) -> Self {
        Self {
            description_text: description_text.into(),
            app_category: AppCategory::HtmlGames,
            verbosity: Verbosity::default(),
            provider,
            credential: credential.into(),
            model_identifier: model_identifier.into(),
            endpoint_override: None,
        }
    }

    pub fn with_category(mut self, app_category: AppCategory) -> Self {
        self.app_category = app_category;
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint_override = Some(endpoint.into());
        self
    }

    /// Check the mandatory-field contract before anything touches the network
    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.description_text.trim().is_empty() {
            return Err(ProviderError::invalid_request(
                "Description text cannot be empty",
            ));
        }
        if self.credential.trim().is_empty() {
            return Err(ProviderError::invalid_request(format!(
                "An API key is required for {}",
                self.provider
            )));
        }
        if self.model_identifier.trim().is_empty() {
            return Err(ProviderError::invalid_request(
                "Model identifier cannot be empty",
            ));
        }
        if self.provider.requires_endpoint() && endpoint_of(&self.endpoint_override).is_none() {
            return Err(missing_endpoint_error());
        }
        Ok(())
    }
}

/// Credential check request; the model may be left empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeRequest {
    pub provider: Provider,
    pub credential: String,
    #[serde(default)]
    pub model_identifier: String,
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl ProbeRequest {
    pub fn new(provider: Provider, credential: impl Into<String>) -> Self {
        Self {
            provider,
            credential: credential.into(),
            model_identifier: String::new(),
            endpoint: None,
        }
    }

    pub fn with_model(mut self, model_identifier: impl Into<String>) -> Self {
        self.model_identifier = model_identifier.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}

impl From<&GenerationRequest> for ProbeRequest {
    fn from(request: &GenerationRequest) -> Self {
        Self {
            provider: request.provider,
            credential: request.credential.clone(),
            model_identifier: request.model_identifier.clone(),
            endpoint: request.endpoint_override.clone(),
        }
    }
}

/// Outcome of a connectivity probe. There is no partial success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub success: bool,
    pub error_message: Option<String>,
}

impl ProbeResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(message.into()),
        }
    }
}

/// Non-blank endpoint value, if any
pub(crate) fn endpoint_of(endpoint: &Option<String>) -> Option<&str> {
    endpoint
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

pub(crate) fn missing_endpoint_error() -> ProviderError {
    ProviderError::configuration("Base URL is required for OpenAI Compatible providers")
}
