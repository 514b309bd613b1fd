//! Provider error taxonomy and message normalization
//!
//! Adapters raise typed [`ProviderError`]s and keep the raw provider body
//! around when one was received. The generation client and the connectivity
//! probe are the only callers of [`ProviderError::normalized`], which picks
//! the human-readable message through [`normalize_message`].

use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;

/// Last-resort message when neither the provider nor the transport said anything useful
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to generate prompt";

const MAX_BODY_PREVIEW_CHARS: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Required endpoint (or other setting) missing for the selected provider
    ConfigurationError,
    /// Provider identifier has no registered adapter
    UnsupportedProvider,
    /// Mandatory request field is empty
    InvalidRequest,
    /// Network or HTTP failure below the application layer
    TransportError,
    /// Response shape does not match the expected contract
    MalformedResponse,
    /// Provider answered with its own structured error body
    ProviderReportedError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::ConfigurationError => "configuration error",
            ErrorKind::UnsupportedProvider => "unsupported provider",
            ErrorKind::InvalidRequest => "invalid request",
            ErrorKind::TransportError => "transport error",
            ErrorKind::MalformedResponse => "malformed response",
            ErrorKind::ProviderReportedError => "provider error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    kind: ErrorKind,
    message: String,
    provider_body: Option<String>,
}

impl ProviderError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            provider_body: None,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigurationError, message)
    }

    pub fn unsupported_provider(provider: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::UnsupportedProvider,
            format!("Unsupported LLM provider: {provider}"),
        )
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TransportError, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedResponse, message)
    }

    /// Structured error sent by the provider; `body` is kept for normalization
    pub fn reported(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::ProviderReportedError,
            message: message.into(),
            provider_body: Some(body.into()),
        }
    }

    /// Map a reqwest failure raised while sending or reading a body
    pub fn from_reqwest(provider: &str, error: reqwest::Error) -> Self {
        Self::transport(format!("{provider} network error: {error}"))
    }

    /// Build the error for a non-success HTTP response. A body carrying a
    /// structured provider error keeps the provider's kind and body; anything
    /// else is a transport failure described by the status line.
    pub fn from_http(provider: &str, status: StatusCode, body: String) -> Self {
        let status_message = format!(
            "{provider} API returned HTTP {status}: {}",
            truncate_body(&body)
        );
        if extract_provider_message(&body).is_some() {
            Self::reported(status_message, body)
        } else {
            Self::transport(status_message)
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn provider_body(&self) -> Option<&str> {
        self.provider_body.as_deref()
    }

    /// Collapse the error into its final human-readable form
    pub fn normalized(self) -> Self {
        let message = normalize_message(self.provider_body.as_deref(), Some(&self.message));
        Self {
            kind: self.kind,
            message,
            provider_body: None,
        }
    }
}

/// Ordered fallback chain for user-facing error messages:
/// provider body detail, then the transport message, then a generic string.
pub fn normalize_message(provider_body: Option<&str>, transport_message: Option<&str>) -> String {
    if let Some(detail) = provider_body.and_then(extract_provider_message) {
        return detail;
    }

    if let Some(message) = transport_message
        .map(str::trim)
        .filter(|message| !message.is_empty())
    {
        return message.to_string();
    }

    GENERIC_FAILURE_MESSAGE.to_string()
}

/// Pull the provider's own message out of an error body.
///
/// Handles `{"error":{"message":..}}` (OpenAI, Anthropic, Gemini),
/// `{"error":"..."}` and a top-level `{"message":..}`.
pub fn extract_provider_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let candidate = match value.get("error") {
        Some(Value::Object(error)) => error.get("message").and_then(Value::as_str),
        Some(Value::String(error)) => Some(error.as_str()),
        _ => None,
    }
    .or_else(|| value.get("message").and_then(Value::as_str))?;

    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_BODY_PREVIEW_CHARS {
        return trimmed.to_string();
    }
    let mut preview: String = trimmed.chars().take(MAX_BODY_PREVIEW_CHARS).collect();
    preview.push_str("...");
    preview
}
