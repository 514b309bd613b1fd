//! Record handed to the history collaborator after a successful generation

use crate::llm::types::{GenerationRequest, Provider};
use crate::prompts::{AppCategory, Verbosity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MASK: &str = "****";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub description_text: String,
    pub app_category: AppCategory,
    pub provider: Provider,
    pub credential: String,
    pub model_identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_override: Option<String>,
    pub verbosity: Verbosity,
    pub result_text: String,
    pub timestamp: DateTime<Utc>,
}

impl PromptRecord {
    pub fn from_request(request: &GenerationRequest, result_text: impl Into<String>) -> Self {
        Self {
            description_text: request.description_text.clone(),
            app_category: request.app_category,
            provider: request.provider,
            credential: request.credential.clone(),
            model_identifier: request.model_identifier.clone(),
            endpoint_override: request.endpoint_override.clone(),
            verbosity: request.verbosity,
            result_text: result_text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Copy safe to print or log
    pub fn redacted(&self) -> Self {
        Self {
            credential: mask_credential(&self.credential),
            ..self.clone()
        }
    }
}

fn mask_credential(credential: &str) -> String {
    let chars: Vec<char> = credential.chars().collect();
    if chars.len() <= 8 {
        return MASK.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}{MASK}{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_copies_request_fields() {
        let request = GenerationRequest::new(
            Provider::OpenAICompatible,
            "A pomodoro timer",
            "sk-local-123456",
            "llama3",
        )
        .with_category(AppCategory::PythonUtilities)
        .with_verbosity(Verbosity::Detailed)
        .with_endpoint("http://localhost:11434/v1");

        let record = PromptRecord::from_request(&request, "Write a CLI timer");
        assert_eq!(record.description_text, "A pomodoro timer");
        assert_eq!(record.app_category, AppCategory::PythonUtilities);
        assert_eq!(record.verbosity, Verbosity::Detailed);
        assert_eq!(record.endpoint_override.as_deref(), Some("http://localhost:11434/v1"));
        assert_eq!(record.result_text, "Write a CLI timer");
        assert_eq!(record.credential, "sk-local-123456");
    }

    #[test]
    fn redaction_masks_credential() {
        let request = GenerationRequest::new(Provider::OpenAI, "A game", "sk-abcdefghijkl", "gpt-4o");
        let record = PromptRecord::from_request(&request, "text").redacted();
        assert_eq!(record.credential, "sk-a****ijkl");

        let short = GenerationRequest::new(Provider::OpenAI, "A game", "secret", "gpt-4o");
        assert_eq!(PromptRecord::from_request(&short, "text").redacted().credential, "****");
    }

    #[test]
    fn serializes_with_slugs() {
        let request = GenerationRequest::new(Provider::Gemini, "A game", "key", "gemini-2.5-flash")
            .with_category(AppCategory::ThreeJsVisualizations);
        let value = serde_json::to_value(PromptRecord::from_request(&request, "text")).unwrap();
        assert_eq!(value["provider"], "gemini");
        assert_eq!(value["app_category"], "threejs-visualizations");
        assert!(value.get("endpoint_override").is_none());
    }
}
