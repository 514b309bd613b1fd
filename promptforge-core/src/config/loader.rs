use crate::config::constants::{defaults, models, urls};
use crate::llm::factory::ProviderEndpoints;
use crate::llm::types::Provider;
use crate::prompts::{AppCategory, Verbosity};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Root of `promptforge.toml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PromptforgeConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub endpoints: EndpointsConfig,

    #[serde(default)]
    pub http: HttpConfig,

    /// Credentials stored in the file; environment variables take precedence
    #[serde(default)]
    pub api_keys: ApiKeysConfig,
}

impl PromptforgeConfig {
    /// Model to use when the caller did not name one.
    ///
    /// The configured default only applies to the configured default provider;
    /// other providers fall back to their built-in default. OpenAI Compatible
    /// servers have no built-in default.
    pub fn model_for(&self, provider: Provider) -> Option<String> {
        if provider == self.defaults.provider {
            if let Some(model) = self
                .defaults
                .model
                .as_deref()
                .map(str::trim)
                .filter(|model| !model.is_empty())
            {
                return Some(model.to_string());
            }
        }

        let builtin = match provider {
            Provider::OpenAI => models::openai::DEFAULT_MODEL,
            Provider::Anthropic => models::anthropic::DEFAULT_MODEL,
            Provider::Gemini => models::google::DEFAULT_MODEL,
            Provider::OpenAICompatible => return None,
        };
        Some(builtin.to_string())
    }

    pub fn provider_endpoints(&self) -> ProviderEndpoints {
        ProviderEndpoints {
            openai_url: self.endpoints.openai.clone(),
            anthropic_url: self.endpoints.anthropic.clone(),
            gemini_base_url: self.endpoints.gemini.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_provider")]
    pub provider: Provider,

    /// Model for the default provider
    #[serde(default)]
    pub model: Option<String>,

    #[serde(default = "default_category")]
    pub category: AppCategory,

    #[serde(default)]
    pub verbosity: Verbosity,

    /// Stream snapshots to the terminal when the provider supports it
    #[serde(default = "default_true")]
    pub stream: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            category: default_category(),
            verbosity: Verbosity::default(),
            stream: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EndpointsConfig {
    /// Full chat completions URL
    #[serde(default = "default_openai_url")]
    pub openai: String,

    /// Full Messages API URL
    #[serde(default = "default_anthropic_url")]
    pub anthropic: String,

    /// API base; `/models/{model}:{method}` is appended
    #[serde(default = "default_gemini_base")]
    pub gemini: String,

    /// Base URL for OpenAI Compatible servers, e.g. `http://localhost:11434/v1`
    #[serde(default)]
    pub compatible_base_url: Option<String>,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            openai: default_openai_url(),
            anthropic: default_anthropic_url(),
            gemini: default_gemini_base(),
            compatible_base_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
        }
    }
}

impl HttpConfig {
    /// Shared HTTP client for every adapter. No request timeout is set.
    pub fn build_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .build()
            .context("Failed to build HTTP client")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiKeysConfig {
    #[serde(default)]
    pub openai: Option<String>,
    #[serde(default)]
    pub anthropic: Option<String>,
    #[serde(default)]
    pub gemini: Option<String>,
    #[serde(default)]
    pub openai_compatible: Option<String>,
}

impl ApiKeysConfig {
    pub fn for_provider(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::OpenAI => self.openai.as_deref(),
            Provider::Anthropic => self.anthropic.as_deref(),
            Provider::Gemini => self.gemini.as_deref(),
            Provider::OpenAICompatible => self.openai_compatible.as_deref(),
        }
    }
}

fn default_provider() -> Provider {
    Provider::OpenAI
}
fn default_category() -> AppCategory {
    AppCategory::HtmlGames
}
fn default_true() -> bool {
    true
}
fn default_openai_url() -> String {
    urls::OPENAI_CHAT_COMPLETIONS.to_string()
}
fn default_anthropic_url() -> String {
    urls::ANTHROPIC_MESSAGES.to_string()
}
fn default_gemini_base() -> String {
    urls::GEMINI_API_BASE.to_string()
}
fn default_user_agent() -> String {
    defaults::DEFAULT_USER_AGENT.to_string()
}

/// Loaded configuration plus the file it came from
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: PromptforgeConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration from the default locations
    pub fn load() -> Result<Self> {
        let workspace =
            std::env::current_dir().context("Failed to determine current directory")?;
        Self::load_from_workspace(workspace)
    }

    /// Search order: `<workspace>/promptforge.toml`, then
    /// `<config dir>/promptforge/promptforge.toml`, then built-in defaults
    pub fn load_from_workspace(workspace: impl AsRef<Path>) -> Result<Self> {
        let config_path = workspace.as_ref().join(defaults::CONFIG_FILE_NAME);
        if config_path.exists() {
            return Self::load_from_file(&config_path);
        }

        if let Some(user_config) = Self::user_config_path() {
            if user_config.exists() {
                return Self::load_from_file(&user_config);
            }
        }

        debug!("no configuration file found, using defaults");
        Ok(Self {
            config: PromptforgeConfig::default(),
            config_path: None,
        })
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: PromptforgeConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!(path = %path.display(), "loaded configuration");
        Ok(Self {
            config,
            config_path: Some(path.to_path_buf()),
        })
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| {
            dir.join(defaults::CONFIG_DIR_NAME)
                .join(defaults::CONFIG_FILE_NAME)
        })
    }

    pub fn config(&self) -> &PromptforgeConfig {
        &self.config
    }

    pub fn into_config(self) -> PromptforgeConfig {
        self.config
    }

    /// Get the configuration file path (if loaded from file)
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}
