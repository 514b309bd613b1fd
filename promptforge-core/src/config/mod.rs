//! Configuration: constants, `promptforge.toml` loading and credential lookup

pub mod api_keys;
pub mod constants;
pub mod loader;

pub use api_keys::{get_api_key, load_dotenv, resolve_api_key};
pub use loader::{
    ApiKeysConfig, ConfigManager, DefaultsConfig, EndpointsConfig, HttpConfig, PromptforgeConfig,
};
