//! # Multi-provider generation layer
//!
//! One request shape, three wire protocols:
//!
//! | Provider | Transport | Streaming |
//! |----------|-----------|-----------|
//! | OpenAI / OpenAI Compatible | chat completions over HTTP | SSE deltas |
//! | Anthropic | Messages API over HTTP | final text only |
//! | Gemini | [`crate::gemini`] client | SSE via `streamGenerateContent` |
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use promptforge_core::llm::{GenerationClient, GenerationRequest, Provider};
//! use promptforge_core::prompts::{AppCategory, Verbosity};
//!
//! # async fn run() -> Result<(), promptforge_core::llm::ProviderError> {
//! let client = GenerationClient::new();
//! let request = GenerationRequest::new(
//!     Provider::OpenAI,
//!     "A snake game with power-ups",
//!     std::env::var("OPENAI_API_KEY").unwrap_or_default(),
//!     "gpt-4o",
//! )
//! .with_category(AppCategory::HtmlGames)
//! .with_verbosity(Verbosity::Concise);
//!
//! let mut render = |snapshot: &str| println!("{snapshot}");
//! let prompt = client.generate(&request, Some(&mut render)).await?;
//! # let _ = prompt;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod factory;
pub mod probe;
pub mod provider;
pub mod providers;
pub mod stream;
pub mod types;

pub use client::GenerationClient;
pub use error::{ErrorKind, GENERIC_FAILURE_MESSAGE, ProviderError, normalize_message};
pub use factory::{AdapterRegistry, ProviderEndpoints};
pub use probe::ConnectivityProbe;
pub use provider::{AdapterCall, PartialCallback, ProbeCall, ProviderAdapter};
pub use stream::{DecodeStatus, StreamDecoder, StreamFrame, decode_stream};
pub use types::{GenerationRequest, ProbeRequest, ProbeResult, Provider};
