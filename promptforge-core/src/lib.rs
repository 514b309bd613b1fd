//! # promptforge-core
//!
//! Turns a short application description into an expanded code-generation
//! prompt using OpenAI, Anthropic, Gemini or any OpenAI-compatible server.
//!
//! - [`prompts`] builds the provider-agnostic system instruction
//! - [`llm`] holds the provider adapters, the stream decoder, the
//!   [`GenerationClient`] entry point and the [`ConnectivityProbe`]
//! - [`gemini`] is the typed Gemini client used by the Gemini adapter
//! - [`config`] loads `promptforge.toml`, `.env` and provider credentials
//! - [`history`] defines the record handed to whatever stores past results

pub mod config;
pub mod gemini;
pub mod history;
pub mod llm;
pub mod prompts;
pub mod utils;

pub use history::PromptRecord;
pub use llm::{
    ConnectivityProbe, ErrorKind, GenerationClient, GenerationRequest, ProbeRequest, ProbeResult,
    Provider, ProviderError,
};
pub use prompts::{AppCategory, PromptTemplateBuilder, Verbosity};
