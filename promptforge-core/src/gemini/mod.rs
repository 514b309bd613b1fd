//! Gemini API client
//!
//! Typed request/response models plus a small client exposing single-shot and
//! streamed content generation. The Gemini provider adapter talks to this
//! layer only, never to raw HTTP.

pub mod client;
pub mod error;
pub mod models;

pub use client::Client;
pub use error::GeminiError;
pub use models::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
};
