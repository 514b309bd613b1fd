//! # Utility Functions and Helpers
//!
//! Small building blocks shared by the provider adapters and the Gemini SDK
//! layer.
//!
//! ### Server-sent events (`sse`)
//! - **Line framing**: reassembles lines split across network chunks
//! - **Payload extraction**: strips the `data:` prefix from event lines

pub mod sse;

pub use sse::{LineBuffer, data_payload};
