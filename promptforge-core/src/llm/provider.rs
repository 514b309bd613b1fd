//! Provider adapter capability
//!
//! Each provider (OpenAI-style, Anthropic-style, Gemini-style) implements
//! [`ProviderAdapter`]. Adapters translate a generic call into the provider's
//! wire format and bring the answer back as plain text.
//!
//! ## Streaming contract
//!
//! When a caller passes an `on_partial` callback, adapters that can stream
//! deliver the **entire accumulated text** after every fragment. Callers
//! render the whole snapshot on each update and never have to stitch deltas
//! together. Adapters that cannot stream deliver the final text once.

use crate::llm::error::ProviderError;
use crate::llm::types::Provider;
use async_trait::async_trait;

/// Snapshot callback; receives the full text generated so far
pub type PartialCallback<'a> = &'a mut (dyn FnMut(&str) + Send);

/// Everything an adapter needs for one generation exchange
#[derive(Debug, Clone, Copy)]
pub struct AdapterCall<'a> {
    pub description: &'a str,
    pub system_instruction: &'a str,
    pub credential: &'a str,
    pub model: &'a str,
    pub endpoint: Option<&'a str>,
}

/// Minimal request used by the connectivity probe
#[derive(Debug, Clone, Copy)]
pub struct ProbeCall<'a> {
    pub credential: &'a str,
    /// Empty means "use the adapter's default model"
    pub model: &'a str,
    pub endpoint: Option<&'a str>,
}

#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Provider this adapter serves
    fn provider(&self) -> Provider;

    /// Run one generation and return the complete text
    async fn call(
        &self,
        call: AdapterCall<'_>,
        on_partial: Option<PartialCallback<'_>>,
    ) -> Result<String, ProviderError>;

    /// Issue the cheapest real request the provider accepts
    async fn test_call(&self, probe: ProbeCall<'_>) -> Result<(), ProviderError>;
}
