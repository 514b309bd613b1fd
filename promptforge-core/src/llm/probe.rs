//! Credential and endpoint reachability check
//!
//! A probe issues the cheapest real request each provider accepts (a
//! one-token "ping"). It never fails: every problem is folded into a
//! [`ProbeResult`] carrying the normalized message.

use super::factory::AdapterRegistry;
use crate::llm::error::ProviderError;
use crate::llm::provider::ProbeCall;
use crate::llm::types::{ProbeRequest, ProbeResult, endpoint_of, missing_endpoint_error};
use reqwest::Client as HttpClient;
use std::sync::Arc;
use tracing::{Instrument, info, info_span};

#[derive(Clone)]
pub struct ConnectivityProbe {
    registry: Arc<AdapterRegistry>,
}

impl Default for ConnectivityProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectivityProbe {
    pub fn new() -> Self {
        Self::with_registry(AdapterRegistry::with_defaults(HttpClient::new()))
    }

    pub fn with_registry(registry: AdapterRegistry) -> Self {
        Self::from_shared(Arc::new(registry))
    }

    pub(crate) fn from_shared(registry: Arc<AdapterRegistry>) -> Self {
        Self { registry }
    }

    pub async fn test(&self, request: &ProbeRequest) -> ProbeResult {
        let span = info_span!("probe", provider = %request.provider);
        match self.run(request).instrument(span).await {
            Ok(()) => {
                info!(provider = %request.provider, "connection test succeeded");
                ProbeResult::ok()
            }
            Err(error) => {
                let error = error.normalized();
                info!(provider = %request.provider, kind = %error.kind(), error = %error, "connection test failed");
                ProbeResult::failed(error.message())
            }
        }
    }

    async fn run(&self, request: &ProbeRequest) -> Result<(), ProviderError> {
        let adapter = self.registry.resolve(request.provider)?;

        if request.credential.trim().is_empty() {
            return Err(ProviderError::invalid_request(format!(
                "An API key is required for {}",
                request.provider
            )));
        }

        let endpoint = endpoint_of(&request.endpoint);
        if request.provider.requires_endpoint() && endpoint.is_none() {
            return Err(missing_endpoint_error());
        }

        adapter
            .test_call(ProbeCall {
                credential: &request.credential,
                model: request.model_identifier.trim(),
                endpoint,
            })
            .await
    }
}
