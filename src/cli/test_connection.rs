use super::{ProviderArgs, ResolvedProvider, build_registry};
use anyhow::Result;
use console::style;
use promptforge_core::config::PromptforgeConfig;
use promptforge_core::llm::{ConnectivityProbe, ProbeRequest};

/// Handle the test command; returns whether the provider accepted the probe
pub async fn handle_test_command(config: &PromptforgeConfig, args: &ProviderArgs) -> Result<bool> {
    let resolved = ResolvedProvider::resolve(args, config)?;
    let provider = resolved.provider;

    let mut request = ProbeRequest::new(provider, resolved.credential.unwrap_or_default());
    if let Some(model) = resolved.model {
        request = request.with_model(model);
    }
    if let Some(endpoint) = resolved.endpoint {
        request = request.with_endpoint(endpoint);
    }

    eprintln!(
        "{} {}",
        style("Testing connection to").cyan().bold(),
        style(provider).bold()
    );

    let probe = ConnectivityProbe::with_registry(build_registry(config)?);
    let result = probe.test(&request).await;

    if result.success {
        println!("{} {provider} accepted the credential", style("ok").green().bold());
    } else {
        println!(
            "{} {}",
            style("failed").red().bold(),
            result.error_message.as_deref().unwrap_or_default()
        );
    }
    Ok(result.success)
}
