use super::{ProviderArgs, ResolvedProvider, build_registry};
use anyhow::{Context, Result, anyhow};
use console::style;
use promptforge_core::config::PromptforgeConfig;
use promptforge_core::config::api_keys::env_vars_for;
use promptforge_core::llm::{GenerationClient, GenerationRequest, PartialCallback};
use promptforge_core::prompts::{AppCategory, Verbosity};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub description: String,
    pub provider: ProviderArgs,
    pub category: Option<String>,
    pub verbosity: Option<String>,
    pub no_stream: bool,
    pub output: Option<PathBuf>,
    pub record: bool,
}

/// Handle the generate command
pub async fn handle_generate_command(
    config: &PromptforgeConfig,
    options: GenerateOptions,
) -> Result<()> {
    if options.description.trim().is_empty() {
        anyhow::bail!("No description provided. Use: promptforge generate \"A snake game\"");
    }

    let resolved = ResolvedProvider::resolve(&options.provider, config)?;
    let provider = resolved.provider;
    let credential = resolved.credential.ok_or_else(|| {
        anyhow!(
            "No API key found for {provider}. Pass --api-key or set {}",
            env_vars_for(provider).join(" or ")
        )
    })?;
    let model = resolved
        .model
        .ok_or_else(|| anyhow!("No model configured for {provider}. Pass --model"))?;

    let category = match options.category.as_deref() {
        Some(label) => label.parse::<AppCategory>()?,
        None => config.defaults.category,
    };
    let verbosity = match options.verbosity.as_deref() {
        Some(label) => label.parse::<Verbosity>()?,
        None => config.defaults.verbosity,
    };

    let mut request = GenerationRequest::new(provider, options.description, credential, model)
        .with_category(category)
        .with_verbosity(verbosity);
    if let Some(endpoint) = resolved.endpoint {
        request = request.with_endpoint(endpoint);
    }

    eprintln!(
        "{} {} {} {}",
        style("Generating").cyan().bold(),
        style(category.label()).bold(),
        style("prompt with").dim(),
        style(format!("{provider} ({})", request.model_identifier)).bold()
    );

    let client = GenerationClient::with_registry(build_registry(config)?);
    let stream = config.defaults.stream && !options.no_stream;

    let mut printed = 0usize;
    let mut render = |snapshot: &str| {
        // Snapshots only ever grow, so print the new suffix
        let suffix = snapshot.get(printed..).unwrap_or(snapshot);
        print!("{suffix}");
        io::stdout().flush().ok();
        printed = snapshot.len();
    };
    let on_partial: Option<PartialCallback<'_>> = if stream { Some(&mut render) } else { None };

    let record = client
        .generate_record(&request, on_partial)
        .await
        .with_context(|| format!("{provider} generation failed"))?;

    if stream && printed > 0 {
        if !record.result_text.ends_with('\n') {
            println!();
        }
    } else {
        println!("{}", record.result_text);
    }

    if let Some(path) = &options.output {
        tokio::fs::write(path, &record.result_text)
            .await
            .with_context(|| format!("Failed to write prompt to {}", path.display()))?;
        eprintln!(
            "{} {}",
            style("Saved prompt to").green(),
            path.display()
        );
    }

    if options.record {
        let json = serde_json::to_string_pretty(&record.redacted())
            .context("Failed to serialize history record")?;
        println!("{json}");
    }

    Ok(())
}
