//! SiteWarden CLI
//!
//! Analyze page snapshots for scam and phishing patterns and manage
//! the trusted-site allowlist from the terminal.

use anyhow::{Context, Result};
use clap::Parser;
use sitewarden_gateway::{
    channel, GeminiConfig, GeminiProvider, ModelChannel, ModelGateway, ModelProvider,
};
use sitewarden_pipeline::{AnalysisOutcome, ClassificationPipeline, SettingsStore};
use std::sync::Arc;
use tracing::{info, warn};

mod cli;
mod config;
mod fetch;
mod sink;

use cli::{Cli, Commands, TrustCommands};
use config::{AppConfig, API_KEY_ENV};
use sink::TerminalSink;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    init_metrics();

    let config = AppConfig::load(&cli.config)?;
    let store = Arc::new(SettingsStore::open(config.settings_path())?);

    match cli.command {
        Commands::Analyze {
            url,
            file,
            allow_private,
        } => {
            let (page_url, html) = load_page(&config, url, file, allow_private).await?;
            analyze(&config, store, &page_url, &html).await?;
        }

        Commands::Trust { command } => match command {
            TrustCommands::Add { domain } => {
                store.add_trusted(&domain)?;
                println!("Trusted {}", domain.trim());
            }
            TrustCommands::Remove { domain } => {
                if store.remove_trusted(&domain)? {
                    println!("Removed {}", domain.trim());
                } else {
                    println!("{} was not in the allowlist", domain.trim());
                }
            }
            TrustCommands::List => {
                let settings = store.snapshot();
                if settings.trusted_sites.is_empty() {
                    println!("No trusted sites");
                } else {
                    for site in &settings.trusted_sites {
                        println!("{}", site);
                    }
                }
            }
        },

        Commands::Mode { mode } => {
            store.set_mode(mode)?;
            println!("Response mode set to {}", mode);
        }

        Commands::Ai { state } => {
            store.set_chat_analysis(state)?;
            println!("AI analysis {}", if state { "enabled" } else { "disabled" });
        }

        Commands::Status => {
            let settings = store.snapshot();
            let gateway = build_gateway(&config)?;
            let status = gateway.status().await;

            println!("Response mode:     {}", settings.mode);
            println!(
                "AI analysis:       {}",
                if settings.chat_analysis { "on" } else { "off" }
            );
            println!("Trusted sites:     {}", settings.trusted_sites.len());
            println!(
                "On-device model:   {}",
                if status.builtin_available {
                    "available"
                } else {
                    "unavailable"
                }
            );
            println!(
                "Cloud model:       {}",
                if config.resolve_api_key().is_some() {
                    "configured"
                } else {
                    "no API key"
                }
            );
        }
    }

    Ok(())
}

/// Resolve the snapshot to analyze from either a URL or a local file
async fn load_page(
    config: &AppConfig,
    url: Option<String>,
    file: Option<std::path::PathBuf>,
    allow_private: bool,
) -> Result<(String, String)> {
    match (url, file) {
        (Some(url), None) => {
            let validated = fetch::validate_page_url(&url, allow_private)?;
            let html = fetch::fetch_page(&validated, config.request_timeout()).await?;
            Ok((validated.to_string(), html))
        }
        (url, Some(path)) => {
            let html = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let page_url = url.unwrap_or_else(|| format!("file://{}", path.display()));
            Ok((page_url, html))
        }
        (None, None) => anyhow::bail!("analyze needs --url or --file"),
    }
}

async fn analyze(
    config: &AppConfig,
    store: Arc<SettingsStore>,
    page_url: &str,
    html: &str,
) -> Result<()> {
    let gateway = build_gateway(config)?;
    let (client, server) = channel::pair(gateway, config.channel_timeout(), 16);
    tokio::spawn(server.run());

    let pipeline = ClassificationPipeline::new(
        store,
        Arc::new(client) as Arc<dyn ModelChannel>,
        Arc::new(TerminalSink) as _,
    )?;

    match pipeline.analyze(page_url, html).await {
        AnalysisOutcome::Trusted => {
            println!("Trusted site, analysis skipped");
        }
        AnalysisOutcome::InFlight => {
            println!("An analysis is already running");
        }
        AnalysisOutcome::Completed {
            verdict,
            dispatched,
            source,
        } => {
            if !dispatched {
                println!("{}", verdict.reason);
            }
            if let Some(source) = source {
                info!(source = %source, "verdict source");
            }
        }
    }

    Ok(())
}

/// Assemble the provider fallback chain from configuration.
///
/// The CLI has no on-device engine, so the chain is the cloud provider
/// alone; without an API key the gateway runs empty and every analysis
/// falls back to the safe default.
fn build_gateway(config: &AppConfig) -> Result<Arc<ModelGateway>> {
    let mut providers: Vec<Arc<dyn ModelProvider>> = Vec::new();

    if let Some(api_key) = config.resolve_api_key() {
        let gemini = GeminiProvider::new(GeminiConfig {
            endpoint: config.endpoint.clone(),
            api_key,
            timeout: config.request_timeout(),
        })?;
        providers.push(Arc::new(gemini));
    } else {
        warn!(
            "no API key in {} or config file, verdicts will default to safe",
            API_KEY_ENV
        );
    }

    Ok(Arc::new(ModelGateway::new(providers)))
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("sitewarden=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sitewarden=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Register metric descriptions with the facade
fn init_metrics() {
    metrics::describe_counter!(
        "sitewarden_analyses_total",
        "Total number of page analyses started"
    );
    metrics::describe_counter!(
        "sitewarden_trusted_skips_total",
        "Analyses skipped because the domain was trusted"
    );
    metrics::describe_counter!(
        "sitewarden_verdicts_total",
        "Verdicts produced, labeled by suspicion"
    );
    metrics::describe_counter!(
        "sitewarden_provider_requests_total",
        "Model provider requests by provider"
    );
    metrics::describe_counter!(
        "sitewarden_provider_failures_total",
        "Model provider failures by provider"
    );
}
