//! tabmonitord: tab monitor relay daemon.
//!
//! Serves the [`Analyzer`](tabmonitor::Analyzer) over local HTTP for the
//! browser extension, keeping provider credentials out of the browser.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use tabmonitor::server::config::{self, Config, Secrets};
use tabmonitor::{AnalysisCache, Analyzer, ChatProvider, FallbackResponder, GroqClient};

/// Tab monitor relay daemon.
#[derive(Parser)]
#[command(name = "tabmonitord")]
#[command(version = tabmonitor::PKG_VERSION)]
#[command(about = "Local analysis relay for the tab monitor browser extension")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind to, overriding the configuration file.
    #[arg(short, long, env = "TABMONITOR_ADDRESS")]
    address: Option<String>,

    /// Path to a .env file (default: search the working directory).
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Keep the analysis cache in memory only.
    #[arg(long)]
    no_persist: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    config::load_env_file(args.env_file.as_deref())?;
    let config = Config::load(args.config.as_deref())?;
    let secrets = Secrets::load()?;

    let analyzer = build_analyzer(&config, &secrets, args.no_persist).await?;

    // Parse address
    let address = args.address.as_deref().unwrap_or(&config.server.address);
    let addr: SocketAddr = address.parse().map_err(|e| {
        tabmonitor::RelayError::Configuration(format!("Invalid address {address:?}: {e}"))
    })?;

    let listener = TcpListener::bind(addr).await?;
    let build = tabmonitor::BuildInfo::current();
    info!(version = build.label(), release = build.is_release_tree(), %addr, "tabmonitord starting");

    tabmonitor::server::serve_with_shutdown(listener, Arc::new(analyzer), async {
        let _ = tokio::signal::ctrl_c().await;
        info!("shutting down");
    })
    .await?;

    Ok(())
}

/// Build an [`Analyzer`] from configuration.
async fn build_analyzer(
    config: &Config,
    secrets: &Secrets,
    no_persist: bool,
) -> Result<Analyzer, tabmonitor::RelayError> {
    let mut builder = Analyzer::builder().config(config.analyzer_config());

    // Only register the provider when a key is available
    match secrets.groq_api_key() {
        Some(key) => {
            info!(key = %config::mask_key(&key), base_url = %config.provider.base_url, "using Groq provider");
            let client = GroqClient::with_options(
                key,
                &config.provider.base_url,
                Duration::from_secs(config.provider.timeout_secs),
            );
            builder = builder.provider(Arc::new(client) as Arc<dyn ChatProvider>);
        }
        None => warn!(
            "no {} configured, serving fallback analyses only",
            config::GROQ_API_KEY_ENV
        ),
    }

    let cache = if config.cache.persist && !no_persist {
        AnalysisCache::load(config.cache.path.clone()).await
    } else {
        info!("cache persistence disabled");
        AnalysisCache::in_memory()
    };
    info!(entries = cache.len(), "analysis cache ready");

    builder
        .cache(cache)
        .fallback(FallbackResponder::with_rules_prepended(
            config.fallback.rules.clone(),
        ))
        .build()
}
