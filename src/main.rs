use std::sync::Arc;

use clap::Parser;
use tracing::{Level, info, warn};

use aura::analyzer::Backend;
use aura::analyzer::openai::OpenAiBackend;
use aura::config::{Config, Provider};
use aura::server::{self, AppState};

#[derive(Parser)]
#[command(name = "aura", version, about = "Sentiment Aura API — LLM-backed sentiment analysis.")]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let cli = Cli::parse();
    let config = Config::from_env();

    // Only the OpenAI backend is wired up; any other selector leaves the
    // service answering but unconfigured.
    let backend: Option<Arc<dyn Backend>> = match (config.provider, config.api_key.as_deref()) {
        (Provider::OpenAi, Some(key)) => Some(Arc::new(OpenAiBackend::new(key.to_string()))),
        _ => None,
    };

    info!("Sentiment Aura API v{} starting", env!("CARGO_PKG_VERSION"));
    info!(
        "using api: {}, configured: {}",
        config.provider.as_str(),
        config.api_configured()
    );
    if backend.is_none() {
        warn!(
            "{} not set — /process_text will answer 500 until it is",
            config.provider.key_var()
        );
    }

    let addr = format!("{}:{}", cli.host, cli.port);
    server::run(AppState::new(config, backend), &addr).await
}
