//! COVID-19 Dashboard server
//!
//! Loads the dataset once, builds the derived views and serves the dashboard
//! until Ctrl+C or SIGTERM.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use covid_dashboard::api::{serve, AppState};
use covid_dashboard::config::{Config, LoggingConfig};
use covid_dashboard::data::DerivedViews;

#[derive(Parser)]
#[command(name = "covid-dashboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interactive COVID-19 dashboard")]
struct Args {
    /// Config file (default: search standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dataset CSV, overrides the config file
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default()?,
    };
    if let Some(data) = &args.data {
        config.data.path = data.display().to_string();
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    init_tracing(&config.logging);
    for warning in &config.warnings {
        tracing::warn!("{}", warning);
    }

    tracing::info!("COVID-19 Dashboard v{}", env!("CARGO_PKG_VERSION"));

    let data_path = Path::new(&config.data.path);
    let views = DerivedViews::load(data_path)
        .with_context(|| format!("failed to load dataset {}", data_path.display()))?;

    let api_config = config.server.to_api_config();
    let state = AppState::new(Arc::new(views), api_config.clone());

    serve(state, &api_config).await?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("covid_dashboard={},tower_http={}", logging.level, logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
