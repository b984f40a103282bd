//! geotag-ui - photo geotagging web service
//!
//! Combines embedded camera GPS, recorded track logs and manual placement
//! into one authoritative location per photo, served over a local HTTP API.

use anyhow::Result;
use clap::Parser;
use geotag_common::config::ConfigManager;
use geotag_ui::{build_router, AppState};
use std::path::PathBuf;
use tracing::info;

/// Photo geotagging service
#[derive(Debug, Parser)]
#[command(name = "geotag-ui", version, about)]
struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind to
    #[arg(long, default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing subscriber before anything else logs
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting geotag-ui v{}", env!("CARGO_PKG_VERSION"));

    // Config file resolution: CLI argument, then environment variable, then
    // the platform default location
    let config_file = args
        .config
        .or_else(|| std::env::var("GEOTAG_CONFIG").ok().map(PathBuf::from))
        .or_else(geotag_common::config::default_config_path);
    if let Some(path) = &config_file {
        info!("Using configuration file: {}", path.display());
    }

    let config = ConfigManager::new(config_file);
    let state = AppState::new(config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port)).await?;
    info!("geotag-ui listening on http://{}:{}", args.host, args.port);
    info!("Health check: http://{}:{}/health", args.host, args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
