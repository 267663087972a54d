//! Ingestor Service - Main Entry Point
//!
//! Sentence segmentation and block flattening over HTTP.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ingestor::api::{self, AppState};
use ingestor::types::IngestorConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "ingestor=info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = IngestorConfig::from_env();

    info!("Starting Ingestor Service v{}", env!("CARGO_PKG_VERSION"));
    info!(
        max_line_chars = config.tokenizer.max_line_chars,
        extra_abbreviations = config.tokenizer.extra_abbreviations.len(),
        flatten_merged_table = config.flatten_merged_table,
        normalize_kangxi = config.normalize_kangxi,
        "Loaded configuration"
    );

    let port = config.port;
    let state = Arc::new(AppState::new(config)?);
    info!(detector = state.tokenizer.detector_name(), "Tokenizer ready");

    let app = api::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
