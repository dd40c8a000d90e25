mod analysis;
mod config;
mod errors;
mod intake;
mod llm_client;
mod models;
mod routes;
mod session;
mod state;
mod views;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::{fallback_policy, Analyzer};
use crate::config::{Config, FallbackMode};
use crate::routes::build_router;
use crate::state::AppState;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting rescheck v{}", env!("CARGO_PKG_VERSION"));

    // Credential is resolved once here; the analyzer never reads the environment
    let analyzer = Analyzer::from_credential(&config.credential)
        .context("Failed to build the Gemini client")?
        .with_fallback(fallback_policy(config.fallback));
    if analyzer.is_live() {
        info!("Analyzer initialized (model: {})", llm_client::MODEL);
    } else {
        warn!("API_KEY is missing, running in demo mode with mock analysis");
    }
    if config.fallback == FallbackMode::Surface {
        warn!("ANALYSIS_FALLBACK=surface: failed analyses are reported instead of mocked");
    }

    let state = AppState::new(Arc::new(analyzer), config.clone());
    state.sessions.spawn_sweeper(SESSION_SWEEP_INTERVAL);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
