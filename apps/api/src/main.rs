mod cache;
mod config;
mod errors;
mod layout;
mod pipeline;
mod prompt;
mod routes;
mod state;
mod style;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::layout::Catalogue;
use crate::pipeline::Pipeline;
use crate::routes::build_router;
use crate::state::AppState;

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

    info!("Starting Creative API v{}", env!("CARGO_PKG_VERSION"));

    // Template catalogue is read once, before any request is served.
    let catalogue = match &config.templates_path {
        Some(path) => Catalogue::from_path(path)?,
        None => Catalogue::builtin()?,
    };
    info!(
        "Layout catalogue ready: {} templates ({})",
        catalogue.len(),
        config.templates_path.as_deref().unwrap_or("built-in")
    );

    let pipeline = Pipeline::new(catalogue, &config);
    info!(
        "Pipeline initialized (geometry cache {}, contrast cache {}, enforce zone requirements: {})",
        config.geometry_cache_capacity,
        config.contrast_cache_capacity,
        config.enforce_zone_requirements
    );

    let state = AppState {
        pipeline: Arc::new(pipeline),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
