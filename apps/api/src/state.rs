use std::sync::Arc;

use crate::config::Config;
use crate::pipeline::Pipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Catalogue, memo caches and resolver. Read-only apart from the caches.
    pub pipeline: Arc<Pipeline>,
    pub config: Config,
}
