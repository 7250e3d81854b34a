use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version and catalogue/cache counters.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let geometry = state.pipeline.geometry_stats();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "creative-api",
        "layouts": state.pipeline.catalogue().len(),
        "geometry_cache": geometry,
        "contrast_cache": state.pipeline.contrast_stats(),
        "zone_requirements_enforced": state.config.enforce_zone_requirements,
    }))
}
