use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::layout::catalogue::LayoutSummary;
use crate::layout::engine::{SliderValue, DEFAULT_RATIO, DEFAULT_TRANSPARENCY};
use crate::layout::model::LayoutDocument;
use crate::pipeline::{CreativeRequest, CreativeResponse};
use crate::state::AppState;

#[derive(Serialize)]
pub struct LayoutListResponse {
    pub layouts: Vec<LayoutSummary>,
    pub total: usize,
}

/// Sliders arrive as query strings; parsing and clamping happen in the engine.
#[derive(Deserialize)]
pub struct SliderQuery {
    pub ratio: Option<String>,
    pub transparency: Option<String>,
}

impl SliderQuery {
    fn ratio(&self) -> SliderValue {
        self.ratio
            .as_deref()
            .map(SliderValue::from)
            .unwrap_or_else(|| DEFAULT_RATIO.into())
    }

    fn transparency(&self) -> SliderValue {
        self.transparency
            .as_deref()
            .map(SliderValue::from)
            .unwrap_or_else(|| DEFAULT_TRANSPARENCY.into())
    }
}

#[derive(Serialize)]
pub struct CreativeEnvelope {
    pub request_id: Uuid,
    #[serde(flatten)]
    pub creative: CreativeResponse,
}

/// GET /api/v1/layouts
pub async fn handle_list_layouts(State(state): State<AppState>) -> Json<LayoutListResponse> {
    let layouts = state.pipeline.catalogue().list();
    Json(LayoutListResponse {
        total: layouts.len(),
        layouts,
    })
}

/// GET /api/v1/layouts/:id
pub async fn handle_preview_layout(
    State(state): State<AppState>,
    Path(layout_id): Path<String>,
    Query(sliders): Query<SliderQuery>,
) -> Result<Json<LayoutDocument>, AppError> {
    let doc = state
        .pipeline
        .preview(&layout_id, &sliders.ratio(), &sliders.transparency())?;
    Ok(Json(doc))
}

/// POST /api/v1/creatives
pub async fn handle_create_creative(
    State(state): State<AppState>,
    Json(req): Json<CreativeRequest>,
) -> Result<Json<CreativeEnvelope>, AppError> {
    if req.layout_id.trim().is_empty() {
        return Err(AppError::Validation("layout_id must not be empty".to_string()));
    }

    let request_id = Uuid::new_v4();
    info!("Creative request {request_id} for layout '{}'", req.layout_id);

    // CPU-bound; keep it off the async workers.
    let pipeline = state.pipeline.clone();
    let creative = tokio::task::spawn_blocking(move || pipeline.run(&req))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in pipeline: {e}")))??;

    Ok(Json(CreativeEnvelope {
        request_id,
        creative,
    }))
}
