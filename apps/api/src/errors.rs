use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// A single field-level violation, addressed by a dotted path
/// (`zones.headline_block.x`, `ci.accent`, `options.typography_scale`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub code: String,
    pub path: String,
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl FieldError {
    pub fn new(code: &str, path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            path: path.into(),
            msg: msg.into(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl ToString) -> Self {
        self.value = Some(value.to_string());
        self
    }
}

/// Errors raised by the geometry → style → prompt pipeline.
///
/// Everything except `InternalComposeFailure` reaches the caller; that one is
/// replaced by the fallback prompt at the composer boundary.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Layout '{layout_id}' not found")]
    ResourceNotFound { layout_id: String },

    #[error("Layout schema violation ({} errors)", .0.len())]
    SchemaViolation(Vec<FieldError>),

    #[error("Palette or style options invalid ({} errors)", .0.len())]
    PaletteOrOptionInvalid(Vec<FieldError>),

    #[error("{stage} input has not been validated")]
    PreconditionNotCertified { stage: &'static str },

    #[error("Prompt composition failed: {0}")]
    InternalComposeFailure(String),
}

impl PipelineError {
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::ResourceNotFound { .. } => "RESOURCE_NOT_FOUND",
            PipelineError::SchemaViolation(_) => "SCHEMA_VIOLATION",
            PipelineError::PaletteOrOptionInvalid(_) => "PALETTE_OR_OPTION_INVALID",
            PipelineError::PreconditionNotCertified { .. } => "PRECONDITION_NOT_CERTIFIED",
            PipelineError::InternalComposeFailure(_) => "INTERNAL_COMPOSE_FAILURE",
        }
    }

    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            PipelineError::SchemaViolation(errors)
            | PipelineError::PaletteOrOptionInvalid(errors) => errors,
            _ => &[],
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                vec![],
            ),
            AppError::Pipeline(err) => {
                let status = match err {
                    PipelineError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
                    PipelineError::SchemaViolation(_)
                    | PipelineError::PaletteOrOptionInvalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    PipelineError::PreconditionNotCertified { .. } => StatusCode::CONFLICT,
                    PipelineError::InternalComposeFailure(msg) => {
                        tracing::error!("Compose failure escaped the composer: {msg}");
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, err.code(), err.to_string(), err.field_errors().to_vec())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    vec![],
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if !details.is_empty() {
            error["details"] = json!(details);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
