pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::pipeline::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Catalogue
        .route("/api/v1/layouts", get(handlers::handle_list_layouts))
        .route("/api/v1/layouts/:id", get(handlers::handle_preview_layout))
        // Composed operation
        .route("/api/v1/creatives", post(handlers::handle_create_creative))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::layout::catalogue::Catalogue;
    use crate::pipeline::Pipeline;

    fn app() -> Router {
        let config = Config::default();
        let pipeline = Pipeline::new(Catalogue::builtin().unwrap(), &config);
        build_router(AppState {
            pipeline: Arc::new(pipeline),
            config,
        })
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn creative_body() -> Value {
        json!({
            "layout_id": "vertical-split",
            "ratio": "50",
            "transparency": 80,
            "ci": {
                "primary": "#005EA5",
                "secondary": "#B4D9F7",
                "accent": "#FFC20E",
                "background": "#FFFFFF"
            },
            "options": {
                "typography_scale": "md",
                "container_shape": "rounded_rectangle",
                "border_style": "soft_shadow",
                "corner_radius_px": 16,
                "transparency_pct": 80,
                "accent_elements": ["divider", "badge"]
            },
            "copy": {
                "headline": "Dein Rhythmus. Dein Job.",
                "cta": "Jetzt bewerben",
                "benefits": "Tarifgehalt\nJobrad"
            }
        })
    }

    // ── health / catalogue ──

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["layouts"], 10);
        assert_eq!(body["contrast_cache"]["entries"], 0);
        assert!(body["contrast_cache"]["capacity"].as_u64().unwrap() >= 1);
    }

    #[tokio::test]
    async fn test_list_layouts() {
        let (status, body) = send(get("/api/v1/layouts")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 10);
        assert_eq!(body["layouts"][0]["layout_id"], "hero");
        assert!(body["layouts"][0]["expected_zones"].is_array());
    }

    #[tokio::test]
    async fn test_preview_layout_clamps_sliders() {
        let (status, body) = send(get("/api/v1/layouts/vertical-split?ratio=95&transparency=abc")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["certified"], true);
        assert_eq!(body["calculated_values"]["image_text_ratio"], 70);
        assert_eq!(body["calculated_values"]["text_width"], 350);
        assert_eq!(body["calculated_values"]["container_transparency"], 0.8);
    }

    #[tokio::test]
    async fn test_preview_unknown_layout_is_404() {
        let (status, body) = send(get("/api/v1/layouts/skizze99")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
    }

    // ── creatives ──

    #[tokio::test]
    async fn test_create_creative() {
        let (status, body) = send(post_json("/api/v1/creatives", creative_body())).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["request_id"].is_string());
        assert_eq!(body["calculated_values"]["text_width"], 480);
        assert_eq!(body["calculated_values"]["image_width"], 540);
        assert_eq!(body["prompt_mode"], "placeholder");
        assert_eq!(body["zones"]["headline_block"]["bound_text"], "Dein Rhythmus. Dein Job.");
        assert_eq!(body["zones"]["benefits_block"]["bound_text"], "Tarifgehalt\nJobrad");
        assert!(body["zones"]["image_motiv"].get("container").is_none());
        assert!(body["prompt"]["text"]
            .as_str()
            .unwrap()
            .contains("CI palette: primary #005EA5, secondary #B4D9F7, accent #FFC20E, background #FFFFFF"));
    }

    #[tokio::test]
    async fn test_invalid_palette_lists_field_errors() {
        let mut body = creative_body();
        body["ci"]["accent"] = json!("yellow");
        body["options"]["typography_scale"] = json!("xl");
        let (status, body) = send(post_json("/api/v1/creatives", body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "PALETTE_OR_OPTION_INVALID");
        let details = body["error"]["details"].as_array().unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(details[0]["path"], "ci.accent");
        assert_eq!(details[1]["path"], "options.typography_scale");
    }

    #[tokio::test]
    async fn test_empty_layout_id_rejected() {
        let mut body = creative_body();
        body["layout_id"] = json!(" ");
        let (status, body) = send(post_json("/api/v1/creatives", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_embed_mode_over_http() {
        let mut body = creative_body();
        body["mode"] = json!("embed");
        let (status, body) = send(post_json("/api/v1/creatives", body)).await;
        assert_eq!(status, StatusCode::OK);
        let text = body["prompt"]["text"].as_str().unwrap();
        assert!(text.contains("• HEADLINE: \"Dein Rhythmus. Dein Job.\""));
        assert!(!text.contains("NO TEXT IN IMAGE"));
    }
}
