use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use super::{GenerateResponse, HealthResponse, StylesQuery, VoicesQuery, VoicesResponse};
use crate::api::routes::AppState;
use crate::config::StyleTemplates;
use crate::error::AppError;
use crate::mcp::dispatcher::GenerateArgs;

pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateArgs>,
) -> Result<Json<GenerateResponse>, AppError> {
    let path = state.tts.generate(request.into()).await?;
    Ok(Json(GenerateResponse {
        path: path.display().to_string(),
    }))
}

pub async fn list_voices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VoicesQuery>,
) -> Json<VoicesResponse> {
    Json(VoicesResponse {
        voices: state.tts.list_voices(query.count),
    })
}

pub async fn list_styles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StylesQuery>,
) -> Json<StyleTemplates> {
    Json(state.tts.list_styles(query.detail.unwrap_or(false)))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::api::routes::{create_router, AppState};
    use crate::config::document::tests::{write_config, SAMPLE};
    use crate::tts::testing::{service, FakeBackend};

    fn router(dir: &std::path::Path, key: Option<&str>) -> axum::Router {
        let config = write_config(dir, SAMPLE);
        let tts = Arc::new(service(
            &config,
            key,
            Arc::new(FakeBackend::new("web clip", &[0, 0])),
        ));
        create_router(Arc::new(AppState { tts }))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_version() {
        let dir = tempfile::tempdir().unwrap();
        let response = router(dir.path(), None)
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn voices_endpoint_honours_count() {
        let dir = tempfile::tempdir().unwrap();
        let response = router(dir.path(), None)
            .oneshot(Request::get("/api/voices?count=3").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["voices"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn styles_endpoint_hides_prompts_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let response = router(dir.path(), None)
            .oneshot(Request::get("/api/styles").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert!(body["news_anchor"].get("prompt").is_none());
        assert_eq!(body["news_anchor"]["style"], "Generate in a formal news-reporting tone");
    }

    #[tokio::test]
    async fn generate_endpoint_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let response = router(dir.path(), Some("key"))
            .oneshot(post_json(
                "/api/generate",
                json!({ "content": "Hello web", "directory": dir.path() }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let expected = dir.path().join("web_clip.wav");
        assert_eq!(body["path"], expected.display().to_string());
        assert!(expected.exists());
    }

    #[tokio::test]
    async fn generate_endpoint_maps_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let response = router(dir.path(), None)
            .oneshot(post_json(
                "/api/generate",
                json!({ "content": "Hello", "directory": dir.path() }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["code"], "AUTH_ERROR");
    }

    #[tokio::test]
    async fn mcp_endpoint_opens_a_session() {
        let dir = tempfile::tempdir().unwrap();
        let request = Request::builder()
            .method("POST")
            .uri("/mcp")
            .header(header::HOST, "localhost")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json, text/event-stream")
            .body(Body::from(
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "method": "initialize",
                    "params": {
                        "protocolVersion": "2024-11-05",
                        "capabilities": {},
                        "clientInfo": { "name": "test", "version": "0" }
                    }
                })
                .to_string(),
            ))
            .unwrap();

        let response = router(dir.path(), None).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("mcp-session-id"));
    }
}
