use axum::{
    http::{header, HeaderName, Method},
    routing::{get, post},
    Router,
};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpService,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use crate::mcp::TtsServer;
use crate::tts::TtsService;

const MCP_SESSION_ID: HeaderName = HeaderName::from_static("mcp-session-id");

pub struct AppState {
    pub tts: Arc<TtsService>,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, MCP_SESSION_ID])
        .expose_headers([MCP_SESSION_ID]);

    let tts = Arc::clone(&state.tts);
    let mcp_service = StreamableHttpService::new(
        move || Ok(TtsServer::new(Arc::clone(&tts))),
        Arc::new(LocalSessionManager::default()),
        Default::default(),
    );

    let api_routes = Router::new()
        .route("/generate", post(handlers::generate))
        .route("/voices", get(handlers::list_voices))
        .route("/styles", get(handlers::list_styles))
        .route("/health", get(handlers::health));

    Router::new()
        .nest_service("/mcp", mcp_service)
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
