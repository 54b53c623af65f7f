use std::sync::Arc;

use rmcp::ServiceExt;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod gemini;
mod mcp;
mod tts;

use api::routes::{create_router, AppState};
use config::{Settings, TransportKind};
use error::AppError;
use gemini::GeminiClient;
use mcp::TtsServer;
use tts::TtsService;

#[tokio::main]
async fn main() {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    // Logs go to stderr; stdout carries the protocol in stdio mode
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let settings = Arc::new(Settings::from_env()?);

    tracing::info!("Gemini TTS MCP Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Config file: {}", settings.config_path.display());
    if settings.api_key.is_none() {
        tracing::warn!("GOOGLE_API_KEY is not set; generate will fail until it is");
    }
    if let Some(proxy) = &settings.proxy {
        tracing::info!("Using upstream proxy: {}", proxy);
    }

    let backend = Arc::new(GeminiClient::from_settings(&settings)?);
    let tts = Arc::new(TtsService::new(Arc::clone(&settings), backend));

    match settings.transport {
        TransportKind::Stdio => {
            tracing::info!("TTS MCP Server running on stdio");
            let service = TtsServer::new(tts)
                .serve(rmcp::transport::stdio())
                .await
                .map_err(|e| AppError::Mcp(e.to_string()))?;
            let reason = service
                .waiting()
                .await
                .map_err(|e| AppError::Mcp(e.to_string()))?;
            tracing::info!("MCP session ended: {:?}", reason);
            Ok(())
        }
        TransportKind::Http => {
            let addr = settings.http_addr()?;
            tracing::info!("Starting server on http://{}", addr);

            let app = create_router(Arc::new(AppState { tts }));
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
            Ok(())
        }
    }
}
