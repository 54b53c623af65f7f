use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Config unavailable: {0}")]
    ConfigUnavailable(String),

    #[error("Google AI API key not configured. Please set GOOGLE_API_KEY.")]
    CredentialMissing,

    #[error("Google AI API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Google AI authentication failed: {0}")]
    Authentication(String),

    #[error("Google AI rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("No audio data received from Google AI. Check API response structure.")]
    MissingAudioData,

    #[error("Tool not found")]
    ToolNotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("MCP service error: {0}")]
    Mcp(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("WAV encoding failed: {0}")]
    WavError(#[from] hound::Error),

    #[error("Invalid base64 audio payload: {0}")]
    Base64Error(#[from] base64::DecodeError),
}

impl AppError {
    /// Map a non-success upstream status to the matching variant.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => AppError::Authentication(body.to_string()),
            429 => AppError::RateLimited(body.to_string()),
            _ => AppError::Api {
                status,
                message: body.to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::InvalidArguments(_) | AppError::JsonError(_) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST")
            }
            AppError::ToolNotFound(_) => (StatusCode::NOT_FOUND, "TOOL_NOT_FOUND"),
            AppError::CredentialMissing | AppError::Authentication(_) => {
                (StatusCode::UNAUTHORIZED, "AUTH_ERROR")
            }
            AppError::RateLimited(_) => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
            AppError::Api { .. } | AppError::Network(_) | AppError::MissingAudioData => {
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR")
            }
            AppError::ConfigUnavailable(_) | AppError::YamlError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR")
            }
            AppError::IoError(_)
            | AppError::WavError(_)
            | AppError::Base64Error(_)
            | AppError::Mcp(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR")
            }
        };
        let message = self.to_string();

        tracing::error!("Request failed: {} - {}", code, message);

        (
            status,
            Json(ErrorResponse {
                error: message,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}
