use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::config::Settings;
use crate::error::AppError;

/// A `generateContent`-style model endpoint.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate_content(&self, model: &str, body: &Value) -> Result<Value, AppError>;
}

/// Build the upstream HTTP client, routing through an explicit proxy when one is set.
pub fn build_http_client(proxy: Option<&str>) -> Result<reqwest::Client, AppError> {
    let mut builder = reqwest::Client::builder().pool_max_idle_per_host(10);
    if let Some(url) = proxy {
        builder = builder.proxy(reqwest::Proxy::all(url)?);
    }
    Ok(builder.build()?)
}

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        let http = build_http_client(settings.proxy.as_deref())?;
        Ok(Self::new(
            http,
            settings.base_url.clone(),
            settings.api_key.clone(),
        ))
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate_content(&self, model: &str, body: &Value) -> Result<Value, AppError> {
        let api_key = self.api_key.as_deref().ok_or(AppError::CredentialMissing)?;
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        debug!(model, "Gemini generate_content");

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(AppError::from_status(status.as_u16(), &body_text));
        }

        Ok(resp.json().await?)
    }
}
