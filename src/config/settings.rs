use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::error::AppError;

pub const DEFAULT_NAME_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const DEFAULT_VOICE: &str = "Kore";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Stdio,
    Http,
}

/// Process-wide settings, read once at startup and shared by reference.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: Option<String>,
    pub name_model: String,
    pub tts_model: String,
    pub default_voice: String,
    pub base_url: String,
    pub config_path: PathBuf,
    pub transport: TransportKind,
    pub host: String,
    pub port: u16,
    pub proxy: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let transport = match get("MCP_TRANSPORT").as_deref() {
            None | Some("stdio") => TransportKind::Stdio,
            Some("http") => TransportKind::Http,
            Some(other) => {
                return Err(AppError::ConfigUnavailable(format!(
                    "MCP_TRANSPORT must be 'stdio' or 'http', got '{}'",
                    other
                )))
            }
        };

        let port = match get("PORT") {
            Some(raw) => raw.parse().map_err(|_| {
                AppError::ConfigUnavailable(format!("PORT must be a number, got '{}'", raw))
            })?,
            None => 3000,
        };

        Ok(Self {
            api_key: get("GOOGLE_API_KEY"),
            name_model: get("GOOGLE_NAME_MODEL").unwrap_or_else(|| DEFAULT_NAME_MODEL.into()),
            tts_model: get("GOOGLE_TTS_MODEL").unwrap_or_else(|| DEFAULT_TTS_MODEL.into()),
            default_voice: get("GOOGLE_VOICE").unwrap_or_else(|| DEFAULT_VOICE.into()),
            base_url: get("GOOGLE_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            config_path: get("TTS_CONFIG")
                .unwrap_or_else(|| DEFAULT_CONFIG_PATH.into())
                .into(),
            transport,
            host: get("HOST").unwrap_or_else(|| "127.0.0.1".into()),
            port,
            proxy: get("HTTPS_PROXY").or_else(|| get("HTTP_PROXY")),
        })
    }

    /// Bind address; `HOST` is an IPv4 or IPv6 literal, or `localhost`.
    pub fn http_addr(&self) -> Result<SocketAddr, AppError> {
        let host = self.host.trim_start_matches('[').trim_end_matches(']');
        let ip = if host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            host.parse::<IpAddr>().map_err(|_| {
                AppError::ConfigUnavailable(format!("Invalid HOST address: {}", self.host))
            })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }

    /// The API key, or `CredentialMissing` when none is configured.
    pub fn require_api_key(&self) -> Result<&str, AppError> {
        self.api_key.as_deref().ok_or(AppError::CredentialMissing)
    }
}
