pub mod handlers;
pub mod routes;

use serde::{Deserialize, Serialize};

use crate::config::VoiceDescriptor;

#[derive(Debug, Deserialize)]
pub struct VoicesQuery {
    pub count: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct StylesQuery {
    pub detail: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct VoicesResponse {
    pub voices: Vec<VoiceDescriptor>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
