use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::AppError;

pub const DEFAULT_NAME_PROMPT: &str =
    "Generate a short, descriptive filename for this text content (without extension): ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleTemplate {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub style: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl StyleTemplate {
    /// Copy without the full prompt, for non-detailed listings.
    pub fn summary(&self) -> StyleTemplate {
        StyleTemplate {
            description: self.description.clone(),
            style: self.style.clone(),
            prompt: None,
        }
    }
}

pub type StyleTemplates = BTreeMap<String, StyleTemplate>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleTtsSection {
    #[serde(default)]
    pub name_prompt: Option<String>,
    #[serde(default)]
    pub voices: Option<Vec<VoiceDescriptor>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub google_tts: Option<GoogleTtsSection>,
    #[serde(default)]
    pub speech_styles: Option<StyleTemplates>,
}

impl ConfigDocument {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn voices(&self) -> Result<Vec<VoiceDescriptor>, AppError> {
        self.google_tts
            .as_ref()
            .and_then(|s| s.voices.clone())
            .ok_or_else(|| {
                AppError::ConfigUnavailable("Invalid config file structure: no google_tts.voices".into())
            })
    }

    pub fn styles(&self) -> StyleTemplates {
        self.speech_styles.clone().unwrap_or_default()
    }

    pub fn name_prompt(&self) -> &str {
        self.google_tts
            .as_ref()
            .and_then(|s| s.name_prompt.as_deref())
            .unwrap_or(DEFAULT_NAME_PROMPT)
    }
}

/// Reads the configuration document from disk on every call.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<ConfigDocument, AppError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            AppError::ConfigUnavailable(format!("{}: {}", self.path.display(), e))
        })?;
        ConfigDocument::parse(&raw).map_err(|e| {
            AppError::ConfigUnavailable(format!("{}: {}", self.path.display(), e))
        })
    }

    /// Load the document, degrading to an empty one when it is unavailable.
    pub fn load_or_default(&self) -> ConfigDocument {
        match self.load() {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!("Error reading config file: {}", e);
                ConfigDocument::default()
            }
        }
    }

    pub fn voices(&self) -> Vec<VoiceDescriptor> {
        match self.load().and_then(|doc| doc.voices()) {
            Ok(voices) => voices,
            Err(e) => {
                tracing::warn!("Error reading voices from config: {}", e);
                Vec::new()
            }
        }
    }

    pub fn styles(&self) -> StyleTemplates {
        self.load_or_default().styles()
    }
}
