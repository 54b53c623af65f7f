pub mod filename;
pub mod style;
pub mod wav;

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{ConfigStore, Settings, StyleTemplate, StyleTemplates, VoiceDescriptor};
use crate::error::AppError;
use crate::gemini::{self, GenerativeBackend};

/// One `generate` invocation.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub text: String,
    pub voice: Option<String>,
    pub directory: Option<PathBuf>,
    pub style: Option<String>,
}

pub struct TtsService {
    settings: Arc<Settings>,
    config: ConfigStore,
    backend: Arc<dyn GenerativeBackend>,
}

impl TtsService {
    pub fn new(settings: Arc<Settings>, backend: Arc<dyn GenerativeBackend>) -> Self {
        let config = ConfigStore::new(settings.config_path.clone());
        Self {
            settings,
            config,
            backend,
        }
    }

    /// Synthesize `request.text` and write it as a WAV file, returning its absolute path.
    pub async fn generate(&self, request: GenerationRequest) -> Result<PathBuf, AppError> {
        if request.text.is_empty() {
            return Err(AppError::InvalidArguments("content cannot be empty".into()));
        }

        // 1. Resolve style against the current templates
        let doc = self.config.load_or_default();
        let style = style::resolve(request.style.as_deref(), &doc.styles());

        self.settings.require_api_key()?;

        let directory = resolve_directory(request.directory)?;
        let voice = request
            .voice
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| self.settings.default_voice.clone());

        // 2. Name the output
        let filename = filename::derive_filename(
            self.backend.as_ref(),
            &self.settings.name_model,
            doc.name_prompt(),
            &request.text,
        )
        .await?;
        let path = directory.join(filename);

        // 3. Synthesize
        let styled = style::apply(&style, &request.text);
        tracing::info!(voice = %voice, path = %path.display(), "Generating speech");
        let response = self
            .backend
            .generate_content(
                &self.settings.tts_model,
                &gemini::speech_request(&styled, &voice),
            )
            .await?;

        // 4. Decode and write
        let pcm = gemini::extract_audio(&response)?;
        let target = path.clone();
        tokio::task::spawn_blocking(move || wav::write_pcm16(&target, &pcm))
            .await
            .map_err(|e| AppError::IoError(std::io::Error::other(e)))??;

        tracing::info!("Saved audio to {}", path.display());
        Ok(path)
    }

    /// Configured voices, truncated to the first `count` when `count` is positive.
    pub fn list_voices(&self, count: Option<usize>) -> Vec<VoiceDescriptor> {
        let mut voices = self.config.voices();
        if let Some(n) = count.filter(|n| *n > 0) {
            voices.truncate(n);
        }
        voices
    }

    /// Style templates; without `detail` every entry drops its full prompt.
    pub fn list_styles(&self, detail: bool) -> StyleTemplates {
        let styles = self.config.styles();
        if detail {
            styles
        } else {
            styles
                .iter()
                .map(|(name, template)| (name.clone(), template.summary()))
                .collect()
        }
    }

    pub fn style(&self, name: &str) -> Option<StyleTemplate> {
        self.config.styles().remove(name)
    }
}

fn resolve_directory(directory: Option<PathBuf>) -> Result<PathBuf, AppError> {
    let cwd = std::env::current_dir()?;
    Ok(match directory {
        Some(dir) if dir.as_os_str().is_empty() => cwd,
        Some(dir) if dir.is_absolute() => dir,
        Some(dir) => cwd.join(dir),
        None => cwd,
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde_json::{json, Value};

    use super::TtsService;
    use crate::config::Settings;
    use crate::error::AppError;
    use crate::gemini::GenerativeBackend;

    pub const NAME_MODEL: &str = "test-name-model";
    pub const TTS_MODEL: &str = "test-tts-model";

    /// Answers naming calls with `name_reply` and speech calls with `speech_reply`.
    pub struct FakeBackend {
        pub calls: Mutex<Vec<(String, Value)>>,
        pub name_reply: Value,
        pub speech_reply: Value,
        pub fail_status: Option<u16>,
    }

    impl FakeBackend {
        pub fn new(name: &str, pcm: &[u8]) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                name_reply: json!({
                    "candidates": [{ "content": { "parts": [{ "text": name }] } }]
                }),
                speech_reply: json!({
                    "candidates": [{
                        "content": { "parts": [{ "inlineData": { "mimeType": "audio/L16", "data": STANDARD.encode(pcm) } }] }
                    }]
                }),
                fail_status: None,
            }
        }

        pub fn failing(status: u16) -> Self {
            Self {
                fail_status: Some(status),
                ..Self::new("unused", &[])
            }
        }

        pub fn calls(&self) -> Vec<(String, Value)> {
            self.calls.lock().unwrap().clone()
        }

        pub fn speech_texts(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter(|(model, _)| model == TTS_MODEL)
                .map(|(_, body)| {
                    body["contents"][0]["parts"][0]["text"]
                        .as_str()
                        .unwrap_or_default()
                        .to_string()
                })
                .collect()
        }
    }

    #[async_trait]
    impl GenerativeBackend for FakeBackend {
        async fn generate_content(&self, model: &str, body: &Value) -> Result<Value, AppError> {
            self.calls
                .lock()
                .unwrap()
                .push((model.to_string(), body.clone()));
            if let Some(status) = self.fail_status {
                return Err(AppError::from_status(status, "upstream unavailable"));
            }
            if model == NAME_MODEL {
                Ok(self.name_reply.clone())
            } else {
                Ok(self.speech_reply.clone())
            }
        }
    }

    pub fn settings(config_path: &Path, api_key: Option<&str>) -> Settings {
        let mut env = HashMap::new();
        env.insert("TTS_CONFIG", config_path.display().to_string());
        env.insert("GOOGLE_NAME_MODEL", NAME_MODEL.to_string());
        env.insert("GOOGLE_TTS_MODEL", TTS_MODEL.to_string());
        if let Some(key) = api_key {
            env.insert("GOOGLE_API_KEY", key.to_string());
        }
        Settings::from_lookup(|key| env.get(key).cloned()).unwrap()
    }

    pub fn service(
        config_path: &Path,
        api_key: Option<&str>,
        backend: Arc<FakeBackend>,
    ) -> TtsService {
        TtsService::new(Arc::new(settings(config_path, api_key)), backend)
    }
}
