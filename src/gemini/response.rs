use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};

use crate::error::AppError;

/// Body for a plain text generation call.
pub fn text_request(prompt: &str) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
    })
}

/// Body for a speech generation call with a prebuilt voice.
pub fn speech_request(text: &str, voice: &str) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": text }] }],
        "generationConfig": {
            "responseModalities": ["AUDIO"],
            "speechConfig": {
                "voiceConfig": {
                    "prebuiltVoiceConfig": { "voiceName": voice },
                },
            },
        },
    })
}

/// Trimmed text of the first part of the first candidate, if any.
fn first_text(raw: &Value) -> Option<&str> {
    raw.pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Places an audio payload has been observed in upstream responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioLocation {
    /// `candidates[0].content.parts[0].inlineData.data`
    PartInlineData,
    /// `candidates[0].content.parts[0].data`
    PartData,
    /// `candidates[0].inlineData.data`
    CandidateInlineData,
    /// `inlineData.data`
    TopLevelInlineData,
}

impl AudioLocation {
    /// Lookup order, first non-empty payload wins.
    pub const PRIORITY: [AudioLocation; 4] = [
        AudioLocation::PartInlineData,
        AudioLocation::PartData,
        AudioLocation::CandidateInlineData,
        AudioLocation::TopLevelInlineData,
    ];

    /// JSON pointer to the payload. Each location is read on its own, so a
    /// malformed branch elsewhere in the envelope does not hide it.
    pub fn pointer(&self) -> &'static str {
        match self {
            AudioLocation::PartInlineData => "/candidates/0/content/parts/0/inlineData/data",
            AudioLocation::PartData => "/candidates/0/content/parts/0/data",
            AudioLocation::CandidateInlineData => "/candidates/0/inlineData/data",
            AudioLocation::TopLevelInlineData => "/inlineData/data",
        }
    }

    pub fn lookup<'a>(&self, raw: &'a Value) -> Option<&'a str> {
        raw.pointer(self.pointer())
            .and_then(Value::as_str)
            .filter(|d| !d.is_empty())
    }
}

/// First non-empty audio payload, in `AudioLocation::PRIORITY` order.
pub fn locate_audio(raw: &Value) -> Option<(AudioLocation, &str)> {
    AudioLocation::PRIORITY
        .iter()
        .find_map(|location| location.lookup(raw).map(|data| (*location, data)))
}

/// Decode the audio payload of a raw response, or fail with `MissingAudioData`.
pub fn extract_audio(raw: &Value) -> Result<Vec<u8>, AppError> {
    match locate_audio(raw) {
        Some((location, data)) => {
            tracing::debug!(?location, bytes = data.len(), "Found audio payload");
            Ok(STANDARD.decode(data)?)
        }
        None => {
            tracing::error!(response = %raw, "No audio data in upstream response");
            Err(AppError::MissingAudioData)
        }
    }
}

/// Naming text from a raw response.
pub fn extract_text(raw: &Value) -> Option<String> {
    first_text(raw).map(str::to_string)
}
