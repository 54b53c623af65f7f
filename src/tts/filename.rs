use lazy_static::lazy_static;
use regex::Regex;

use crate::error::AppError;
use crate::gemini::{self, GenerativeBackend};

pub const EXCERPT_LIMIT: usize = 100;
pub const MAX_NAME_LEN: usize = 50;
pub const FALLBACK_NAME: &str = "tts_audio";
pub const AUDIO_EXTENSION: &str = "wav";

lazy_static! {
    static ref UNSAFE_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_-]").unwrap();
}

/// Build the naming prompt from the first `excerpt_limit` characters of `text`.
pub fn naming_prompt(prefix: &str, text: &str, excerpt_limit: usize) -> String {
    let excerpt: String = text.chars().take(excerpt_limit).collect();
    format!("{}\"{}...\"", prefix, excerpt)
}

/// Replace anything outside `[A-Za-z0-9_-]` with `_` and cap the length.
pub fn sanitize(name: &str, max_len: usize) -> String {
    let mut safe = UNSAFE_CHARS.replace_all(name, "_").into_owned();
    // Only ASCII survives the replacement, so byte truncation is char-safe.
    safe.truncate(max_len);
    safe
}

/// Ask the naming model for a filename and make it safe to write.
///
/// Transport errors propagate; only an empty answer falls back to `tts_audio`.
pub async fn derive_filename(
    backend: &dyn GenerativeBackend,
    model: &str,
    prompt_prefix: &str,
    text: &str,
) -> Result<String, AppError> {
    let prompt = naming_prompt(prompt_prefix, text, EXCERPT_LIMIT);
    let response = backend
        .generate_content(model, &gemini::text_request(&prompt))
        .await?;

    let name = gemini::extract_text(&response).unwrap_or_else(|| FALLBACK_NAME.to_string());
    Ok(format!("{}.{}", sanitize(&name, MAX_NAME_LEN), AUDIO_EXTENSION))
}
