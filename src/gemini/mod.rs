//! Google Gemini `generateContent` client and response handling.

pub mod client;
pub mod response;

pub use client::{GeminiClient, GenerativeBackend};
pub use response::{extract_audio, extract_text, speech_request, text_request};
