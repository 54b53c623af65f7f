pub mod document;
pub mod settings;

pub use document::{ConfigStore, StyleTemplate, StyleTemplates, VoiceDescriptor};
pub use settings::{Settings, TransportKind};
