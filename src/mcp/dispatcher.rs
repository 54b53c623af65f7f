use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::tts::{GenerationRequest, TtsService};

pub const GENERATE: &str = "generate";
pub const LIST_VOICES: &str = "list_voices";
pub const LIST_STYLES: &str = "list_styles";

#[derive(Debug, Deserialize)]
pub struct GenerateArgs {
    pub content: String,
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
}

impl From<GenerateArgs> for GenerationRequest {
    fn from(args: GenerateArgs) -> Self {
        GenerationRequest {
            text: args.content,
            voice: args.voice,
            directory: args.directory.map(Into::into),
            style: args.style,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListVoicesArgs {
    /// JSON numbers arrive as floats from some hosts.
    #[serde(default)]
    pub count: Option<f64>,
}

impl ListVoicesArgs {
    /// `None` means all voices.
    pub fn limit(&self) -> Option<usize> {
        self.count.filter(|c| *c >= 1.0).map(|c| c as usize)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListStylesArgs {
    #[serde(default)]
    pub detail: Option<bool>,
}

/// A routed tool invocation with its parsed arguments.
#[derive(Debug)]
pub enum ToolCall {
    Generate(GenerateArgs),
    ListVoices(ListVoicesArgs),
    ListStyles(ListStylesArgs),
}

impl ToolCall {
    pub fn route(name: &str, arguments: Option<Value>) -> Result<Self, AppError> {
        let arguments = match arguments {
            Some(Value::Null) | None => json!({}),
            Some(value) => value,
        };

        match name {
            GENERATE => Ok(ToolCall::Generate(parse_args(arguments)?)),
            LIST_VOICES => Ok(ToolCall::ListVoices(parse_args(arguments)?)),
            LIST_STYLES => Ok(ToolCall::ListStyles(parse_args(arguments)?)),
            other => Err(AppError::ToolNotFound(other.to_string())),
        }
    }
}

fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T, AppError> {
    serde_json::from_value(arguments).map_err(|e| AppError::InvalidArguments(e.to_string()))
}

/// Text of a finished tool call. Failures are reported here rather than as protocol errors.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutcome {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Routes tool invocations to the TTS service and wraps every outcome in a `ToolOutcome`.
///
/// Holds no per-invocation state; concurrent calls share only the service.
pub struct ToolDispatcher {
    tts: Arc<TtsService>,
}

impl ToolDispatcher {
    pub fn new(tts: Arc<TtsService>) -> Self {
        Self { tts }
    }

    pub async fn call(&self, name: &str, arguments: Option<Value>) -> ToolOutcome {
        let outcome = match ToolCall::route(name, arguments) {
            Ok(call) => self.execute(call).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(text) => ToolOutcome::success(text),
            Err(e) => {
                let result = ToolOutcome::error(e.to_string());
                tracing::warn!(tool = name, "Tool call failed: {}", result.text());
                result
            }
        }
    }

    async fn execute(&self, call: ToolCall) -> Result<String, AppError> {
        match call {
            ToolCall::Generate(args) => {
                let path = self.tts.generate(args.into()).await?;
                Ok(path.display().to_string())
            }
            ToolCall::ListVoices(args) => {
                Ok(serde_json::to_string(&self.tts.list_voices(args.limit()))?)
            }
            ToolCall::ListStyles(args) => Ok(serde_json::to_string(
                &self.tts.list_styles(args.detail.unwrap_or(false)),
            )?),
        }
    }

    pub fn tools() -> Vec<Tool> {
        vec![
            Tool::new(
                GENERATE,
                "Generate TTS audio from text content and save it as a WAV file",
                input_schema(json!({
                    "type": "object",
                    "properties": {
                        "content": {
                            "type": "string",
                            "description": "The text content to convert to speech"
                        },
                        "directory": {
                            "type": "string",
                            "description": "Directory to save the audio file (Default: current directory)"
                        },
                        "voice": {
                            "type": "string",
                            "description": "Voice to use for TTS (Default: configured voice)"
                        },
                        "style": {
                            "type": "string",
                            "description": "Voice style - either a style name (e.g., 'news_anchor') or custom style text (Default: none, the text is read without a style)"
                        }
                    },
                    "required": ["content"]
                })),
            ),
            Tool::new(
                LIST_VOICES,
                "Get list of available TTS voices",
                input_schema(json!({
                    "type": "object",
                    "properties": {
                        "count": {
                            "type": "number",
                            "description": "Number of voices to return (0 for all)"
                        }
                    }
                })),
            ),
            Tool::new(
                LIST_STYLES,
                "Get list of available voice styles",
                input_schema(json!({
                    "type": "object",
                    "properties": {
                        "detail": {
                            "type": "boolean",
                            "description": "Whether to show voice style detail (Default: false)"
                        }
                    }
                })),
            ),
        ]
    }
}

fn input_schema(schema: Value) -> JsonObject {
    match schema {
        Value::Object(map) => map,
        _ => JsonObject::new(),
    }
}
