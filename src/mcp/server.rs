use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, ErrorData, GetPromptRequestParams,
    GetPromptResult, Implementation, ListPromptsResult, ListResourceTemplatesResult,
    ListToolsResult, PaginatedRequestParams, Prompt, ReadResourceRequestParams,
    ReadResourceResult, ResourceTemplate, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::dispatcher::ToolDispatcher;
use crate::tts::TtsService;

pub const SERVER_NAME: &str = "gemini-tts-mcp";
pub const STYLE_URI_PREFIX: &str = "tts://voice-styles/";

/// MCP handler: the three TTS tools, style templates as resources and style prompts.
#[derive(Clone)]
pub struct TtsServer {
    tts: Arc<TtsService>,
    tools: Arc<ToolDispatcher>,
}

impl TtsServer {
    pub fn new(tts: Arc<TtsService>) -> Self {
        Self {
            tools: Arc::new(ToolDispatcher::new(Arc::clone(&tts))),
            tts,
        }
    }

    pub fn resource_templates() -> Result<Vec<ResourceTemplate>, ErrorData> {
        let template = model(json!({
            "uriTemplate": format!("{}{{style_name}}", STYLE_URI_PREFIX),
            "name": "Voice style template",
            "description": "A named voice style template as JSON",
            "mimeType": "application/json",
        }))?;
        Ok(vec![template])
    }

    pub fn read_style(&self, uri: &str) -> Result<ReadResourceResult, ErrorData> {
        let name = uri
            .strip_prefix(STYLE_URI_PREFIX)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ErrorData::invalid_params(format!("Unknown resource: {}", uri), None))?;

        let template = self.tts.style(name).ok_or_else(|| {
            ErrorData::resource_not_found(format!("Voice style '{}' not found", name), None)
        })?;
        let text = serde_json::to_string_pretty(&template)
            .map_err(|e| ErrorData::internal_error(e.to_string(), None))?;

        model(json!({
            "contents": [{
                "uri": uri,
                "mimeType": "application/json",
                "text": text,
            }]
        }))
    }

    /// One prompt per style that carries a full prompt text.
    pub fn style_prompts(&self) -> Result<Vec<Prompt>, ErrorData> {
        self.tts
            .list_styles(true)
            .into_iter()
            .filter(|(_, template)| template.prompt.is_some())
            .map(|(name, template)| model(json!({ "name": name, "description": template.description })))
            .collect()
    }

    pub fn style_prompt(&self, name: &str) -> Result<GetPromptResult, ErrorData> {
        let prompt = self
            .tts
            .style(name)
            .and_then(|t| t.prompt.map(|prompt| (t.description, prompt)));
        let Some((description, prompt)) = prompt else {
            return Err(ErrorData::invalid_params(
                format!("Prompt '{}' not found", name),
                None,
            ));
        };

        model(json!({
            "description": format!("{}: {}", name, description),
            "messages": [{
                "role": "user",
                "content": { "type": "text", "text": prompt },
            }]
        }))
    }
}

/// Build a protocol model from its wire form.
fn model<T: DeserializeOwned>(value: Value) -> Result<T, ErrorData> {
    serde_json::from_value(value).map_err(|e| ErrorData::internal_error(e.to_string(), None))
}

impl ServerHandler for TtsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Generate speech from text with Gemini TTS. Use list_voices and list_styles \
                 to discover voices and style names, then call generate."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(ToolDispatcher::tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = self
            .tools
            .call(&request.name, request.arguments.map(Value::Object))
            .await;
        let content = vec![Content::text(outcome.text)];
        Ok(if outcome.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        })
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, ErrorData> {
        Ok(ListResourceTemplatesResult::with_all_items(
            Self::resource_templates()?,
        ))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        self.read_style(&request.uri)
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, ErrorData> {
        Ok(ListPromptsResult::with_all_items(self.style_prompts()?))
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, ErrorData> {
        self.style_prompt(&request.name)
    }
}
