use async_trait::async_trait;
use log::debug;

use super::api::OpenAIAPI;
use super::message::{
    OpenAIChatCompletionRequest, OpenAIChatCompletionResponse, OpenAITool, OpenAIToolCall,
};
use crate::chat::{ChatMessage, ChatProvider, ChatResponse, FunctionCall, Tool, ToolCall};
use crate::error::LLMError;
use crate::net::http_request::HTTPRequest;
use crate::utils;

/// Client for OpenAI-compatible chat completion APIs.
///
/// The default configuration targets the hosted API; pointing `base_url` at a
/// local server (LM Studio, llama.cpp, vLLM) makes the same client drive a
/// local model.
#[derive(Debug, Clone)]
pub struct OpenAI {
    base_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl Default for OpenAI {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".into(),
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            model: "gpt-4o-mini".into(),
            max_tokens: None,
            temperature: None,
        }
    }
}

impl OpenAI {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn set_base_url<T: Into<String>>(mut self, base_url: T) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn set_api_key<T: Into<String>>(mut self, api_key: T) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn set_model<T: Into<String>>(mut self, model: T) -> Self {
        self.model = model.into();
        self
    }

    pub fn set_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn set_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    fn auth_headers(&self) -> Result<Vec<(String, String)>, LLMError> {
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| LLMError::AuthError("API key not set".to_string()))?;
        Ok(vec![(
            "Authorization".to_string(),
            format!("Bearer {api_key}"),
        )])
    }
}

#[derive(Debug)]
struct OpenAIChatResponse {
    content: Option<String>,
    tool_calls: Vec<ToolCall>,
}

impl ChatResponse for OpenAIChatResponse {
    fn text(&self) -> Option<String> {
        self.content.clone()
    }

    fn tool_calls(&self) -> Option<Vec<ToolCall>> {
        if self.tool_calls.is_empty() {
            None
        } else {
            Some(self.tool_calls.clone())
        }
    }
}

impl std::fmt::Display for OpenAIChatResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content.as_deref().unwrap_or(""))
    }
}

fn into_tool_call(call: OpenAIToolCall) -> ToolCall {
    ToolCall {
        id: call.id,
        call_type: call.tool_type,
        function: FunctionCall {
            name: call.function.name,
            arguments: call.function.arguments,
        },
    }
}

#[async_trait]
impl ChatProvider for OpenAI {
    async fn chat_with_tools(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[Tool]>,
    ) -> Result<Box<dyn ChatResponse>, LLMError> {
        let mut body =
            OpenAIChatCompletionRequest::from_chat_messages(messages, self.model.clone())
                .set_max_tokens(self.max_tokens)
                .set_temperature(self.temperature);

        if let Some(tools) = tools.filter(|tools| !tools.is_empty()) {
            body = body.set_tools(tools.iter().map(OpenAITool::from).collect());
        }

        let url = utils::create_model_url(&self.base_url, OpenAIAPI::ChatCompletion);
        debug!("OpenAI chat completion request to {url}");

        let text =
            HTTPRequest::post_json_with_headers(&url, serde_json::json!(body), self.auth_headers()?)
                .await?;

        let response: OpenAIChatCompletionResponse =
            serde_json::from_str(&text).map_err(|e| LLMError::ResponseFormatError {
                message: e.to_string(),
                raw_response: text.clone(),
            })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LLMError::ProviderError("No choices in response".to_string()))?;

        Ok(Box::new(OpenAIChatResponse {
            content: choice.message.content,
            tool_calls: choice
                .message
                .tool_calls
                .into_iter()
                .map(into_tool_call)
                .collect(),
        }))
    }
}
