use async_trait::async_trait;
use log::debug;

use super::message::{
    to_contents, GeminiFunctionDeclaration, GeminiGenerationConfig, GeminiRequest, GeminiResponse,
    GeminiToolDeclarations,
};
use super::model::GeminiModel;
use crate::chat::{ChatMessage, ChatProvider, ChatResponse, FunctionCall, Tool, ToolCall};
use crate::error::LLMError;
use crate::net::http_request::HTTPRequest;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client for the hosted Gemini `generateContent` API.
#[derive(Debug, Clone)]
pub struct Gemini {
    base_url: String,
    api_key: Option<String>,
    model: GeminiModel,
    max_output_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl Default for Gemini {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.into(),
            api_key: std::env::var("GEMINI_API_KEY").ok(),
            model: GeminiModel::Gemini25FlashLite,
            max_output_tokens: None,
            temperature: None,
        }
    }
}

impl Gemini {
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

    pub fn set_model(mut self, model: GeminiModel) -> Self {
        self.model = model;
        self
    }

    pub fn set_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    pub fn set_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn model_name(&self) -> String {
        self.model.to_string()
    }

    fn endpoint(&self) -> Result<String, LLMError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LLMError::AuthError("API key not set".to_string()))?;
        Ok(format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        ))
    }

    fn generation_config(&self) -> Option<GeminiGenerationConfig> {
        if self.max_output_tokens.is_none() && self.temperature.is_none() {
            return None;
        }
        Some(GeminiGenerationConfig {
            max_output_tokens: self.max_output_tokens,
            temperature: self.temperature,
        })
    }
}

#[derive(Debug)]
struct GeminiChatResponse {
    content: Option<String>,
    tool_calls: Vec<ToolCall>,
}

impl ChatResponse for GeminiChatResponse {
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

impl std::fmt::Display for GeminiChatResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content.as_deref().unwrap_or(""))
    }
}

#[async_trait]
impl ChatProvider for Gemini {
    async fn chat_with_tools(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[Tool]>,
    ) -> Result<Box<dyn ChatResponse>, LLMError> {
        let (system_instruction, contents) = to_contents(messages);

        let body = GeminiRequest {
            contents,
            system_instruction,
            generation_config: self.generation_config(),
            tools: tools
                .filter(|tools| !tools.is_empty())
                .map(|tools| {
                    vec![GeminiToolDeclarations {
                        function_declarations: tools
                            .iter()
                            .map(GeminiFunctionDeclaration::from)
                            .collect(),
                    }]
                }),
        };

        let url = self.endpoint()?;
        debug!("Gemini generateContent request, model {}", self.model);

        let text = HTTPRequest::post_json(&url, serde_json::json!(body)).await?;

        let response: GeminiResponse =
            serde_json::from_str(&text).map_err(|e| LLMError::ResponseFormatError {
                message: e.to_string(),
                raw_response: text.clone(),
            })?;

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LLMError::ProviderError("No candidates in response".to_string()))?;

        let mut content = None;
        let mut tool_calls = Vec::new();
        if let Some(parts) = candidate.content.map(|content| content.parts) {
            for part in parts {
                if let Some(text) = part.text {
                    content
                        .get_or_insert_with(String::new)
                        .push_str(&text);
                }
                if let Some(call) = part.function_call {
                    // The API carries no call ids; the function name stands in
                    // so tool results can be matched back up.
                    tool_calls.push(ToolCall {
                        id: call.name.clone(),
                        call_type: "function".to_string(),
                        function: FunctionCall {
                            name: call.name,
                            arguments: call.args.to_string(),
                        },
                    });
                }
            }
        }

        Ok(Box::new(GeminiChatResponse {
            content,
            tool_calls,
        }))
    }
}
