use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chat::{ChatMessage, ChatRole, MessageType, Tool};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<GeminiToolDeclarations>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<GeminiFunctionCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_response: Option<GeminiFunctionResponse>,
}

impl GeminiPart {
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self {
            text: Some(text.into()),
            function_call: None,
            function_response: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiFunctionCall {
    pub name: String,
    pub args: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiFunctionResponse {
    pub name: String,
    pub response: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiToolDeclarations {
    pub function_declarations: Vec<GeminiFunctionDeclaration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiFunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl From<&Tool> for GeminiFunctionDeclaration {
    fn from(tool: &Tool) -> Self {
        Self {
            name: tool.function.name.clone(),
            description: tool.function.description.clone(),
            parameters: tool.function.parameters.clone(),
        }
    }
}

/// Split chat messages into the system instruction and the `contents` list.
///
/// Tool-use turns become `functionCall` parts on a `model` content; tool
/// results become `functionResponse` parts keyed by function name (the API
/// has no call ids).
pub fn to_contents(messages: &[ChatMessage]) -> (Option<GeminiContent>, Vec<GeminiContent>) {
    let mut system_instruction = None;
    let mut contents = Vec::new();

    for message in messages {
        match (&message.role, &message.message_type) {
            (ChatRole::System, _) => {
                system_instruction = Some(GeminiContent {
                    role: None,
                    parts: vec![GeminiPart::text(message.content.clone())],
                });
            }
            (ChatRole::User, MessageType::Text) => contents.push(GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart::text(message.content.clone())],
            }),
            (ChatRole::Assistant, MessageType::Text) => contents.push(GeminiContent {
                role: Some("model".to_string()),
                parts: vec![GeminiPart::text(message.content.clone())],
            }),
            (_, MessageType::ToolUse(calls)) => contents.push(GeminiContent {
                role: Some("model".to_string()),
                parts: calls
                    .iter()
                    .map(|call| GeminiPart {
                        text: None,
                        function_call: Some(GeminiFunctionCall {
                            name: call.function.name.clone(),
                            args: serde_json::from_str(&call.function.arguments)
                                .unwrap_or(Value::Object(serde_json::Map::new())),
                        }),
                        function_response: None,
                    })
                    .collect(),
            }),
            (_, MessageType::ToolResult(calls)) => contents.push(GeminiContent {
                role: Some("function".to_string()),
                parts: calls
                    .iter()
                    .map(|call| GeminiPart {
                        text: None,
                        function_call: None,
                        function_response: Some(GeminiFunctionResponse {
                            name: call.function.name.clone(),
                            response: serde_json::from_str(&call.function.arguments)
                                .unwrap_or(Value::String(call.function.arguments.clone())),
                        }),
                    })
                    .collect(),
            }),
            (ChatRole::Tool, MessageType::Text) => contents.push(GeminiContent {
                role: Some("function".to_string()),
                parts: vec![GeminiPart::text(message.content.clone())],
            }),
        }
    }

    (system_instruction, contents)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    pub content: Option<GeminiContent>,
    pub finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{FunctionCall, ToolCall};

    #[test]
    fn test_system_instruction_is_split_out() {
        let messages = vec![
            ChatMessage::system().content("be brief").build(),
            ChatMessage::user().content("hi").build(),
        ];

        let (system, contents) = to_contents(&messages);
        assert_eq!(system.unwrap().parts[0].text.as_deref(), Some("be brief"));
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].role.as_deref(), Some("user"));
    }

    #[test]
    fn test_tool_round_trip_parts() {
        let call = ToolCall {
            id: "calculate".to_string(),
            call_type: "function".to_string(),
            function: FunctionCall {
                name: "calculate".to_string(),
                arguments: r#"{"expression":"1+2"}"#.to_string(),
            },
        };
        let messages = vec![
            ChatMessage::assistant().tool_use(vec![call.clone()]).build(),
            ChatMessage::user()
                .tool_result(vec![ToolCall {
                    function: FunctionCall {
                        name: "calculate".to_string(),
                        arguments: r#""1+2 = 3""#.to_string(),
                    },
                    ..call
                }])
                .build(),
        ];

        let (_, contents) = to_contents(&messages);
        assert_eq!(contents.len(), 2);

        let call_part = &contents[0].parts[0];
        assert_eq!(
            call_part.function_call.as_ref().unwrap().args["expression"],
            "1+2"
        );

        let response_part = &contents[1].parts[0];
        assert_eq!(
            response_part.function_response.as_ref().unwrap().response,
            serde_json::json!("1+2 = 3")
        );
    }

    #[test]
    fn test_request_serialization_is_camel_case() {
        let request = GeminiRequest {
            contents: vec![],
            system_instruction: Some(GeminiContent {
                role: None,
                parts: vec![GeminiPart::text("sys")],
            }),
            generation_config: Some(GeminiGenerationConfig {
                max_output_tokens: Some(64),
                temperature: None,
            }),
            tools: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("systemInstruction").is_some());
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 64);
    }

    #[test]
    fn test_response_deserialization() {
        let raw = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "hello"}]},
                "finishReason": "STOP"
            }]
        }"#;

        let response: GeminiResponse = serde_json::from_str(raw).unwrap();
        let content = response.candidates[0].content.as_ref().unwrap();
        assert_eq!(content.parts[0].text.as_deref(), Some("hello"));
    }
}
