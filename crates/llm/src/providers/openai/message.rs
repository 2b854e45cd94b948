use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chat::{ChatMessage, ChatRole, MessageType, Tool};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIChatMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<OpenAIToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: OpenAIToolCallFunction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIToolCallFunction {
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OpenAITool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: OpenAIFunction,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OpenAIFunction {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl From<&Tool> for OpenAITool {
    fn from(tool: &Tool) -> Self {
        Self {
            tool_type: tool.tool_type.clone(),
            function: OpenAIFunction {
                name: tool.function.name.clone(),
                description: tool.function.description.clone(),
                parameters: tool.function.parameters.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OpenAIChatCompletionRequest {
    pub model: String,
    pub messages: Vec<OpenAIChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<OpenAITool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

impl OpenAIChatCompletionRequest {
    pub fn new(model: String) -> Self {
        Self {
            model,
            messages: vec![],
            tools: None,
            max_tokens: None,
            temperature: None,
            stream: Some(false),
        }
    }

    pub fn set_messages(mut self, messages: Vec<OpenAIChatMessage>) -> Self {
        self.messages = messages;
        self
    }

    pub fn set_tools(mut self, tools: Vec<OpenAITool>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn set_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn set_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn from_chat_messages(messages: &[ChatMessage], model: String) -> Self {
        Self::new(model).set_messages(to_wire_messages(messages))
    }
}

fn role_str(role: ChatRole) -> &'static str {
    match role {
        ChatRole::System => "system",
        ChatRole::User => "user",
        ChatRole::Assistant => "assistant",
        ChatRole::Tool => "tool",
    }
}

/// Flatten chat messages into the wire shape. An assistant tool-use message
/// carries its calls inline; a tool-result message expands into one wire
/// message per call, echoing the `tool_call_id` the provider assigned.
pub fn to_wire_messages(messages: &[ChatMessage]) -> Vec<OpenAIChatMessage> {
    let mut wire = Vec::with_capacity(messages.len());
    for message in messages {
        match &message.message_type {
            MessageType::Text => wire.push(OpenAIChatMessage {
                role: role_str(message.role).to_string(),
                content: Some(message.content.clone()),
                tool_calls: None,
                tool_call_id: None,
            }),
            MessageType::ToolUse(calls) => wire.push(OpenAIChatMessage {
                role: "assistant".to_string(),
                content: if message.content.is_empty() {
                    None
                } else {
                    Some(message.content.clone())
                },
                tool_calls: Some(
                    calls
                        .iter()
                        .map(|call| OpenAIToolCall {
                            id: call.id.clone(),
                            tool_type: call.call_type.clone(),
                            function: OpenAIToolCallFunction {
                                name: call.function.name.clone(),
                                arguments: call.function.arguments.clone(),
                            },
                        })
                        .collect(),
                ),
                tool_call_id: None,
            }),
            MessageType::ToolResult(calls) => {
                for call in calls {
                    wire.push(OpenAIChatMessage {
                        role: "tool".to_string(),
                        content: Some(call.function.arguments.clone()),
                        tool_calls: None,
                        tool_call_id: Some(call.id.clone()),
                    });
                }
            }
        }
    }
    wire
}

#[derive(Debug, Deserialize)]
pub struct OpenAIChatChoice {
    pub index: i32,
    pub message: OpenAIResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAIResponseMessage {
    pub role: String,
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<OpenAIToolCall>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAIChatCompletionResponse {
    pub id: String,
    pub model: String,
    pub choices: Vec<OpenAIChatChoice>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{FunctionCall, ToolCall};

    fn tool_call(id: &str, name: &str, arguments: &str) -> ToolCall {
        ToolCall {
            id: id.to_string(),
            call_type: "function".to_string(),
            function: FunctionCall {
                name: name.to_string(),
                arguments: arguments.to_string(),
            },
        }
    }

    #[test]
    fn test_text_message_conversion() {
        let messages = vec![
            ChatMessage::system().content("instructions").build(),
            ChatMessage::user().content("hello").build(),
        ];

        let wire = to_wire_messages(&messages);
        assert_eq!(wire.len(), 2);
        assert_eq!(wire[0].role, "system");
        assert_eq!(wire[1].role, "user");
        assert_eq!(wire[1].content.as_deref(), Some("hello"));
    }

    #[test]
    fn test_tool_result_expands_per_call() {
        let messages = vec![ChatMessage::user()
            .tool_result(vec![
                tool_call("call_1", "clock", "\"12:00\""),
                tool_call("call_2", "calculate", "\"3\""),
            ])
            .build()];

        let wire = to_wire_messages(&messages);
        assert_eq!(wire.len(), 2);
        assert_eq!(wire[0].role, "tool");
        assert_eq!(wire[0].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(wire[1].tool_call_id.as_deref(), Some("call_2"));
        assert_eq!(wire[1].content.as_deref(), Some("\"3\""));
    }

    #[test]
    fn test_tool_use_keeps_calls_inline() {
        let messages = vec![ChatMessage::assistant()
            .tool_use(vec![tool_call("call_1", "clock", "{}")])
            .build()];

        let wire = to_wire_messages(&messages);
        assert_eq!(wire.len(), 1);
        assert_eq!(wire[0].role, "assistant");
        assert!(wire[0].content.is_none());
        let calls = wire[0].tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].function.name, "clock");
    }

    #[test]
    fn test_request_serialization_skips_empty_fields() {
        let request = OpenAIChatCompletionRequest::from_chat_messages(
            &[ChatMessage::user().content("hi").build()],
            "google/gemma-3n-e4b".to_string(),
        );

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "google/gemma-3n-e4b");
        assert!(value.get("tools").is_none());
        assert!(value.get("max_tokens").is_none());
        assert_eq!(value["stream"], false);
    }

    #[test]
    fn test_response_deserialization_with_tool_calls() {
        let raw = r#"{
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1700000000,
            "model": "google/gemma-3n-e4b",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_9",
                        "type": "function",
                        "function": {"name": "calculate", "arguments": "{\"expression\":\"1+2\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        }"#;

        let response: OpenAIChatCompletionResponse = serde_json::from_str(raw).unwrap();
        let choice = &response.choices[0];
        assert!(choice.message.content.is_none());
        assert_eq!(choice.message.tool_calls[0].function.name, "calculate");
    }
}
