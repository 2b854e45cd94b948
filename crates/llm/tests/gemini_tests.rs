use agentlink_llm::chat::{ChatMessage, FunctionTool, Tool};
use agentlink_llm::providers::gemini::message::{
    to_contents, GeminiFunctionDeclaration, GeminiResponse,
};
use agentlink_llm::providers::gemini::{Gemini, GeminiModel};

#[test]
fn test_gemini_creation() {
    let client = Gemini::new()
        .set_api_key("test-key")
        .set_model(GeminiModel::Gemini25Flash);
    assert_eq!(client.model_name(), "gemini-2.5-flash");
}

#[test]
fn test_contents_alternate_roles() {
    let messages = vec![
        ChatMessage::user().content("翻訳して").build(),
        ChatMessage::assistant().content("Translated").build(),
        ChatMessage::user().content("ありがとう").build(),
    ];

    let (system, contents) = to_contents(&messages);
    assert!(system.is_none());
    let roles: Vec<_> = contents
        .iter()
        .map(|content| content.role.as_deref().unwrap())
        .collect();
    assert_eq!(roles, vec!["user", "model", "user"]);
}

#[test]
fn test_function_declaration_conversion() {
    let tool = Tool {
        tool_type: "function".to_string(),
        function: FunctionTool {
            name: "ask_translator_agent".to_string(),
            description: "Send a request to the translator agent".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {"query": {"type": "string"}},
                "required": ["query"]
            }),
        },
    };

    let declaration = GeminiFunctionDeclaration::from(&tool);
    assert_eq!(declaration.name, "ask_translator_agent");
    assert_eq!(declaration.parameters["required"][0], "query");
}

#[test]
fn test_function_call_response_parsing() {
    let raw = r#"{
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{"functionCall": {"name": "calculate", "args": {"expression": "12 * 4"}}}]
            },
            "finishReason": "STOP"
        }]
    }"#;

    let response: GeminiResponse = serde_json::from_str(raw).unwrap();
    let part = &response.candidates[0].content.as_ref().unwrap().parts[0];
    let call = part.function_call.as_ref().unwrap();
    assert_eq!(call.name, "calculate");
    assert_eq!(call.args["expression"], "12 * 4");
}

#[test]
fn test_empty_candidates_deserialize() {
    let response: GeminiResponse = serde_json::from_str("{}").unwrap();
    assert!(response.candidates.is_empty());
}
