use async_trait::async_trait;
use serde_json::Value;

use agentlink_llm::tool::{ToolCallError, ToolContext, ToolT};

// Demo dictionaries; anything outside them is echoed back bracketed.

fn to_english(text: &str) -> String {
    match text {
        "こんにちは" => "Hello".to_string(),
        "ありがとう" => "Thank you".to_string(),
        "さようなら" => "Goodbye".to_string(),
        other => format!("[Translation of: {other}]"),
    }
}

fn to_japanese(text: &str) -> String {
    match text {
        "Hello" => "こんにちは".to_string(),
        "Thank you" => "ありがとう".to_string(),
        "Goodbye" => "さようなら".to_string(),
        other => format!("[翻訳: {other}]"),
    }
}

fn text_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "text": {
                "type": "string",
                "description": "The text to translate"
            }
        },
        "required": ["text"]
    })
}

fn text_arg(args: &Value) -> Result<&str, ToolCallError> {
    args["text"]
        .as_str()
        .ok_or_else(|| ToolCallError::InvalidArguments("text is required".into()))
}

#[derive(Debug, Default)]
pub struct TranslateToEnglish;

#[async_trait]
impl ToolT for TranslateToEnglish {
    fn name(&self) -> &'static str {
        "translate_to_english"
    }

    fn description(&self) -> &'static str {
        "Translate Japanese text to English"
    }

    fn args_schema(&self) -> Value {
        text_schema()
    }

    async fn run(&self, args: Value, _ctx: &mut ToolContext) -> Result<Value, ToolCallError> {
        Ok(Value::String(to_english(text_arg(&args)?)))
    }
}

#[derive(Debug, Default)]
pub struct TranslateToJapanese;

#[async_trait]
impl ToolT for TranslateToJapanese {
    fn name(&self) -> &'static str {
        "translate_to_japanese"
    }

    fn description(&self) -> &'static str {
        "Translate English text to Japanese"
    }

    fn args_schema(&self) -> Value {
        text_schema()
    }

    async fn run(&self, args: Value, _ctx: &mut ToolContext) -> Result<Value, ToolCallError> {
        Ok(Value::String(to_japanese(text_arg(&args)?)))
    }
}
