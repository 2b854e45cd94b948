use std::sync::Arc;

use agentlink::core::agent::Agent;
use agentlink::llm::providers::openai::OpenAI;
use agentlink_tools::{CurrentTime, TranslateToEnglish, TranslateToJapanese};

const INSTRUCTION: &str = "あなたは翻訳アシスタントです。\
日本語と英語の翻訳、および時刻の取得ができます。\
ユーザーの要求に応じて適切なツールを使用してください。";

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Translation agent backed by the same local OpenAI-compatible server as
/// the general assistant.
pub fn build_agent() -> Agent {
    let base_url = env_or("OPENAI_API_BASE", "http://localhost:1234/v1");
    let api_key = env_or("OPENAI_API_KEY", "not-needed");
    let model = env_or("LOCAL_LLM_MODEL", "google/gemma-3n-e4b");
    let model = model.strip_prefix("openai/").unwrap_or(&model).to_string();

    let llm = OpenAI::new()
        .set_base_url(base_url)
        .set_api_key(api_key)
        .set_model(model)
        .set_temperature(0.0);

    Agent::builder()
        .name("translator")
        .description("日英翻訳と時刻取得が可能な翻訳エージェント")
        .instruction(INSTRUCTION)
        .llm(Arc::new(llm))
        .tool(Arc::new(CurrentTime))
        .tool(Arc::new(TranslateToEnglish))
        .tool(Arc::new(TranslateToJapanese))
        .build()
        .expect("translator configuration is valid")
}
