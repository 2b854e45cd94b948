use std::sync::Arc;

use agentlink::core::agent::Agent;
use agentlink::llm::providers::openai::OpenAI;
use agentlink_tools::{Calculate, CurrentTime};

const INSTRUCTION: &str = "あなたは親切で有能なAIアシスタントです。\
ユーザーの質問に日本語で丁寧に回答してください。\n\n\
利用可能なツール:\n\
- get_current_time: 現在時刻の取得\n\
- calculate: 数式の計算";

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// General assistant backed by a local OpenAI-compatible server (LM Studio).
pub fn build_agent() -> Agent {
    let base_url = env_or("OPENAI_API_BASE", "http://localhost:1234/v1");
    let api_key = env_or("OPENAI_API_KEY", "not-needed");
    let model = env_or("LOCAL_LLM_MODEL", "google/gemma-3n-e4b");
    // Accept the router-style model id too
    let model = model.strip_prefix("openai/").unwrap_or(&model).to_string();

    let llm = OpenAI::new()
        .set_base_url(base_url)
        .set_api_key(api_key)
        .set_model(model);

    Agent::builder()
        .name("local_assistant")
        .description("ローカルLLMで動作する汎用AIアシスタント")
        .instruction(INSTRUCTION)
        .llm(Arc::new(llm))
        .tool(Arc::new(CurrentTime))
        .tool(Arc::new(Calculate))
        .build()
        .expect("local assistant configuration is valid")
}
