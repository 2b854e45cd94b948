use std::sync::Arc;

use agentlink::core::agent::Agent;
use agentlink::llm::providers::gemini::{Gemini, GeminiModel};
use agentlink_tools::{AgentDirectory, AskTranslatorAgent, Calculate, CurrentTime, ListAvailableAgents};
use log::warn;

const INSTRUCTION: &str = "あなたはオーケストレーターAIアシスタントです。\
ユーザーの質問に日本語で丁寧に回答してください。\n\n\
翻訳の依頼は ask_translator_agent ツールで翻訳エージェントに委譲してください。\
利用可能なエージェントは list_available_agents ツールで確認できます。\
計算には calculate、現在時刻には get_current_time を使ってください。";

/// Orchestrating agent on the hosted Gemini model. Delegates translation to
/// the remote translator agent over the protocol.
pub fn build_agent(translator_url: &str) -> Agent {
    let model = match std::env::var("GEMINI_MODEL") {
        Ok(name) => name.parse::<GeminiModel>().unwrap_or_else(|_| {
            warn!("Unknown GEMINI_MODEL {name}, falling back to gemini-2.5-flash-lite");
            GeminiModel::Gemini25FlashLite
        }),
        Err(_) => GeminiModel::Gemini25FlashLite,
    };

    let llm = Gemini::new().set_model(model);

    Agent::builder()
        .name("host_agent")
        .description("リモートエージェントに仕事を委譲するオーケストレーター")
        .instruction(INSTRUCTION)
        .llm(Arc::new(llm))
        .tool(Arc::new(CurrentTime))
        .tool(Arc::new(Calculate))
        .tool(Arc::new(AskTranslatorAgent::new(translator_url)))
        .tool(Arc::new(ListAvailableAgents::new(
            AgentDirectory::default_directory(),
        )))
        .build()
        .expect("host agent configuration is valid")
}
