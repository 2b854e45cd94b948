use agentlink::core::card::{AgentCard, AgentProvider, AgentSkill};

pub fn agent_card(url: &str) -> AgentCard {
    AgentCard::new(
        "Local Assistant",
        "ローカルLLMで動作する汎用AIアシスタント",
        url,
        "1.0.0",
    )
    .set_provider(AgentProvider {
        organization: "agentlink".to_string(),
        url: "https://github.com/agentlink-dev/agentlink".to_string(),
    })
    .add_skill(
        AgentSkill::new(
            "general-assistant",
            "汎用アシスタント",
            "質問応答、時刻取得、計算を行います（ローカルLLM使用）",
        )
        .set_tags(vec!["assistant", "local-llm", "japanese", "calculator"])
        .set_examples(vec![
            "今何時？",
            "123 * 456 を計算して",
            "Pythonについて教えて",
        ]),
    )
}
