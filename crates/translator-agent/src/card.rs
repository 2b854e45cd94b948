use agentlink::core::card::{AgentCard, AgentProvider, AgentSkill};

pub fn agent_card(url: &str) -> AgentCard {
    AgentCard::new(
        "Translator",
        "翻訳エージェント。日英翻訳と時刻取得が可能。",
        url,
        "1.0.0",
    )
    .set_provider(AgentProvider {
        organization: "agentlink".to_string(),
        url: "https://github.com/agentlink-dev/agentlink".to_string(),
    })
    .add_skill(
        AgentSkill::new("translation", "翻訳", "日本語と英語の相互翻訳を行います")
            .set_tags(vec!["translation", "japanese", "english"])
            .set_examples(vec![
                "こんにちはを英語に翻訳して",
                "Helloを日本語に翻訳して",
                "今何時？",
            ]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_shape() {
        let card = agent_card("http://localhost:8001");
        assert_eq!(card.name, "Translator");
        assert_eq!(card.skills[0].id, "translation");
        assert!(!card.capabilities.streaming);
    }
}
