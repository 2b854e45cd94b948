use async_trait::async_trait;
use log::info;
use serde_json::Value;

use agentlink_core::client::A2AClient;
use agentlink_llm::tool::{ToolCallError, ToolContext, ToolT};

/// One remote agent this process knows how to reach.
#[derive(Debug, Clone)]
pub struct AgentEndpoint {
    pub name: String,
    pub url: String,
    pub description: String,
    pub skills: Vec<String>,
}

/// Static registry of reachable remote agents.
#[derive(Debug, Clone, Default)]
pub struct AgentDirectory {
    agents: Vec<AgentEndpoint>,
}

impl AgentDirectory {
    pub fn new(agents: Vec<AgentEndpoint>) -> Self {
        Self { agents }
    }

    /// The default deployment: one translator agent on port 8001.
    pub fn default_directory() -> Self {
        Self::new(vec![AgentEndpoint {
            name: "Translator".to_string(),
            url: "http://localhost:8001".to_string(),
            description: "日英翻訳と時刻取得が可能なエージェント".to_string(),
            skills: vec![
                "翻訳（日→英）".to_string(),
                "翻訳（英→日）".to_string(),
                "現在時刻取得".to_string(),
            ],
        }])
    }

    pub fn render(&self) -> String {
        let mut lines = vec!["利用可能なA2Aエージェント:".to_string()];
        for agent in &self.agents {
            lines.push(format!("\n【{}】", agent.name));
            lines.push(format!("  URL: {}", agent.url));
            lines.push(format!("  説明: {}", agent.description));
            lines.push(format!("  スキル: {}", agent.skills.join(", ")));
        }
        lines.join("\n")
    }
}

/// Delegates a request to the remote translator agent over the protocol.
#[derive(Debug)]
pub struct AskTranslatorAgent {
    client: A2AClient,
}

impl AskTranslatorAgent {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: A2AClient::new(url),
        }
    }
}

#[async_trait]
impl ToolT for AskTranslatorAgent {
    fn name(&self) -> &'static str {
        "ask_translator_agent"
    }

    fn description(&self) -> &'static str {
        "Send a request to the translator agent, which can translate between Japanese and English and report the current time"
    }

    fn args_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The question or request for the agent"
                }
            },
            "required": ["query"]
        })
    }

    async fn run(&self, args: Value, _ctx: &mut ToolContext) -> Result<Value, ToolCallError> {
        let query = args["query"]
            .as_str()
            .ok_or_else(|| ToolCallError::InvalidArguments("query is required".into()))?;

        info!("Delegating to {}: {query}", self.client.base_url());
        let response = self
            .client
            .send_text(query)
            .await
            .map_err(|e| ToolCallError::RuntimeError(Box::new(e)))?;
        Ok(Value::String(response))
    }
}

/// Lists the remote agents this process is configured to reach.
#[derive(Debug)]
pub struct ListAvailableAgents {
    directory: AgentDirectory,
}

impl ListAvailableAgents {
    pub fn new(directory: AgentDirectory) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl ToolT for ListAvailableAgents {
    fn name(&self) -> &'static str {
        "list_available_agents"
    }

    fn description(&self) -> &'static str {
        "List the remote agents that can be delegated to"
    }

    fn args_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn run(&self, _args: Value, _ctx: &mut ToolContext) -> Result<Value, ToolCallError> {
        Ok(Value::String(self.directory.render()))
    }
}
