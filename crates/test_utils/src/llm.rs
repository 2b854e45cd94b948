use std::collections::VecDeque;
use std::sync::Mutex;

use agentlink_llm::chat::{ChatMessage, ChatProvider, ChatResponse, Tool};
use agentlink_llm::error::LLMError;
use agentlink_llm::{FunctionCall, ToolCall};
use async_trait::async_trait;

/// One scripted turn for the mock provider.
#[derive(Debug, Clone, Default)]
pub struct MockResponse {
    pub text: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

impl MockResponse {
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self {
            text: Some(text.into()),
            tool_calls: vec![],
        }
    }

    pub fn tool_call(name: &str, arguments: &str) -> Self {
        Self {
            text: None,
            tool_calls: vec![ToolCall {
                id: format!("call_{name}"),
                call_type: "function".to_string(),
                function: FunctionCall {
                    name: name.to_string(),
                    arguments: arguments.to_string(),
                },
            }],
        }
    }
}

/// Mock LLM provider that replays a scripted sequence of responses.
///
/// Once the script runs dry every further call answers with a fixed string,
/// which keeps agent-loop tests from hanging on an exhausted queue.
pub struct MockChatProvider {
    script: Mutex<VecDeque<MockResponse>>,
}

impl MockChatProvider {
    pub fn new() -> Self {
        Self::with_script(vec![])
    }

    pub fn with_script(responses: Vec<MockResponse>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
        }
    }
}

impl Default for MockChatProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn chat_with_tools(
        &self,
        _messages: &[ChatMessage],
        _tools: Option<&[Tool]>,
    ) -> Result<Box<dyn ChatResponse>, LLMError> {
        let next = self
            .script
            .lock()
            .expect("mock script lock poisoned")
            .pop_front()
            .unwrap_or_else(|| MockResponse::text("Mock response"));

        Ok(Box::new(MockChatResponse {
            text: next.text,
            tool_calls: next.tool_calls,
        }))
    }
}

struct MockChatResponse {
    text: Option<String>,
    tool_calls: Vec<ToolCall>,
}

impl ChatResponse for MockChatResponse {
    fn text(&self) -> Option<String> {
        self.text.clone()
    }

    fn tool_calls(&self) -> Option<Vec<ToolCall>> {
        if self.tool_calls.is_empty() {
            None
        } else {
            Some(self.tool_calls.clone())
        }
    }
}

impl std::fmt::Debug for MockChatResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MockChatResponse")
    }
}

impl std::fmt::Display for MockChatResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text.as_deref().unwrap_or(""))
    }
}
