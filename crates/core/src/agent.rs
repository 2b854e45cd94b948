use std::sync::Arc;

use agentlink_llm::chat::{ChatMessage, ChatMessageBuilder, ChatProvider, ChatRole, Tool};
use agentlink_llm::error::LLMError;
use agentlink_llm::{FunctionCall, ToolCall, ToolContext, ToolT};
use log::{debug, warn};
use serde_json::Value;
use tokio::sync::mpsc;

/// Hard cap on model calls per request. Tool loops that have not converged by
/// then are cut off cleanly.
const DEFAULT_MAX_LLM_CALLS: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("LLM error: {0}")]
    Llm(#[from] LLMError),
}

#[derive(Debug, thiserror::Error)]
pub enum AgentBuildError {
    #[error("Agent requires an LLM provider")]
    MissingProvider,
    #[error("Agent requires a name")]
    MissingName,
}

/// An LLM-driven agent: a persona (instruction), a model, and a tool set.
pub struct Agent {
    name: String,
    description: String,
    instruction: String,
    llm: Arc<dyn ChatProvider>,
    tools: Vec<Arc<dyn ToolT>>,
    max_llm_calls: usize,
}

impl Agent {
    pub fn builder() -> AgentBuilder {
        AgentBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    fn tool_declarations(&self) -> Vec<Tool> {
        self.tools.iter().map(|tool| tool.as_ref().into()).collect()
    }

    async fn dispatch_tool_call(&self, call: &ToolCall, ctx: &mut ToolContext) -> Value {
        let Some(tool) = self.tools.iter().find(|tool| tool.name() == call.function.name) else {
            warn!("{}: model requested unknown tool {}", self.name, call.function.name);
            return serde_json::json!({
                "error": format!("Unknown tool: {}", call.function.name)
            });
        };

        let args: Value = serde_json::from_str(&call.function.arguments)
            .unwrap_or(Value::Object(serde_json::Map::new()));

        debug!("{}: running tool {}", self.name, tool.name());
        match tool.run(args, ctx).await {
            Ok(value) => value,
            // Tool failures go back to the model as data, not up the stack.
            Err(e) => serde_json::json!({ "error": e.to_string() }),
        }
    }

    /// Drive the model until it answers in plain text or the call cap is hit.
    ///
    /// Assistant text produced along the way (including text accompanying a
    /// tool call) is emitted through `tx` as a partial output. Returns the
    /// messages to append to the conversation history.
    pub async fn run(
        &self,
        history: &[ChatMessage],
        input: &str,
        ctx: &mut ToolContext,
        tx: &mpsc::Sender<String>,
    ) -> Result<Vec<ChatMessage>, AgentError> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system().content(&self.instruction).build());
        messages.extend_from_slice(history);

        let user_message = ChatMessage::user().content(input).build();
        messages.push(user_message.clone());
        let mut new_messages = vec![user_message];

        let declarations = self.tool_declarations();
        let tools = if declarations.is_empty() {
            None
        } else {
            Some(declarations.as_slice())
        };

        for _ in 0..self.max_llm_calls {
            let response = self.llm.chat_with_tools(&messages, tools).await?;
            let text = response.text().unwrap_or_default();
            if !text.is_empty() {
                let _ = tx.send(text.clone()).await;
            }

            let Some(calls) = response.tool_calls() else {
                let answer = ChatMessage::assistant().content(text).build();
                messages.push(answer.clone());
                new_messages.push(answer);
                return Ok(new_messages);
            };

            let request = ChatMessage::assistant()
                .content(text)
                .tool_use(calls.clone())
                .build();
            messages.push(request.clone());
            new_messages.push(request);

            let mut results = Vec::with_capacity(calls.len());
            for call in &calls {
                let result = self.dispatch_tool_call(call, ctx).await;
                results.push(ToolCall {
                    id: call.id.clone(),
                    call_type: call.call_type.clone(),
                    function: FunctionCall {
                        name: call.function.name.clone(),
                        arguments: result.to_string(),
                    },
                });
            }

            let result_message = ChatMessageBuilder::new(ChatRole::Tool)
                .tool_result(results)
                .build();
            messages.push(result_message.clone());
            new_messages.push(result_message);
        }

        warn!(
            "{}: stopping after {} model calls without a final answer",
            self.name, self.max_llm_calls
        );
        Ok(new_messages)
    }

    /// Run and aggregate all emitted partial outputs into a single string.
    pub async fn run_collect(
        &self,
        history: &[ChatMessage],
        input: &str,
        ctx: &mut ToolContext,
    ) -> Result<(String, Vec<ChatMessage>), AgentError> {
        // At most one chunk per model call, so the buffer can hold them all
        // before this function starts draining.
        let (tx, mut rx) = mpsc::channel(self.max_llm_calls.max(16));
        let new_messages = self.run(history, input, ctx, &tx).await?;
        drop(tx);

        let mut response_text = String::new();
        while let Some(chunk) = rx.recv().await {
            response_text.push_str(&chunk);
        }
        Ok((response_text, new_messages))
    }
}

/// Builder for [`Agent`]
#[derive(Default)]
pub struct AgentBuilder {
    name: Option<String>,
    description: String,
    instruction: String,
    llm: Option<Arc<dyn ChatProvider>>,
    tools: Vec<Arc<dyn ToolT>>,
    max_llm_calls: usize,
}

impl AgentBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    pub fn llm(mut self, llm: Arc<dyn ChatProvider>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn tool(mut self, tool: Arc<dyn ToolT>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn tools(mut self, tools: Vec<Arc<dyn ToolT>>) -> Self {
        self.tools.extend(tools);
        self
    }

    pub fn max_llm_calls(mut self, max_llm_calls: usize) -> Self {
        self.max_llm_calls = max_llm_calls;
        self
    }

    pub fn build(self) -> Result<Agent, AgentBuildError> {
        let name = self.name.ok_or(AgentBuildError::MissingName)?;
        let llm = self.llm.ok_or(AgentBuildError::MissingProvider)?;
        Ok(Agent {
            name,
            description: self.description,
            instruction: self.instruction,
            llm,
            tools: self.tools,
            max_llm_calls: if self.max_llm_calls == 0 {
                DEFAULT_MAX_LLM_CALLS
            } else {
                self.max_llm_calls
            },
        })
    }
}
