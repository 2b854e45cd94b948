use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::agent::Agent;
use crate::protocol::{Message, Task, TaskState, TaskStatus, TaskStatusUpdateEvent};
use crate::session::SessionService;

/// Text returned when a run produces no output at all.
pub const EMPTY_RESPONSE_TEXT: &str = "応答を生成できませんでした。";

#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("Event queue closed")]
    QueueClosed,
}

/// Everything an executor needs to know about one inbound request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub task_id: String,
    pub context_id: String,
    pub message: Option<Message>,
}

impl RequestContext {
    /// Context for a fresh inbound message. The context id sticks to the
    /// message's if it carries one, so follow-ups share a session.
    pub fn new(message: Message) -> Self {
        Self {
            task_id: Uuid::new_v4().to_string(),
            context_id: message
                .context_id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            message: Some(message),
        }
    }

    /// Context addressing an existing task (cancellation).
    pub fn for_task(task_id: &str, context_id: &str) -> Self {
        Self {
            task_id: task_id.to_string(),
            context_id: context_id.to_string(),
            message: None,
        }
    }

    /// The text of the inbound message's first text part, if any.
    pub fn user_text(&self) -> Option<&str> {
        self.message.as_ref().and_then(|message| message.text())
    }
}

/// Events an executor pushes back to the request handler.
#[derive(Debug, Clone)]
pub enum ExecutorEvent {
    StatusUpdate(TaskStatusUpdateEvent),
    Task(Task),
}

/// Sending half of the per-request event channel.
#[derive(Clone)]
pub struct EventQueue {
    tx: mpsc::Sender<ExecutorEvent>,
}

impl EventQueue {
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<ExecutorEvent>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, rx)
    }

    pub async fn enqueue_event(&self, event: ExecutorEvent) -> Result<(), ExecutorError> {
        self.tx
            .send(event)
            .await
            .map_err(|_| ExecutorError::QueueClosed)
    }
}

/// Per-request adapter between the protocol surface and an agent.
#[async_trait]
pub trait AgentExecutor: Send + Sync + 'static {
    /// Handle an inbound message, pushing status updates and the final task
    /// through the queue.
    async fn execute(&self, ctx: RequestContext, queue: EventQueue) -> Result<(), ExecutorError>;

    /// Cancel the task addressed by the context.
    async fn cancel(&self, ctx: RequestContext, queue: EventQueue) -> Result<(), ExecutorError>;
}

/// The request/response bridge for an LLM-driven [`Agent`]:
/// announce `working`, drive the agent, aggregate its partial outputs, and
/// finish with a `completed` task carrying the response text.
pub struct LlmAgentExecutor {
    agent: Arc<Agent>,
    sessions: Arc<SessionService>,
    app_name: String,
}

impl LlmAgentExecutor {
    pub fn new(agent: Agent, app_name: impl Into<String>) -> Self {
        Self {
            agent: Arc::new(agent),
            sessions: Arc::new(SessionService::new()),
            app_name: app_name.into(),
        }
    }
}

#[async_trait]
impl AgentExecutor for LlmAgentExecutor {
    async fn execute(&self, ctx: RequestContext, queue: EventQueue) -> Result<(), ExecutorError> {
        let Some(user_text) = ctx.user_text().map(String::from) else {
            // Nothing to respond to; emit no events at all.
            debug!("{}: request without text parts, ignoring", self.app_name);
            return Ok(());
        };

        queue
            .enqueue_event(ExecutorEvent::StatusUpdate(TaskStatusUpdateEvent::new(
                &ctx.task_id,
                &ctx.context_id,
                TaskStatus::new(TaskState::Working),
                false,
            )))
            .await?;

        // The context id doubles as the user key, so a conversation keeps its
        // session across requests.
        let session = self
            .sessions
            .get_or_create(&self.app_name, &ctx.context_id)
            .await;
        let mut guard = session.lock().await;
        let session = &mut *guard;

        let run = self
            .agent
            .run_collect(&session.history, &user_text, &mut session.tool_ctx)
            .await;

        let mut response_text = match run {
            Ok((text, new_messages)) => {
                session.history.extend(new_messages);
                text
            }
            Err(e) => {
                // Stringify the failure into the response; the task still
                // completes (the transport never sees agent errors).
                info!("{}: agent run failed: {e}", self.app_name);
                format!("エラーが発生しました: {e}")
            }
        };

        if response_text.is_empty() {
            response_text = EMPTY_RESPONSE_TEXT.to_string();
        }

        queue
            .enqueue_event(ExecutorEvent::Task(Task::with_status(
                &ctx.task_id,
                &ctx.context_id,
                TaskStatus::with_message(
                    TaskState::Completed,
                    Message::agent_text(response_text, &ctx.context_id, &ctx.task_id),
                ),
            )))
            .await
    }

    async fn cancel(&self, ctx: RequestContext, queue: EventQueue) -> Result<(), ExecutorError> {
        queue
            .enqueue_event(ExecutorEvent::Task(Task::with_status(
                &ctx.task_id,
                &ctx.context_id,
                TaskStatus::new(TaskState::Canceled),
            )))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentlink_llm::chat::{ChatMessage, ChatProvider, ChatResponse, Tool};
    use agentlink_llm::error::LLMError;
    use agentlink_test_utils::{MockChatProvider, MockResponse};
    use tokio::sync::mpsc::Receiver;

    fn executor_with_script(script: Vec<MockResponse>) -> LlmAgentExecutor {
        let agent = Agent::builder()
            .name("bridge_agent")
            .instruction("test")
            .llm(Arc::new(MockChatProvider::with_script(script)))
            .build()
            .unwrap();
        LlmAgentExecutor::new(agent, "bridge-test")
    }

    async fn drain(mut rx: Receiver<ExecutorEvent>) -> Vec<ExecutorEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_working_then_completed() {
        let executor = executor_with_script(vec![MockResponse::text("答えです")]);
        let ctx = RequestContext::new(Message::user_text("質問"));
        let task_id = ctx.task_id.clone();
        let (queue, rx) = EventQueue::new(8);

        executor.execute(ctx, queue).await.unwrap();
        let events = drain(rx).await;

        assert_eq!(events.len(), 2);
        match &events[0] {
            ExecutorEvent::StatusUpdate(update) => {
                assert_eq!(update.status.state, TaskState::Working);
                assert!(!update.is_final);
                assert_eq!(update.task_id, task_id);
            }
            other => panic!("Expected StatusUpdate, got {other:?}"),
        }
        match &events[1] {
            ExecutorEvent::Task(task) => {
                assert_eq!(task.id, task_id);
                assert_eq!(task.status.state, TaskState::Completed);
                let message = task.status.message.as_ref().unwrap();
                assert_eq!(message.text(), Some("答えです"));
                assert_eq!(message.task_id.as_deref(), Some(task_id.as_str()));
            }
            other => panic!("Expected Task, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_message_emits_nothing() {
        let executor = executor_with_script(vec![MockResponse::text("unused")]);
        let mut message = Message::user_text("x");
        message.parts.clear();
        let ctx = RequestContext::new(message);
        let (queue, rx) = EventQueue::new(8);

        executor.execute(ctx, queue).await.unwrap();
        assert!(drain(rx).await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_aggregate_gets_fallback_text() {
        // A script of nothing but tool calls produces no text before the cap.
        let script = (0..12)
            .map(|_| MockResponse::tool_call("missing_tool", "{}"))
            .collect();
        let executor = executor_with_script(script);
        let ctx = RequestContext::new(Message::user_text("loop"));
        let (queue, rx) = EventQueue::new(8);

        executor.execute(ctx, queue).await.unwrap();
        let events = drain(rx).await;

        match events.last().unwrap() {
            ExecutorEvent::Task(task) => {
                let message = task.status.message.as_ref().unwrap();
                assert_eq!(message.text(), Some(EMPTY_RESPONSE_TEXT));
            }
            other => panic!("Expected Task, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_agent_error_is_stringified_into_response() {
        struct FailingProvider;

        #[async_trait]
        impl ChatProvider for FailingProvider {
            async fn chat_with_tools(
                &self,
                _messages: &[ChatMessage],
                _tools: Option<&[Tool]>,
            ) -> Result<Box<dyn ChatResponse>, LLMError> {
                Err(LLMError::ProviderError("model offline".to_string()))
            }
        }

        let agent = Agent::builder()
            .name("bridge_agent")
            .instruction("test")
            .llm(Arc::new(FailingProvider))
            .build()
            .unwrap();
        let executor = LlmAgentExecutor::new(agent, "bridge-test");
        let ctx = RequestContext::new(Message::user_text("質問"));
        let (queue, rx) = EventQueue::new(8);

        executor.execute(ctx, queue).await.unwrap();
        let events = drain(rx).await;

        match events.last().unwrap() {
            ExecutorEvent::Task(task) => {
                assert_eq!(task.status.state, TaskState::Completed);
                let text = task.status.message.as_ref().unwrap().text().unwrap();
                assert!(text.starts_with("エラーが発生しました:"));
                assert!(text.contains("model offline"));
            }
            other => panic!("Expected Task, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_session_history_carries_across_requests() {
        let executor = executor_with_script(vec![
            MockResponse::text("first"),
            MockResponse::text("second"),
        ]);
        let context_id = "shared-context";

        for _ in 0..2 {
            let mut message = Message::user_text("hello");
            message.context_id = Some(context_id.to_string());
            let (queue, rx) = EventQueue::new(8);
            executor
                .execute(RequestContext::new(message), queue)
                .await
                .unwrap();
            drain(rx).await;
        }

        let session = executor
            .sessions
            .get("bridge-test", context_id)
            .await
            .unwrap();
        // Two turns of user + assistant
        assert_eq!(session.lock().await.history.len(), 4);
    }

    #[tokio::test]
    async fn test_cancel_emits_canceled_task() {
        let executor = executor_with_script(vec![]);
        let ctx = RequestContext::for_task("task-1", "ctx-1");
        let (queue, rx) = EventQueue::new(8);

        executor.cancel(ctx, queue).await.unwrap();
        let events = drain(rx).await;

        assert_eq!(events.len(), 1);
        match &events[0] {
            ExecutorEvent::Task(task) => {
                assert_eq!(task.id, "task-1");
                assert_eq!(task.status.state, TaskState::Canceled);
                assert!(task.status.message.is_none());
            }
            other => panic!("Expected Task, got {other:?}"),
        }
    }
}
