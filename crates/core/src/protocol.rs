use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a message participant on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
}

/// A single content part of a message, discriminated by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Part {
    Text { text: String },
}

impl Part {
    pub fn text<S: Into<String>>(text: S) -> Self {
        Part::Text { text: text.into() }
    }
}

fn message_kind() -> String {
    "message".to_string()
}

/// A protocol message exchanged between user and agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub message_id: String,
    pub role: Role,
    pub parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
    #[serde(default = "message_kind")]
    pub kind: String,
}

impl Message {
    /// A user text message with a fresh id, unbound to any task.
    pub fn user_text<S: Into<String>>(text: S) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            role: Role::User,
            parts: vec![Part::text(text)],
            task_id: None,
            context_id: None,
            kind: message_kind(),
        }
    }

    /// An agent text message bound to a task and context.
    pub fn agent_text<S: Into<String>>(text: S, context_id: &str, task_id: &str) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            role: Role::Agent,
            parts: vec![Part::text(text)],
            task_id: Some(task_id.to_string()),
            context_id: Some(context_id.to_string()),
            kind: message_kind(),
        }
    }

    /// The text of the first text part, if any.
    pub fn text(&self) -> Option<&str> {
        self.parts.iter().map(|Part::Text { text }| text.as_str()).next()
    }
}

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    Submitted,
    Working,
    InputRequired,
    Completed,
    Canceled,
    Failed,
    Unknown,
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Canceled | TaskState::Failed
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatus {
    pub state: TaskState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

impl TaskStatus {
    pub fn new(state: TaskState) -> Self {
        Self {
            state,
            message: None,
        }
    }

    pub fn with_message(state: TaskState, message: Message) -> Self {
        Self {
            state,
            message: Some(message),
        }
    }
}

fn task_kind() -> String {
    "task".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub context_id: String,
    pub status: TaskStatus,
    #[serde(default = "task_kind")]
    pub kind: String,
}

impl Task {
    /// A freshly submitted task.
    pub fn submitted(id: &str, context_id: &str) -> Self {
        Self {
            id: id.to_string(),
            context_id: context_id.to_string(),
            status: TaskStatus::new(TaskState::Submitted),
            kind: task_kind(),
        }
    }

    pub fn with_status(id: &str, context_id: &str, status: TaskStatus) -> Self {
        Self {
            id: id.to_string(),
            context_id: context_id.to_string(),
            status,
            kind: task_kind(),
        }
    }
}

fn status_update_kind() -> String {
    "status-update".to_string()
}

/// Interim task status announcement emitted while a request is in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusUpdateEvent {
    pub task_id: String,
    pub context_id: String,
    pub status: TaskStatus,
    #[serde(rename = "final")]
    pub is_final: bool,
    #[serde(default = "status_update_kind")]
    pub kind: String,
}

impl TaskStatusUpdateEvent {
    pub fn new(task_id: &str, context_id: &str, status: TaskStatus, is_final: bool) -> Self {
        Self {
            task_id: task_id.to_string(),
            context_id: context_id.to_string(),
            status,
            is_final,
            kind: status_update_kind(),
        }
    }
}

/// Parameters of the `message/send` method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSendParams {
    pub message: Message,
}

/// Parameters of the `tasks/get` and `tasks/cancel` methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskIdParams {
    pub id: String,
}

/// A `message/send` call may be answered with a task or a bare message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SendMessageResult {
    Task(Task),
    Message(Message),
}

impl SendMessageResult {
    /// Dig the response text out of whichever shape came back: a task's
    /// status message, or a direct message.
    pub fn text(&self) -> Option<&str> {
        match self {
            SendMessageResult::Task(task) => {
                task.status.message.as_ref().and_then(|message| message.text())
            }
            SendMessageResult::Message(message) => message.text(),
        }
    }
}
