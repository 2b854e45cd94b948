pub mod chat;
pub mod error;
mod net;
pub mod providers;
pub mod tool;
pub(crate) mod utils;

pub use chat::{ChatMessage, ChatProvider, ChatResponse, ChatRole, FunctionCall, ToolCall};
pub use error::LLMError;
pub use tool::{ToolCallError, ToolContext, ToolT};
