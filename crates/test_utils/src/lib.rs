pub mod llm;

pub use llm::{MockChatProvider, MockResponse};
