// Re-export for convenience
pub use async_trait::async_trait;

pub use agentlink_core as core;
pub use agentlink_llm as llm;
