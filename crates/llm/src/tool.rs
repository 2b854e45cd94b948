use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt::Debug;

use crate::chat::{FunctionTool, Tool};

#[derive(Debug, thiserror::Error)]
pub enum ToolCallError {
    #[error("Runtime Error: {0}")]
    RuntimeError(#[from] Box<dyn std::error::Error + Sync + Send>),

    #[error("Serde Error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

/// Mutable state shared between tool invocations within one session.
///
/// Tools may read and write arbitrary JSON values keyed by name; the owning
/// session keeps the bag alive across requests.
#[derive(Debug, Clone, Default)]
pub struct ToolContext {
    state: Map<String, Value>,
}

impl ToolContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.state.get(key)
    }

    pub fn set<K: Into<String>>(&mut self, key: K, value: Value) {
        self.state.insert(key.into(), value);
    }

    /// Append a value to the array stored under `key`, creating it if absent.
    pub fn push<K: Into<String>>(&mut self, key: K, value: Value) {
        let entry = self
            .state
            .entry(key.into())
            .or_insert_with(|| Value::Array(vec![]));
        if let Value::Array(items) = entry {
            items.push(value);
        }
    }
}

#[async_trait]
pub trait ToolT: Send + Sync + Debug {
    /// The name of the tool.
    fn name(&self) -> &'static str;
    /// A description explaining the tool's purpose.
    fn description(&self) -> &'static str;
    /// Return a JSON Schema describing the expected arguments.
    fn args_schema(&self) -> Value;
    /// Run the tool with the given arguments (in JSON) and return the result (in JSON).
    async fn run(&self, args: Value, ctx: &mut ToolContext) -> Result<Value, ToolCallError>;
}

impl From<&dyn ToolT> for Tool {
    fn from(tool: &dyn ToolT) -> Self {
        Tool {
            tool_type: "function".to_string(),
            function: FunctionTool {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.args_schema(),
            },
        }
    }
}
