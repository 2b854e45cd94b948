pub mod agent;
pub mod card;
pub mod client;
pub mod executor;
pub mod jsonrpc;
pub mod protocol;
pub mod server;
pub mod session;

pub use agent::{Agent, AgentBuilder, AgentError};
pub use client::{A2AClient, ClientError};
pub use executor::{AgentExecutor, EventQueue, ExecutorEvent, LlmAgentExecutor, RequestContext};
pub use server::A2AServer;
