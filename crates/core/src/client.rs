use std::time::Duration;

use log::debug;
use serde_json::Value;

use crate::card::AgentCard;
use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
use crate::protocol::{Message, MessageSendParams, SendMessageResult, Task};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Text returned when a remote agent's answer carries no extractable text.
pub const NO_RESPONSE_TEXT: &str = "エージェントからの応答を取得できませんでした。";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP Error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Agent returned error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Client side of the protocol: formats method calls into JSON-RPC envelopes
/// and parses the typed results back out.
#[derive(Debug, Clone)]
pub struct A2AClient {
    http: reqwest::Client,
    base_url: String,
}

impl A2AClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, ClientError> {
        let request = JsonRpcRequest::new(method, params);
        debug!("A2A call {} to {}", method, self.base_url);

        let response: JsonRpcResponse = self
            .http
            .post(&self.base_url)
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await?
            .json()
            .await?;

        into_result(response)
    }

    /// Send a message and return whichever shape the agent answered with.
    pub async fn send_message(&self, message: Message) -> Result<SendMessageResult, ClientError> {
        let params = serde_json::to_value(MessageSendParams { message })?;
        let result = self.call("message/send", params).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Send plain text and return the remote agent's response text, falling
    /// back to a fixed string when none can be extracted.
    pub async fn send_text(&self, text: &str) -> Result<String, ClientError> {
        let result = self.send_message(Message::user_text(text)).await?;
        Ok(result
            .text()
            .map(String::from)
            .unwrap_or_else(|| NO_RESPONSE_TEXT.to_string()))
    }

    pub async fn get_task(&self, id: &str) -> Result<Task, ClientError> {
        let result = self
            .call("tasks/get", serde_json::json!({ "id": id }))
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    pub async fn cancel_task(&self, id: &str) -> Result<Task, ClientError> {
        let result = self
            .call("tasks/cancel", serde_json::json!({ "id": id }))
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Fetch the remote agent's card document.
    pub async fn fetch_card(&self) -> Result<AgentCard, ClientError> {
        let url = format!(
            "{}/.well-known/agent-card.json",
            self.base_url.trim_end_matches('/')
        );
        let card = self
            .http
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .json()
            .await?;
        Ok(card)
    }
}

fn into_result(response: JsonRpcResponse) -> Result<Value, ClientError> {
    if let Some(error) = response.error {
        return Err(ClientError::Rpc {
            code: error.code,
            message: error.message,
        });
    }
    response
        .result
        .ok_or_else(|| ClientError::UnexpectedResponse("neither result nor error".to_string()))
}
