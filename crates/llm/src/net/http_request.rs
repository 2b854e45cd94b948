use serde_json::Value;

use crate::error::LLMError;

pub(crate) struct HTTPRequest {}

impl HTTPRequest {
    pub async fn post_json(url: &str, body: Value) -> Result<String, LLMError> {
        Self::post_json_with_headers(url, body, vec![]).await
    }

    pub async fn post_json_with_headers(
        url: &str,
        body: Value,
        headers: Vec<(String, String)>,
    ) -> Result<String, LLMError> {
        let client = reqwest::Client::new();
        let mut request = client.post(url).json(&body);
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(LLMError::ProviderError(format!("HTTP {status}: {text}")));
        }
        Ok(text)
    }
}
