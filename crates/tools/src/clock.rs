use async_trait::async_trait;
use chrono::Local;
use serde_json::Value;

use agentlink_llm::tool::{ToolCallError, ToolContext, ToolT};

/// Japanese long-form timestamp, matching the assistant's locale.
const TIME_FORMAT: &str = "%Y年%m月%d日 %H時%M分%S秒";

/// Reports the current local time and records each lookup in the session
/// state under `time_queries`.
#[derive(Debug, Default)]
pub struct CurrentTime;

#[async_trait]
impl ToolT for CurrentTime {
    fn name(&self) -> &'static str {
        "get_current_time"
    }

    fn description(&self) -> &'static str {
        "Get the current date and time"
    }

    fn args_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn run(&self, _args: Value, ctx: &mut ToolContext) -> Result<Value, ToolCallError> {
        let now = Local::now();
        ctx.push("time_queries", Value::String(now.to_rfc3339()));
        Ok(Value::String(now.format(TIME_FORMAT).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reports_japanese_format() {
        let tool = CurrentTime;
        let mut ctx = ToolContext::new();

        let result = tool
            .run(serde_json::json!({}), &mut ctx)
            .await
            .unwrap();
        let text = result.as_str().unwrap();
        assert!(text.contains("年"));
        assert!(text.contains("月"));
        assert!(text.contains("秒"));
    }

    #[tokio::test]
    async fn test_records_query_history() {
        let tool = CurrentTime;
        let mut ctx = ToolContext::new();

        tool.run(serde_json::json!({}), &mut ctx).await.unwrap();
        tool.run(serde_json::json!({}), &mut ctx).await.unwrap();

        let history = ctx.get("time_queries").unwrap().as_array().unwrap();
        assert_eq!(history.len(), 2);
        // RFC 3339 timestamps
        assert!(history[0].as_str().unwrap().contains('T'));
    }
}
