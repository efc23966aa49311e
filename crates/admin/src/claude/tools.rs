//! Tools offered to Claude while generating reports.

use serde_json::{Value, json};
use tracing::instrument;

use super::error::ClaudeError;
use super::types::Tool;

/// Name of the analytics lookup tool.
pub const ANALYTICS_TOOL: &str = "get_analytics_data";

/// Tool returning the precomputed business analytics.
#[must_use]
pub fn analytics_tool() -> Tool {
    Tool {
        name: ANALYTICS_TOOL.to_string(),
        description: "Get the bakery's analytics: total revenue, total expenses, net profit, monthly revenue for the last six months, top products by revenue and the largest expenses.".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
    }
}

/// Serves tool calls from data gathered before the conversation started.
#[derive(Debug, Default)]
pub struct ToolExecutor {
    analytics: Option<Value>,
}

impl ToolExecutor {
    /// An executor with no data; every tool call fails.
    #[must_use]
    pub const fn empty() -> Self {
        Self { analytics: None }
    }

    /// An executor answering `get_analytics_data` with `analytics`.
    #[must_use]
    pub const fn with_analytics(analytics: Value) -> Self {
        Self {
            analytics: Some(analytics),
        }
    }

    /// Execute a tool and return the result as a string.
    ///
    /// # Errors
    ///
    /// Returns `ClaudeError::ToolExecution` for unknown tools or missing data.
    #[instrument(skip(self, _input), fields(tool_name = %name))]
    pub fn execute(&self, name: &str, _input: &Value) -> Result<String, ClaudeError> {
        match name {
            ANALYTICS_TOOL => self
                .analytics
                .as_ref()
                .map(Value::to_string)
                .ok_or_else(|| ClaudeError::ToolExecution("no analytics data available".to_string())),
            other => Err(ClaudeError::ToolExecution(format!("unknown tool: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analytics_tool_returns_data() {
        let executor = ToolExecutor::with_analytics(json!({"totalRevenue": "150"}));
        let result = executor
            .execute(ANALYTICS_TOOL, &json!({}))
            .expect("execute");
        assert_eq!(result, r#"{"totalRevenue":"150"}"#);
    }

    #[test]
    fn test_unknown_tool_and_missing_data() {
        assert!(ToolExecutor::empty().execute(ANALYTICS_TOOL, &json!({})).is_err());
        let err = ToolExecutor::with_analytics(json!({}))
            .execute("get_orders", &json!({}))
            .expect_err("should fail");
        assert_eq!(err.to_string(), "tool execution error: unknown tool: get_orders");
    }
}
