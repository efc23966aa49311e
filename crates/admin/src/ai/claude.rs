//! [`TextGenerator`] backed by Claude.
//!
//! Each prompt name maps to an askama text template, the tools it may call
//! and the output field that receives the model's final text.

use askama::Template;
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use super::analytics::ANALYTICS_SUMMARY_PROMPT;
use super::sales_report::{SALES_REPORT_PROMPT, SalesReportInput};
use super::{GenerateError, TextGenerator};
use crate::claude::{
    ANALYTICS_TOOL, ClaudeClient, ContentBlock, Message, StopReason, Tool, ToolExecutor,
    analytics_tool,
};

/// Maximum number of tool use iterations to prevent infinite loops.
const MAX_TOOL_ITERATIONS: usize = 10;

#[derive(Template)]
#[template(path = "prompts/sales_report.txt")]
struct SalesReportTemplate<'a> {
    sales_data: &'a str,
    expenses_data: &'a str,
    start_date: String,
    end_date: String,
}

#[derive(Template)]
#[template(path = "prompts/analytics_summary.txt")]
struct AnalyticsSummaryTemplate<'a> {
    tool_name: &'a str,
}

/// A rendered prompt ready to send.
struct PreparedPrompt {
    text: String,
    tools: Vec<Tool>,
    executor: ToolExecutor,
    output_field: &'static str,
}

impl PreparedPrompt {
    fn for_prompt(prompt: &str, input: Value) -> Result<Self, GenerateError> {
        match prompt {
            SALES_REPORT_PROMPT => {
                let input: SalesReportInput = serde_json::from_value(input)
                    .map_err(|e| GenerateError::InvalidInput(e.to_string()))?;
                let text = SalesReportTemplate {
                    sales_data: &input.sales_data,
                    expenses_data: &input.expenses_data,
                    start_date: input.start_date.to_string(),
                    end_date: input.end_date.to_string(),
                }
                .render()?;
                Ok(Self {
                    text,
                    tools: Vec::new(),
                    executor: ToolExecutor::empty(),
                    output_field: "report",
                })
            }
            ANALYTICS_SUMMARY_PROMPT => {
                let analytics = input
                    .get("analytics")
                    .filter(|value| value.is_object())
                    .cloned()
                    .ok_or_else(|| {
                        GenerateError::InvalidInput("missing `analytics` object".to_string())
                    })?;
                let text = AnalyticsSummaryTemplate {
                    tool_name: ANALYTICS_TOOL,
                }
                .render()?;
                Ok(Self {
                    text,
                    tools: vec![analytics_tool()],
                    executor: ToolExecutor::with_analytics(analytics),
                    output_field: "summary",
                })
            }
            other => Err(GenerateError::UnknownPrompt(other.to_string())),
        }
    }
}

/// Claude-backed text generator.
#[derive(Debug, Clone)]
pub struct ClaudeGenerator {
    client: ClaudeClient,
}

impl ClaudeGenerator {
    #[must_use]
    pub const fn new(client: ClaudeClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TextGenerator for ClaudeGenerator {
    #[instrument(skip(self, input), fields(model = %self.client.model()))]
    async fn generate(&self, prompt: &str, input: Value) -> Result<Value, GenerateError> {
        let prepared = PreparedPrompt::for_prompt(prompt, input)?;
        let tools = (!prepared.tools.is_empty()).then(|| prepared.tools.clone());
        let mut messages = vec![Message::user(prepared.text.clone())];
        let mut iterations = 0;

        loop {
            iterations += 1;
            if iterations > MAX_TOOL_ITERATIONS {
                warn!("Too many tool iterations, stopping");
                return Err(GenerateError::TooManyToolIterations);
            }

            let response = self
                .client
                .chat(messages.clone(), None, tools.clone())
                .await?;

            info!(
                stop_reason = ?response.stop_reason,
                content_blocks = response.content.len(),
                "Claude response received"
            );

            if response.stop_reason != Some(StopReason::ToolUse) {
                return Ok(json!({ prepared.output_field: response.text().trim() }));
            }

            let tool_results: Vec<ContentBlock> = response
                .content
                .iter()
                .filter_map(|block| match block {
                    ContentBlock::ToolUse { id, name, input } => {
                        let (content, is_error) = match prepared.executor.execute(name, input) {
                            Ok(result) => (result, false),
                            Err(e) => (format!("Error: {e}"), true),
                        };
                        Some(ContentBlock::ToolResult {
                            tool_use_id: id.clone(),
                            content,
                            is_error: Some(is_error),
                        })
                    }
                    _ => None,
                })
                .collect();

            messages.push(Message::assistant_blocks(response.content));
            messages.push(Message::user_blocks(tool_results));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sales_report_prompt_renders_input() {
        let input = json!({
            "salesData": "[{\"product\":\"Bento Cake\"}]",
            "expensesData": "[]",
            "startDate": "2024-03-01",
            "endDate": "2024-03-31"
        });
        let prepared = PreparedPrompt::for_prompt(SALES_REPORT_PROMPT, input).expect("prepare");
        assert!(prepared.text.contains("Start Date: 2024-03-01"));
        assert!(prepared.text.contains("End Date: 2024-03-31"));
        assert!(prepared.text.contains(r#"[{"product":"Bento Cake"}]"#));
        assert!(prepared.tools.is_empty());
        assert_eq!(prepared.output_field, "report");
    }

    #[test]
    fn test_analytics_prompt_offers_tool() {
        let input = json!({"analytics": {"totalRevenue": 405.0}});
        let prepared =
            PreparedPrompt::for_prompt(ANALYTICS_SUMMARY_PROMPT, input).expect("prepare");
        assert!(prepared.text.contains(ANALYTICS_TOOL));
        assert_eq!(prepared.tools.len(), 1);
        assert_eq!(prepared.output_field, "summary");
        assert_eq!(
            prepared
                .executor
                .execute(ANALYTICS_TOOL, &json!({}))
                .expect("tool"),
            r#"{"totalRevenue":405.0}"#
        );
    }

    #[test]
    fn test_prompt_input_errors() {
        assert!(matches!(
            PreparedPrompt::for_prompt("poem", json!({})),
            Err(GenerateError::UnknownPrompt(_))
        ));
        assert!(matches!(
            PreparedPrompt::for_prompt(ANALYTICS_SUMMARY_PROMPT, json!({})),
            Err(GenerateError::InvalidInput(_))
        ));
        assert!(matches!(
            PreparedPrompt::for_prompt(SALES_REPORT_PROMPT, json!({"salesData": "[]"})),
            Err(GenerateError::InvalidInput(_))
        ));
    }
}
