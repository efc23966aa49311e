//! AI-generated business text.
//!
//! Generation goes through the [`TextGenerator`] contract: a prompt name plus
//! a JSON input in, a JSON output of the prompt's declared shape out. The
//! call suspends until the response arrives and is never retried.
//!
//! # Prompts
//!
//! | Prompt | Input | Output |
//! |---|---|---|
//! | `generateSalesReportPrompt` | `{salesData, expensesData, startDate, endDate}` | `{report}` |
//! | `analyticsSummaryPrompt` | `{analytics}` (served to the model through a tool) | `{summary}` |

pub mod analytics;
pub mod claude;
pub mod sales_report;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::claude::ClaudeError;

pub use analytics::{
    ANALYTICS_SUMMARY_PROMPT, Analytics, AnalyticsCharts, AnalyticsSummary, ExpenseShare,
    MonthlyRevenue, ProductRevenue, compute_analytics, generate_analytics_summary,
};
pub use claude::ClaudeGenerator;
pub use sales_report::{SALES_REPORT_PROMPT, SalesReport, SalesReportInput, generate_sales_report};

/// Errors that can occur while generating text.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// No prompt is registered under this name.
    #[error("unknown prompt: {0}")]
    UnknownPrompt(String),

    /// The input does not match the prompt's declared shape.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The generator returned something other than the declared output shape.
    #[error("malformed output: {0}")]
    MalformedOutput(String),

    /// The prompt template failed to render.
    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    /// Claude API call failed.
    #[error("Claude API error: {0}")]
    Claude(#[from] ClaudeError),

    /// The model kept calling tools without producing an answer.
    #[error("too many tool iterations")]
    TooManyToolIterations,
}

/// External text generator.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run `prompt` on `input` and return the prompt's output object.
    async fn generate(&self, prompt: &str, input: Value) -> Result<Value, GenerateError>;
}

/// Read a string field from a generator output object.
fn output_text(output: &Value, field: &str) -> Result<String, GenerateError> {
    output
        .get(field)
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| GenerateError::MalformedOutput(format!("missing string field `{field}`")))
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_output_text() {
        let output = json!({"report": "Sales grew."});
        assert_eq!(output_text(&output, "report").expect("text"), "Sales grew.");
        assert!(matches!(
            output_text(&output, "summary"),
            Err(GenerateError::MalformedOutput(_))
        ));
    }
}
