//! AI sales report over a date range.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use bakesnplates_core::OrderStatus;

use super::{GenerateError, TextGenerator, output_text};
use crate::services::BusinessSnapshot;

/// Prompt name of the sales report.
pub const SALES_REPORT_PROMPT: &str = "generateSalesReportPrompt";

/// Input of the sales report prompt.
///
/// Sales and expenses are passed as JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReportInput {
    pub sales_data: String,
    pub expenses_data: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Serialize)]
struct SaleRow<'a> {
    date: NaiveDate,
    customer: &'a str,
    product: &'a str,
    total: &'a str,
}

#[derive(Serialize)]
struct ExpenseRow<'a> {
    date: NaiveDate,
    item: &'a str,
    cost: Decimal,
}

impl SalesReportInput {
    /// Collect completed orders and expenses dated within `start..=end`.
    ///
    /// # Errors
    ///
    /// Returns `GenerateError::InvalidInput` if `start` is after `end`.
    pub fn from_snapshot(
        snapshot: &BusinessSnapshot,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, GenerateError> {
        if start > end {
            return Err(GenerateError::InvalidInput(format!(
                "start date {start} is after end date {end}"
            )));
        }
        let in_range = |date: NaiveDate| (start..=end).contains(&date);

        let sales: Vec<SaleRow<'_>> = snapshot
            .orders
            .iter()
            .filter(|order| order.status == OrderStatus::Completed)
            .filter(|order| in_range(order.date.date_naive()))
            .map(|order| SaleRow {
                date: order.date.date_naive(),
                customer: &order.customer,
                product: &order.product,
                total: &order.total,
            })
            .collect();

        let expenses: Vec<ExpenseRow<'_>> = snapshot
            .expenses
            .iter()
            .filter(|expense| in_range(expense.date.date_naive()))
            .map(|expense| ExpenseRow {
                date: expense.date.date_naive(),
                item: &expense.name,
                cost: expense.cost,
            })
            .collect();

        Ok(Self {
            sales_data: to_json(&sales)?,
            expenses_data: to_json(&expenses)?,
            start_date: start,
            end_date: end,
        })
    }
}

fn to_json<T: Serialize>(rows: &T) -> Result<String, GenerateError> {
    serde_json::to_string(rows).map_err(|e| GenerateError::InvalidInput(e.to_string()))
}

/// Output of the sales report prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesReport {
    pub report: String,
}

/// Generate a sales report.
///
/// # Errors
///
/// Returns any `GenerateError` from the generator, or `MalformedOutput` if
/// the output lacks a `report` string.
#[instrument(skip(generator, input), fields(start = %input.start_date, end = %input.end_date))]
pub async fn generate_sales_report(
    generator: &dyn TextGenerator,
    input: &SalesReportInput,
) -> Result<SalesReport, GenerateError> {
    let value =
        serde_json::to_value(input).map_err(|e| GenerateError::InvalidInput(e.to_string()))?;
    let output = generator.generate(SALES_REPORT_PROMPT, value).await?;
    let report = output_text(&output, "report")?;
    info!(chars = report.len(), "Sales report generated");
    Ok(SalesReport { report })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;
    use crate::ai::testing::RecordingGenerator;
    use crate::models::{NewExpense, NewOrder};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn snapshot() -> BusinessSnapshot {
        let at = |d: u32| Utc.with_ymd_and_hms(2024, 3, d, 12, 0, 0).single().expect("time");
        BusinessSnapshot {
            orders: vec![
                NewOrder::new("Ama", "Bento Cake (x1)", "GH₵150.00", OrderStatus::Completed)
                    .into_order("o1".into(), at(10)),
                NewOrder::new("Kofi", "Doughnuts (6) (x1)", "GH₵65.00", OrderStatus::Pending)
                    .into_order("o2".into(), at(12)),
                NewOrder::new("Esi", "Sobolo Juice (x2)", "GH₵40.00", OrderStatus::Completed)
                    .into_order("o3".into(), at(25)),
            ],
            expenses: vec![
                NewExpense::new("Flour", Decimal::new(150, 0), at(10)).with_id("e1".into()),
                NewExpense::new("Butter", Decimal::new(120, 0), at(28)).with_id("e2".into()),
            ],
            ..BusinessSnapshot::default()
        }
    }

    #[test]
    fn test_from_snapshot_filters_range_and_status() {
        let input =
            SalesReportInput::from_snapshot(&snapshot(), date(2024, 3, 1), date(2024, 3, 20))
                .expect("input");
        let sales: serde_json::Value = serde_json::from_str(&input.sales_data).expect("json");
        assert_eq!(sales.as_array().map(Vec::len), Some(1));
        assert_eq!(sales[0]["product"], "Bento Cake (x1)");
        assert_eq!(sales[0]["date"], "2024-03-10");

        let expenses: serde_json::Value = serde_json::from_str(&input.expenses_data).expect("json");
        assert_eq!(expenses.as_array().map(Vec::len), Some(1));
        assert_eq!(expenses[0]["item"], "Flour");
    }

    #[test]
    fn test_range_is_inclusive() {
        let input =
            SalesReportInput::from_snapshot(&snapshot(), date(2024, 3, 25), date(2024, 3, 25))
                .expect("input");
        assert!(input.sales_data.contains("Sobolo Juice"));
    }

    #[test]
    fn test_reversed_range_rejected() {
        let err = SalesReportInput::from_snapshot(&snapshot(), date(2024, 4, 1), date(2024, 3, 1))
            .expect_err("should fail");
        assert!(matches!(err, GenerateError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_generate_sales_report() {
        let generator = RecordingGenerator::new(json!({"report": "March was strong."}));
        let input =
            SalesReportInput::from_snapshot(&snapshot(), date(2024, 3, 1), date(2024, 3, 31))
                .expect("input");

        let report = generate_sales_report(&generator, &input)
            .await
            .expect("report");
        assert_eq!(report.report, "March was strong.");

        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, SALES_REPORT_PROMPT);
        assert_eq!(calls[0].1["startDate"], "2024-03-01");
        assert_eq!(calls[0].1["endDate"], "2024-03-31");
        assert!(calls[0].1["salesData"].is_string());
    }

    #[tokio::test]
    async fn test_missing_report_field() {
        let generator = RecordingGenerator::new(json!({"text": "oops"}));
        let input =
            SalesReportInput::from_snapshot(&snapshot(), date(2024, 3, 1), date(2024, 3, 31))
                .expect("input");
        let err = generate_sales_report(&generator, &input)
            .await
            .expect_err("should fail");
        assert!(matches!(err, GenerateError::MalformedOutput(_)));
    }
}
