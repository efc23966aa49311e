//! Business analytics and their AI summary.

use std::collections::HashMap;

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument};

use bakesnplates_core::OrderStatus;

use super::{GenerateError, TextGenerator, output_text};
use crate::models::{Order, Product};
use crate::services::BusinessSnapshot;

/// Prompt name of the analytics summary.
pub const ANALYTICS_SUMMARY_PROMPT: &str = "analyticsSummaryPrompt";

const CHART_MONTHS: u32 = 6;
const CHART_TOP: usize = 5;

/// Headline figures plus chart series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expenses: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub net_profit: Decimal,
    pub charts: AnalyticsCharts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsCharts {
    /// Oldest month first.
    pub monthly_revenue: Vec<MonthlyRevenue>,
    /// Highest revenue first.
    pub top_products: Vec<ProductRevenue>,
    /// Highest cost first.
    pub expense_breakdown: Vec<ExpenseShare>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    /// Short month name, e.g. `"Mar"`.
    pub month: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRevenue {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseShare {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub cost: Decimal,
}

/// Split an order's product line into `(name, quantity)` pairs.
///
/// `"Bento Cake (x1), Sobolo Juice (x2)"` gives two lines; a line without a
/// `(xN)` suffix counts once.
fn line_items(description: &str) -> Vec<(&str, u32)> {
    description
        .split(", ")
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.strip_suffix(')')
                .and_then(|rest| rest.rsplit_once(" (x"))
                .and_then(|(name, qty)| qty.parse::<u32>().ok().map(|qty| (name, qty)))
                .unwrap_or((line, 1))
        })
        .collect()
}

/// Revenue per product for one completed order.
///
/// A single-line order credits its whole total to that product. Lines of a
/// multi-line order are priced from the catalog; unknown lines are skipped.
fn attribute_order(order: &Order, total: Decimal, catalog: &[Product]) -> Vec<(String, Decimal)> {
    let items = line_items(&order.product);
    if let [(name, _)] = items.as_slice() {
        return vec![((*name).to_string(), total)];
    }
    items
        .into_iter()
        .filter_map(|(name, qty)| {
            catalog
                .iter()
                .find(|product| product.name == name)
                .map(|product| (name.to_string(), product.price * Decimal::from(qty)))
        })
        .collect()
}

/// Sort `(name, amount)` pairs by amount descending (ties by name) and keep the top entries.
fn top_entries(totals: HashMap<String, Decimal>) -> Vec<(String, Decimal)> {
    let mut entries: Vec<_> = totals.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(CHART_TOP);
    entries
}

/// Compute analytics from completed orders and recorded expenses.
///
/// Only cedi order totals count towards revenue.
/// Monthly revenue covers the six calendar months ending with `today`'s
/// month, including months without sales.
#[must_use]
pub fn compute_analytics(snapshot: &BusinessSnapshot, today: NaiveDate) -> Analytics {
    let completed: Vec<(&Order, Decimal)> = snapshot
        .orders
        .iter()
        .filter(|order| order.status == OrderStatus::Completed)
        .filter_map(|order| order.cedi_total().map(|amount| (order, amount)))
        .collect();

    let total_revenue: Decimal = completed.iter().map(|(_, amount)| *amount).sum();
    let total_expenses: Decimal = snapshot.expenses.iter().map(|e| e.cost).sum();

    let current_month = today.with_day(1).unwrap_or(today);
    let monthly_revenue = (0..CHART_MONTHS)
        .rev()
        .filter_map(|back| current_month.checked_sub_months(Months::new(back)))
        .map(|month_start| {
            let revenue = completed
                .iter()
                .filter(|(order, _)| {
                    let date = order.date.date_naive();
                    date.year() == month_start.year() && date.month() == month_start.month()
                })
                .map(|(_, amount)| *amount)
                .sum();
            MonthlyRevenue {
                month: month_start.format("%b").to_string(),
                revenue,
            }
        })
        .collect();

    let mut by_product: HashMap<String, Decimal> = HashMap::new();
    for (order, amount) in &completed {
        for (name, revenue) in attribute_order(order, *amount, &snapshot.products) {
            *by_product.entry(name).or_default() += revenue;
        }
    }

    let mut by_expense: HashMap<String, Decimal> = HashMap::new();
    for expense in &snapshot.expenses {
        *by_expense.entry(expense.name.clone()).or_default() += expense.cost;
    }

    Analytics {
        total_revenue,
        total_expenses,
        net_profit: total_revenue - total_expenses,
        charts: AnalyticsCharts {
            monthly_revenue,
            top_products: top_entries(by_product)
                .into_iter()
                .map(|(name, revenue)| ProductRevenue { name, revenue })
                .collect(),
            expense_breakdown: top_entries(by_expense)
                .into_iter()
                .map(|(name, cost)| ExpenseShare { name, cost })
                .collect(),
        },
    }
}

/// Output of the analytics flow: the model's summary plus the figures it saw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub summary: String,
    pub analytics: Analytics,
}

/// Ask the generator to summarize `analytics`.
///
/// # Errors
///
/// Returns any `GenerateError` from the generator, or `MalformedOutput` if
/// the output lacks a `summary` string.
#[instrument(skip(generator, analytics))]
pub async fn generate_analytics_summary(
    generator: &dyn TextGenerator,
    analytics: Analytics,
) -> Result<AnalyticsSummary, GenerateError> {
    let input = json!({ "analytics": analytics });
    let output = generator.generate(ANALYTICS_SUMMARY_PROMPT, input).await?;
    let summary = output_text(&output, "summary")?;
    info!(chars = summary.len(), "Analytics summary generated");
    Ok(AnalyticsSummary { summary, analytics })
}
