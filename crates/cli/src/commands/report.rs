//! AI sales reports and analytics summaries.

use chrono::{Datelike, NaiveDate, Utc};
use clap::Args;

use bakesnplates_admin::ai::{
    SalesReportInput, compute_analytics, generate_analytics_summary, generate_sales_report,
};

use super::Context;

#[derive(Args)]
pub struct ReportArgs {
    /// First day of the range (defaults to the first of this month)
    #[arg(long)]
    start: Option<NaiveDate>,
    /// Last day of the range, inclusive (defaults to today)
    #[arg(long)]
    end: Option<NaiveDate>,
}

/// Generate and print a sales report for the requested range.
///
/// # Errors
///
/// Returns an error if Claude is not configured, the range is reversed,
/// or generation fails.
pub async fn sales(ctx: &Context, args: ReportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let generator = ctx.generator()?;
    let today = Utc::now().date_naive();
    let end = args.end.unwrap_or(today);
    let start = args.start.unwrap_or_else(|| end.with_day(1).unwrap_or(end));

    let snapshot = ctx.load().await?;
    let input = SalesReportInput::from_snapshot(&snapshot, start, end)?;
    let report = generate_sales_report(&generator, &input).await?;

    println!("Sales report {start} to {end}");
    println!();
    println!("{}", report.report);
    Ok(())
}

/// Compute the analytics figures, ask for a summary and print both.
///
/// # Errors
///
/// Returns an error if Claude is not configured or generation fails.
pub async fn analytics(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let generator = ctx.generator()?;
    let snapshot = ctx.load().await?;
    let figures = compute_analytics(&snapshot, Utc::now().date_naive());
    let result = generate_analytics_summary(&generator, figures).await?;

    println!("{}", serde_json::to_string_pretty(&result.analytics)?);
    println!();
    println!("{}", result.summary);
    Ok(())
}
