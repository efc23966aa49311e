//! Expense records.

use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use rust_decimal::Decimal;

use bakesnplates_admin::models::NewExpense;
use bakesnplates_core::ExpenseId;

use super::{CommandError, Context};

#[derive(Subcommand)]
pub enum ExpenseAction {
    /// List expenses, newest first
    List,
    /// Record an expense
    Add {
        #[arg(long)]
        name: String,
        /// Cost in cedis
        #[arg(long)]
        cost: Decimal,
        /// Day of the expense (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Replace an expense
    Update {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        cost: Decimal,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Remove an expense
    Delete { id: String },
}

fn expense(name: String, cost: Decimal, date: Option<NaiveDate>) -> NewExpense {
    let date = date
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map_or_else(Utc::now, |at| at.and_utc());
    NewExpense::new(name, cost, date)
}

/// # Errors
///
/// Returns an error if validation or the store operation fails.
pub async fn run(ctx: &Context, action: ExpenseAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ExpenseAction::List => {
            for expense in &ctx.load().await?.expenses {
                println!(
                    "{}  {}  {:<24} {:>12}",
                    expense.id,
                    expense.date.format("%Y-%m-%d"),
                    expense.name,
                    expense.cost_price(),
                );
            }
        }
        ExpenseAction::Add { name, cost, date } => {
            ctx.load().await?;
            let expense = ctx.data.add_expense(expense(name, cost, date)).await?;
            println!("Recorded {} ({})", expense.name, expense.cost_price());
        }
        ExpenseAction::Update {
            id,
            name,
            cost,
            date,
        } => {
            ctx.load().await?;
            let expense = ctx
                .data
                .update_expense(&ExpenseId::new(id), expense(name, cost, date))
                .await?;
            println!("Updated {} ({})", expense.name, expense.cost_price());
        }
        ExpenseAction::Delete { id } => {
            ctx.load().await?;
            if !ctx.data.delete_expense(&ExpenseId::new(id.clone())).await? {
                return Err(CommandError::NotFound {
                    kind: "expense",
                    query: id,
                }
                .into());
            }
            println!("Deleted expense {id}");
        }
    }
    Ok(())
}
