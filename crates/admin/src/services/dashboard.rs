//! Headline figures for the dashboard overview.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use bakesnplates_core::{OrderStatus, Price};

use super::BusinessSnapshot;
use crate::models::Order;

const RECENT_ORDERS: usize = 5;

/// Overview computed from a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    /// Sum of completed order totals.
    pub revenue: Price,
    pub pending_orders: usize,
    pub customers: usize,
    /// Inventory items marked low or out of stock.
    pub low_stock_items: usize,
    /// Newest orders first.
    pub recent_orders: Vec<Order>,
}

impl DashboardSummary {
    /// Summarize a snapshot.
    ///
    /// Revenue is in cedis. Completed orders whose total is unreadable or in
    /// another currency are left out of it.
    #[must_use]
    pub fn from_snapshot(snapshot: &BusinessSnapshot) -> Self {
        let revenue = snapshot
            .orders
            .iter()
            .filter(|order| order.status == OrderStatus::Completed)
            .filter_map(|order| {
                let amount = order.cedi_total();
                if amount.is_none() {
                    warn!(id = %order.id, total = %order.total, "Skipping order total not in cedis");
                }
                amount
            })
            .sum::<Decimal>();

        Self {
            revenue: Price::cedis(revenue),
            pending_orders: snapshot
                .orders
                .iter()
                .filter(|order| order.status == OrderStatus::Pending)
                .count(),
            customers: snapshot.customers.len(),
            low_stock_items: snapshot
                .inventory
                .iter()
                .filter(|item| item.status.needs_reorder())
                .count(),
            recent_orders: snapshot.orders.iter().take(RECENT_ORDERS).cloned().collect(),
        }
    }
}
