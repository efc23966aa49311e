//! Customer orders.
//!
//! Orders are append-only apart from their status. The customer name is a
//! snapshot taken at creation time; `customer_id` links back to the customer
//! record when one is known.

use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bakesnplates_core::{CurrencyCode, CustomerId, OrderId, OrderStatus, Price};

use super::{Entity, ValidationError, require_text};
use crate::db::{Fields, SortSpec, StoreError, encode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Customer name as it was when the order was placed.
    pub customer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
    /// Free-text description, e.g. `"Bento Cake (x1), Sobolo Juice (x2)"`.
    pub product: String,
    pub date: DateTime<Utc>,
    /// Formatted total, e.g. `"GH₵65.00"`.
    pub total: String,
    pub status: OrderStatus,
}

impl Order {
    /// Parse the formatted total.
    ///
    /// Returns `None` for totals that are not a recognizable amount.
    #[must_use]
    pub fn total_amount(&self) -> Option<Price> {
        Price::parse_display(&self.total).ok()
    }

    /// The total as a cedi amount.
    ///
    /// Returns `None` for unreadable totals and for totals in another currency.
    #[must_use]
    pub fn cedi_total(&self) -> Option<Decimal> {
        self.total_amount()
            .filter(|price| price.currency_code == CurrencyCode::GHS)
            .map(|price| price.amount)
    }
}

impl Entity for Order {
    const COLLECTION: &'static str = "orders";
    const SORT: SortSpec = SortSpec::desc("date");
}

/// Input for placing an order. The creation date is stamped on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub customer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
    pub product: String,
    pub total: String,
    #[serde(default)]
    pub status: OrderStatus,
}

impl NewOrder {
    #[must_use]
    pub fn new(
        customer: impl Into<String>,
        product: impl Into<String>,
        total: impl Into<String>,
        status: OrderStatus,
    ) -> Self {
        Self {
            customer: customer.into(),
            customer_id: None,
            product: product.into(),
            total: total.into(),
            status,
        }
    }

    /// Link the order to a customer record.
    #[must_use]
    pub fn for_customer(mut self, id: CustomerId) -> Self {
        self.customer_id = Some(id);
        self
    }

    /// # Errors
    ///
    /// Returns `ValidationError` when the customer or product is empty, or
    /// the total is not a non-negative amount.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("customer", &self.customer)?;
        require_text("product", &self.product)?;
        let total = Price::parse_display(&self.total)
            .map_err(|e| ValidationError::new("total", e.to_string()))?;
        if total.amount.is_sign_negative() && !total.amount.is_zero() {
            return Err(ValidationError::new("total", "must not be negative"));
        }
        Ok(())
    }

    /// Stored fields for this order placed at `date`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the input does not encode to a field map.
    pub fn to_fields(&self, date: DateTime<Utc>) -> Result<Fields, StoreError> {
        let mut fields = encode(self)?;
        fields.insert(
            "date".to_string(),
            serde_json::to_value(date.trunc_subsecs(0))?,
        );
        Ok(fields)
    }

    /// Stamp the creation date (whole seconds) and attach the assigned id.
    #[must_use]
    pub fn into_order(self, id: OrderId, date: DateTime<Utc>) -> Order {
        Order {
            id,
            customer: self.customer,
            customer_id: self.customer_id,
            product: self.product,
            date: date.trunc_subsecs(0),
            total: self.total,
            status: self.status,
        }
    }
}

/// Current time at seconds resolution.
#[must_use]
pub fn order_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}
