//! Business expenses.

use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bakesnplates_core::{ExpenseId, Price};

use super::{Entity, ValidationError, require_non_negative, require_text};
use crate::db::SortSpec;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub name: String,
    /// Amount in cedis, stored as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub cost: Decimal,
    pub date: DateTime<Utc>,
}

impl Expense {
    #[must_use]
    pub const fn cost_price(&self) -> Price {
        Price::cedis(self.cost)
    }
}

impl Entity for Expense {
    const COLLECTION: &'static str = "expenses";
    const SORT: SortSpec = SortSpec::desc("date");
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpense {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub cost: Decimal,
    pub date: DateTime<Utc>,
}

impl NewExpense {
    /// Create an expense input. The date is kept at whole seconds.
    #[must_use]
    pub fn new(name: impl Into<String>, cost: Decimal, date: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            cost,
            date: date.trunc_subsecs(0),
        }
    }

    /// # Errors
    ///
    /// Returns `ValidationError` for an empty name or a negative cost.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_non_negative("cost", self.cost)
    }

    #[must_use]
    pub fn with_id(self, id: ExpenseId) -> Expense {
        Expense {
            id,
            name: self.name,
            cost: self.cost,
            date: self.date,
        }
    }
}
