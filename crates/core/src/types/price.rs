//! Type-safe price representation using decimal arithmetic.
//!
//! Order totals are persisted as display strings (`"GH₵65.00"`), so `Price`
//! knows how to render and read that format back.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when reading a formatted price string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceParseError {
    /// The string does not start with a known currency symbol.
    #[error("unknown currency symbol in {0:?}")]
    UnknownCurrency(String),
    /// The amount after the symbol is not a decimal number.
    #[error("invalid amount in {0:?}")]
    InvalidAmount(String),
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., cedis, not pesewas).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a cedi price.
    #[must_use]
    pub const fn cedis(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::GHS)
    }

    /// Format for display with two decimal places (e.g., "GH₵65.00").
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "{}{:.2}",
            self.currency_code.symbol(),
            self.amount.round_dp(2)
        )
    }

    /// Parse a display string produced by [`Price::display`].
    ///
    /// Thousands separators are tolerated since older totals were typed by hand.
    ///
    /// # Errors
    ///
    /// Returns `PriceParseError` if the symbol is unknown or the amount is not a number.
    pub fn parse_display(s: &str) -> Result<Self, PriceParseError> {
        let trimmed = s.trim();
        let (currency_code, rest) = CurrencyCode::ALL
            .iter()
            .find_map(|code| {
                trimmed
                    .strip_prefix(code.symbol())
                    .map(|rest| (*code, rest))
            })
            .ok_or_else(|| PriceParseError::UnknownCurrency(s.to_string()))?;

        let digits: String = rest.chars().filter(|c| *c != ',').collect();
        let amount = Decimal::from_str(digits.trim())
            .map_err(|_| PriceParseError::InvalidAmount(s.to_string()))?;

        Ok(Self::new(amount, currency_code))
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    /// Ghana cedi.
    #[default]
    GHS,
    USD,
}

impl CurrencyCode {
    /// Every supported code, ordered so longer symbols are tried first.
    pub const ALL: [Self; 2] = [Self::GHS, Self::USD];

    /// The symbol prefixed to displayed amounts.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::GHS => "GH₵",
            Self::USD => "$",
        }
    }
}
