//! Products sold over the counter and by order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bakesnplates_core::{Price, ProductId};

use super::{Entity, ValidationError, require_non_negative, require_text};
use crate::db::SortSpec;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price in cedis, stored as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl Product {
    /// Unit price as a cedi amount.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::cedis(self.price)
    }
}

impl Entity for Product {
    const COLLECTION: &'static str = "products";
    const SORT: SortSpec = SortSpec::asc("name");
}

/// Input for creating or replacing a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl NewProduct {
    /// Create a product input.
    #[must_use]
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }

    /// Check the input before it is written.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for an empty name or a negative price.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_non_negative("price", self.price)
    }

    /// Attach a store-assigned id.
    #[must_use]
    pub fn with_id(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::db::encode;

    #[test]
    fn test_validate_rejects_negative_price() {
        let input = NewProduct::new("Sausage Roll", Decimal::new(-1, 0));
        let err = input.validate().expect_err("should fail");
        assert_eq!(err.field, "price");
    }

    #[test]
    fn test_validate_accepts_free_item() {
        assert!(NewProduct::new("Sample", Decimal::ZERO).validate().is_ok());
        assert!(NewProduct::new("  ", Decimal::ONE).validate().is_err());
    }

    #[test]
    fn test_unit_price_display() {
        let product = NewProduct::new("Bento Cake", Decimal::new(150, 0)).with_id("p1".into());
        assert_eq!(product.unit_price().display(), "GH₵150.00");
    }

    #[test]
    fn test_price_is_stored_as_number() {
        let fields = encode(&NewProduct::new("Bento Cake", Decimal::new(15050, 2))).expect("encode");
        assert_eq!(fields["price"], json!(150.5));

        let stored: Product =
            serde_json::from_value(json!({"id": "p1", "name": "Bento Cake", "price": 150}))
                .expect("decode");
        assert_eq!(stored.price, Decimal::new(150, 0));
    }
}
