//! Ingredient and packaging stock.

use serde::{Deserialize, Serialize};

use bakesnplates_core::{InventoryItemId, InventoryStatus};

use super::{Entity, ValidationError, require_text};
use crate::db::SortSpec;

/// A stocked item. Quantities are free text with their unit (`"50 kg"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: InventoryItemId,
    pub name: String,
    pub stock: String,
    pub reorder: String,
    /// Declared by the operator, never derived from `stock`.
    pub status: InventoryStatus,
}

impl Entity for InventoryItem {
    const COLLECTION: &'static str = "inventory";
    const SORT: SortSpec = SortSpec::asc("name");
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInventoryItem {
    pub name: String,
    pub stock: String,
    pub reorder: String,
    #[serde(default)]
    pub status: InventoryStatus,
}

impl NewInventoryItem {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        stock: impl Into<String>,
        reorder: impl Into<String>,
        status: InventoryStatus,
    ) -> Self {
        Self {
            name: name.into(),
            stock: stock.into(),
            reorder: reorder.into(),
            status,
        }
    }

    /// # Errors
    ///
    /// Returns `ValidationError` for an empty name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)
    }

    #[must_use]
    pub fn with_id(self, id: InventoryItemId) -> InventoryItem {
        InventoryItem {
            id,
            name: self.name,
            stock: self.stock,
            reorder: self.reorder,
            status: self.status,
        }
    }
}
