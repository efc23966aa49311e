//! Status enums for orders and inventory.
//!
//! Both serialize to the human-readable labels already stored in existing
//! documents (`"In Progress"`, `"Low Stock"`, ...).

use serde::{Deserialize, Serialize};

/// Order workflow status.
///
/// Transitions are unconstrained: any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// All statuses in workflow order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    /// The stored label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Operator-declared stock level of an inventory item.
///
/// Not derived from the free-text stock and reorder quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InventoryStatus {
    #[default]
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl InventoryStatus {
    /// The stored label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::InStock => "In Stock",
            Self::LowStock => "Low Stock",
            Self::OutOfStock => "Out of Stock",
        }
    }

    /// Low or out of stock.
    #[must_use]
    pub const fn needs_reorder(&self) -> bool {
        matches!(self, Self::LowStock | Self::OutOfStock)
    }
}

impl std::fmt::Display for InventoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for InventoryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "in stock" => Ok(Self::InStock),
            "low stock" => Ok(Self::LowStock),
            "out of stock" => Ok(Self::OutOfStock),
            _ => Err(format!("invalid inventory status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_serializes_to_label() {
        let json = serde_json::to_string(&OrderStatus::InProgress).expect("serialize");
        assert_eq!(json, "\"In Progress\"");

        let status: OrderStatus = serde_json::from_str("\"Cancelled\"").expect("deserialize");
        assert_eq!(status, OrderStatus::Cancelled);
    }

    #[test]
    fn test_order_status_from_str() {
        assert_eq!("in_progress".parse::<OrderStatus>(), Ok(OrderStatus::InProgress));
        assert_eq!("Completed".parse::<OrderStatus>(), Ok(OrderStatus::Completed));
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_order_status_labels_round_trip_through_from_str() {
        for status in OrderStatus::ALL {
            assert_eq!(status.label().parse::<OrderStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_inventory_status_serialization() {
        let json = serde_json::to_string(&InventoryStatus::OutOfStock).expect("serialize");
        assert_eq!(json, "\"Out of Stock\"");
        assert!(InventoryStatus::LowStock.needs_reorder());
        assert!(!InventoryStatus::InStock.needs_reorder());
    }
}
