//! Newtype IDs for type-safe document references.
//!
//! Every entity lives in a document collection whose store assigns an opaque
//! string identifier at creation time. Use the `define_id!` macro to create
//! type-safe wrappers so a product ID can never be passed where an order ID
//! is expected.

use serde::{Deserialize, Serialize};

/// An opaque, store-assigned document identifier.
///
/// This is the untyped form returned by the document store; entity code
/// converts it into one of the typed IDs below.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a document ID from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the store handed back an empty identifier.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `as_document_id()`
/// - `From<DocumentId>`, `From<&str>` and `From<String>` implementations
///
/// # Example
///
/// ```rust
/// # use bakesnplates_core::define_id;
/// define_id!(TrayId);
/// define_id!(OvenId);
///
/// let tray = TrayId::new("a1");
/// let oven = OvenId::new("a1");
///
/// // These are different types, so this won't compile:
/// // let _: TrayId = oven;
/// assert_eq!(tray.as_str(), oven.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Convert back into the untyped store identifier.
            #[must_use]
            pub fn as_document_id(&self) -> $crate::DocumentId {
                $crate::DocumentId::new(self.0.clone())
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$crate::DocumentId> for $name {
            fn from(id: $crate::DocumentId) -> Self {
                Self(id.as_str().to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId);
define_id!(CustomerId);
define_id!(OrderId);
define_id!(InventoryItemId);
define_id!(ExpenseId);
define_id!(NotificationId);
define_id!(UserId);
