//! Bakes n Plates Core - Shared domain types.
//!
//! This crate provides the vocabulary shared by every Bakes n Plates component:
//! - `admin` - Business data synchronization, seeding, and AI reports
//! - `cli` - Command-line host for data entry, seeding, and reports
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Typed document IDs, cedi prices, and order/inventory statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
