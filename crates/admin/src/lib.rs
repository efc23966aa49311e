//! Bakes n Plates dashboard library.
//!
//! Keeps a local, consistent view of the bakery's products, customers,
//! orders, inventory and expenses on top of a remote document store, seeds a
//! fresh store with starter data, and produces AI sales reports and analytics
//! summaries through Claude.
//!
//! # Layers
//!
//! - [`db`] - document store contract and backends (in-memory, `PostgreSQL`, timeout)
//! - [`models`] - stored entities and their creation inputs
//! - [`services`] - cached business data, seeding, notifications, POS, dashboard
//! - [`claude`] / [`ai`] - Claude client and report generation
//! - [`config`] / [`error`] - environment configuration and the aggregate error

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod ai;
pub mod claude;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use config::DashboardConfig;
pub use error::AppError;
