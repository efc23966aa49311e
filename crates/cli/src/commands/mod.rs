//! CLI command implementations.
//!
//! Every command except `migrate` works on a [`Context`] holding the loaded
//! configuration and a [`BusinessDataStore`] over the configured backend.

#![allow(clippy::print_stdout)]

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use bakesnplates_admin::DashboardConfig;
use bakesnplates_admin::ai::ClaudeGenerator;
use bakesnplates_admin::claude::{ClaudeClient, ClaudeError};
use bakesnplates_admin::db::{
    self, DocumentStore, InMemoryDocumentStore, PgDocumentStore, TimeoutStore,
};
use bakesnplates_admin::services::{
    BusinessDataStore, BusinessSnapshot, DataError, SyncOptions,
};

pub mod customers;
pub mod dashboard;
pub mod expenses;
pub mod inventory;
pub mod migrate;
pub mod notifications;
pub mod orders;
pub mod pos;
pub mod products;
pub mod report;
pub mod seed;

pub use customers::CustomerAction;
pub use expenses::ExpenseAction;
pub use inventory::InventoryAction;
pub use notifications::NotificationAction;
pub use orders::OrderAction;
pub use pos::PosArgs;
pub use products::ProductAction;
pub use report::ReportArgs;

/// Errors raised by the commands themselves rather than the library.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("DATABASE_URL must be set to run migrations")]
    NoDatabase,
    #[error("CLAUDE_API_KEY must be set to generate reports")]
    NoClaude,
    #[error("no {kind} matches {query:?}")]
    NotFound { kind: &'static str, query: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Claude(#[from] ClaudeError),
}

/// Shared state for a single command run.
pub struct Context {
    pub config: DashboardConfig,
    pub data: BusinessDataStore,
}

impl Context {
    /// Build the document store from configuration.
    ///
    /// Uses `PostgreSQL` behind a timeout when `DATABASE_URL` is set, an
    /// empty in-memory store otherwise.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the database cannot be reached.
    pub async fn connect(config: DashboardConfig) -> Result<Self, sqlx::Error> {
        let store: Arc<dyn DocumentStore> = match &config.database_url {
            Some(url) => {
                info!("Connecting to database...");
                let pool = db::create_pool(url, config.store_timeout).await?;
                let postgres: Arc<dyn DocumentStore> = Arc::new(PgDocumentStore::new(pool));
                Arc::new(TimeoutStore::new(postgres, config.store_timeout))
            }
            None => {
                warn!("DATABASE_URL not set, using a temporary in-memory store");
                Arc::new(InMemoryDocumentStore::new())
            }
        };

        let data = BusinessDataStore::new(
            store,
            SyncOptions {
                seed_propagation_delay: config.seed_propagation_delay,
            },
        );
        Ok(Self { config, data })
    }

    /// Run a sync cycle and return the fresh snapshot.
    ///
    /// # Errors
    ///
    /// Returns `DataError` if the collections could not be fetched.
    pub async fn load(&self) -> Result<BusinessSnapshot, DataError> {
        self.data.load().await?;
        Ok(self.data.snapshot().await)
    }

    /// Claude-backed generator from configuration.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::NoClaude` when no API key is configured.
    pub fn generator(&self) -> Result<ClaudeGenerator, CommandError> {
        let config = self.config.claude().ok_or(CommandError::NoClaude)?;
        Ok(ClaudeGenerator::new(ClaudeClient::new(config)?))
    }
}

/// Find the single entry whose name matches `query`, ignoring case.
///
/// An exact match wins; otherwise a unique substring match is accepted.
pub fn find_by_name<'a, T>(
    items: &'a [T],
    name: impl Fn(&T) -> &str,
    kind: &'static str,
    query: &str,
) -> Result<&'a T, CommandError> {
    let needle = query.trim().to_lowercase();
    if let Some(exact) = items.iter().find(|item| name(item).to_lowercase() == needle) {
        return Ok(exact);
    }

    let mut partial = items
        .iter()
        .filter(|item| name(item).to_lowercase().contains(&needle));
    match (partial.next(), partial.next()) {
        (Some(found), None) => Ok(found),
        (Some(_), Some(_)) => Err(CommandError::InvalidArgument(format!(
            "{query:?} matches more than one {kind}"
        ))),
        _ => Err(CommandError::NotFound {
            kind,
            query: query.to_string(),
        }),
    }
}
