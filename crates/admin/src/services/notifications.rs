//! Per-user notification feed.
//!
//! Same shape as the business data cache, scoped to one collection and one
//! predicate (`userId == current user`). A user with no notifications gets
//! three starter notifications on first fetch.

use std::sync::Arc;

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};

use bakesnplates_core::UserId;

use super::DataError;
use crate::db::{Document, DocumentStore, FieldFilter, Fields, ListQuery, StoreError, encode};
use crate::models::notification::USER_FIELD;
use crate::models::{Entity, NewNotification, Notification};

/// Notification feed for the signed-in user.
pub struct NotificationFeed {
    store: Arc<dyn DocumentStore>,
    user: Option<UserId>,
    cache: RwLock<Vec<Notification>>,
}

impl NotificationFeed {
    /// Create a feed for `user`, or an always-empty feed when nobody is signed in.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, user: Option<UserId>) -> Self {
        Self {
            store,
            user,
            cache: RwLock::new(Vec::new()),
        }
    }

    /// The user this feed belongs to.
    #[must_use]
    pub const fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    fn user_filter(user: &UserId) -> FieldFilter {
        FieldFilter::eq(USER_FIELD, user.as_str())
    }

    /// Fetch the user's notifications, newest first, seeding them on first use.
    ///
    /// A failed seed is logged and retried on the next fetch.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Store` if the listing failed; the cache is kept.
    #[instrument(skip(self), fields(user = ?self.user))]
    pub async fn fetch(&self) -> Result<Vec<Notification>, DataError> {
        let Some(user) = &self.user else {
            self.cache.write().await.clear();
            return Ok(Vec::new());
        };
        let filter = Self::user_filter(user);

        match self
            .store
            .is_empty(Notification::COLLECTION, Some(&filter))
            .await
        {
            Ok(true) => {
                if let Err(e) = self.seed(user).await {
                    warn!(error = %e, "Seeding notifications failed, will retry on next fetch");
                }
            }
            Ok(false) => {}
            Err(e) => warn!(error = %e, "Could not check for existing notifications"),
        }

        let query = ListQuery::all(Notification::COLLECTION)
            .filter(filter)
            .sort(Notification::SORT);
        let notifications = self
            .list(&query)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to fetch notifications"))?;

        (*self.cache.write().await).clone_from(&notifications);
        Ok(notifications)
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<Notification>, StoreError> {
        self.store
            .list(query)
            .await?
            .into_iter()
            .map(Document::decode)
            .collect()
    }

    async fn seed(&self, user: &UserId) -> Result<(), StoreError> {
        let rows = starter_notifications(user, Utc::now())
            .iter()
            .map(encode)
            .collect::<Result<Vec<Fields>, _>>()?;
        self.store
            .insert_many(Notification::COLLECTION, rows)
            .await?;
        info!(%user, "Seeded starter notifications");
        Ok(())
    }

    /// Mark every unread notification of the user as read.
    ///
    /// Returns how many notifications were marked.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Store` if the listing or any update failed. The
    /// cache is left untouched in that case; updates issued before the
    /// failure stay applied remotely.
    #[instrument(skip(self), fields(user = ?self.user))]
    pub async fn mark_all_as_read(&self) -> Result<usize, DataError> {
        let Some(user) = &self.user else {
            return Ok(0);
        };

        let unread_filter = FieldFilter::eq("read", false);
        let query = ListQuery::all(Notification::COLLECTION).filter(Self::user_filter(user));
        let unread: Vec<Document> = self
            .store
            .list(&query)
            .await?
            .into_iter()
            .filter(|doc| unread_filter.matches(&doc.fields))
            .collect();

        for doc in &unread {
            let mut fields = Fields::new();
            fields.insert("read".to_string(), Value::Bool(true));
            self.store
                .update_fields(Notification::COLLECTION, &doc.id, fields)
                .await
                .inspect_err(|e| error!(id = %doc.id, error = %e, "Failed to mark notification read"))?;
        }

        for notification in self.cache.write().await.iter_mut() {
            notification.read = true;
        }
        info!(count = unread.len(), "Marked notifications as read");
        Ok(unread.len())
    }

    /// Cached notifications, newest first.
    pub async fn notifications(&self) -> Vec<Notification> {
        self.cache.read().await.clone()
    }

    /// Number of cached notifications not yet read.
    pub async fn unread_count(&self) -> usize {
        self.cache.read().await.iter().filter(|n| !n.read).count()
    }
}

/// Starter notifications for a new user, dated relative to `now`.
#[must_use]
pub fn starter_notifications(user: &UserId, now: DateTime<Utc>) -> Vec<NewNotification> {
    let now = now.trunc_subsecs(0);
    let entry = |title: &str, description: &str, age: TimeDelta, read: bool| NewNotification {
        user_id: user.clone(),
        title: title.to_string(),
        description: description.to_string(),
        date: now - age,
        read,
    };
    vec![
        entry(
            "Low Stock Alert",
            "Butter is running low. Only 5 kg remaining.",
            TimeDelta::days(1),
            false,
        ),
        entry(
            "New Order Received",
            "Kofi Mensah placed a new order for Doughnuts (6).",
            TimeDelta::minutes(30),
            false,
        ),
        entry(
            "Order Completed",
            "Order for Ama Serwaa (Bento Cake) has been marked as completed.",
            TimeDelta::days(2),
            true,
        ),
    ]
}
