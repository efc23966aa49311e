//! Per-user notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bakesnplates_core::{NotificationId, UserId};

use super::Entity;
use crate::db::SortSpec;

/// Field holding the owning user in stored notifications.
pub const USER_FIELD: &str = "userId";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub read: bool,
}

impl Entity for Notification {
    const COLLECTION: &'static str = "notifications";
    const SORT: SortSpec = SortSpec::desc("date");
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub read: bool,
}
