//! Per-user notification feed.

use clap::Subcommand;

use bakesnplates_admin::services::NotificationFeed;
use bakesnplates_core::UserId;

use super::Context;

#[derive(Subcommand)]
pub enum NotificationAction {
    /// Show a user's notifications, newest first
    List {
        #[arg(long)]
        user: String,
    },
    /// Mark all of a user's notifications as read
    ReadAll {
        #[arg(long)]
        user: String,
    },
}

/// # Errors
///
/// Returns an error if the store cannot be read or updated.
pub async fn run(
    ctx: &Context,
    action: NotificationAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = ctx.data.document_store();
    match action {
        NotificationAction::List { user } => {
            let feed = NotificationFeed::new(store, Some(UserId::new(user)));
            let notifications = feed.fetch().await?;
            println!("{} unread", feed.unread_count().await);
            for notification in &notifications {
                println!(
                    "{} {}  {}: {}",
                    if notification.read { " " } else { "*" },
                    notification.date.format("%Y-%m-%d %H:%M"),
                    notification.title,
                    notification.description,
                );
            }
        }
        NotificationAction::ReadAll { user } => {
            let feed = NotificationFeed::new(store, Some(UserId::new(user)));
            feed.fetch().await?;
            let marked = feed.mark_all_as_read().await?;
            println!("Marked {marked} notifications as read");
        }
    }
    Ok(())
}
