//! Integration tests for an unreachable or misbehaving remote store.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rust_decimal::Decimal;

use bakesnplates_admin::db::{DocumentStore, StoreError, TimeoutStore};
use bakesnplates_admin::models::{NewExpense, NewOrder, NewProduct};
use bakesnplates_admin::services::{DataError, NotificationFeed};
use bakesnplates_core::{OrderId, OrderStatus, UserId};
use bakesnplates_integration_tests::{FlakyStore, data_store};

fn is_unreachable(err: &DataError) -> bool {
    matches!(err, DataError::Store(e) if e.is_unreachable())
}

#[tokio::test]
async fn test_failed_load_keeps_cached_data() {
    let flaky = FlakyStore::new();
    let data = data_store(Arc::new(flaky.clone()));
    data.load().await.expect("initial load");
    let cached = data.snapshot().await;

    flaky.fail_reads(true);
    let err = data.load().await.expect_err("load should fail");
    assert!(is_unreachable(&err));
    assert_eq!(data.snapshot().await, cached);
    assert!(!data.is_loading());
}

#[tokio::test]
async fn test_failed_seed_is_retried_by_next_load() {
    let flaky = FlakyStore::new();
    let data = data_store(Arc::new(flaky.clone()));

    flaky.fail_writes(true);
    let report = data.ensure_seeded().await;
    assert!(!report.is_complete());
    assert_eq!(report.failed.len(), 4);
    assert_eq!(flaky.inner().count("products").await, 0);

    // Reads still work, so the load itself succeeds with empty collections
    data.load().await.expect("load");
    assert!(data.products().await.is_empty());

    flaky.fail_writes(false);
    data.load().await.expect("retry load");
    let snapshot = data.snapshot().await;
    assert_eq!(snapshot.products.len(), 18);
    assert_eq!(snapshot.customers.len(), 3);
    assert_eq!(snapshot.orders.len(), 3);
    assert_eq!(snapshot.inventory.len(), 6);
}

#[tokio::test]
async fn test_seed_cut_off_midway_leaves_nothing_behind() {
    let flaky = FlakyStore::new();
    let data = data_store(Arc::new(flaky.clone()));

    // Room for a few rows, but not for the whole product menu
    flaky.limit_inserted_rows(Some(4));
    data.load().await.expect("load");
    assert_eq!(flaky.inner().count("products").await, 0);
    assert!(data.products().await.is_empty());
    assert_eq!(data.customers().await.len(), 3);

    flaky.limit_inserted_rows(None);
    data.load().await.expect("retry load");
    let snapshot = data.snapshot().await;
    assert_eq!(snapshot.products.len(), 18);
    assert_eq!(snapshot.customers.len(), 3);
    assert_eq!(snapshot.orders.len(), 3);
    assert_eq!(snapshot.inventory.len(), 6);
}

#[tokio::test]
async fn test_notification_seed_cut_off_is_retried() {
    let flaky = FlakyStore::new();
    let feed = NotificationFeed::new(Arc::new(flaky.clone()), Some(UserId::new("user-ama")));

    flaky.limit_inserted_rows(Some(1));
    assert!(feed.fetch().await.expect("fetch").is_empty());
    assert_eq!(flaky.inner().count("notifications").await, 0);

    flaky.limit_inserted_rows(None);
    assert_eq!(feed.fetch().await.expect("fetch").len(), 3);
}

#[tokio::test]
async fn test_unreachable_store_during_seed_check() {
    let flaky = FlakyStore::new();
    let data = data_store(Arc::new(flaky.clone()));

    flaky.fail_reads(true);
    let report = data.ensure_seeded().await;
    assert!(report.seeded.is_empty());
    assert_eq!(report.failed.len(), 4);
    assert!(data.load().await.is_err());
    assert!(data.snapshot().await.products.is_empty());
}

#[tokio::test]
async fn test_mutations_surface_store_errors() {
    let flaky = FlakyStore::new();
    let data = data_store(Arc::new(flaky.clone()));
    data.load().await.expect("load");
    let cached = data.snapshot().await;
    let order_id = cached.orders[0].id.clone();

    flaky.fail_writes(true);

    let err = data
        .add_product(NewProduct::new("Agege Bread", Decimal::new(12, 0)))
        .await
        .expect_err("add_product");
    assert!(is_unreachable(&err));

    let err = data
        .add_order(NewOrder::new(
            "Ama Serwaa",
            "Bento Cake (x1)",
            "GH₵65.00",
            OrderStatus::Pending,
        ))
        .await
        .expect_err("add_order");
    assert!(is_unreachable(&err));

    let err = data
        .add_expense(NewExpense::new(
            "Flour",
            Decimal::new(150, 0),
            chrono::Utc::now(),
        ))
        .await
        .expect_err("add_expense");
    assert!(is_unreachable(&err));

    let err = data
        .update_order_status(&order_id, OrderStatus::Completed)
        .await
        .expect_err("update_order_status");
    assert!(is_unreachable(&err));

    assert_eq!(data.snapshot().await, cached);
    assert_eq!(flaky.inner().count("products").await, 18);
    assert_eq!(flaky.inner().count("expenses").await, 0);
}

#[tokio::test]
async fn test_write_survives_failed_refresh() {
    let flaky = FlakyStore::new();
    let data = data_store(Arc::new(flaky.clone()));
    data.load().await.expect("load");

    flaky.fail_reads(true);
    let product = data
        .add_product(NewProduct::new("Agege Bread", Decimal::new(12, 0)))
        .await
        .expect("the insert itself succeeded");
    assert!(!product.id.as_str().is_empty());
    assert!(!data.products().await.contains(&product));

    flaky.fail_reads(false);
    data.load().await.expect("reload");
    assert!(data.products().await.contains(&product));
}

#[tokio::test]
async fn test_status_update_for_unknown_order() {
    let flaky = FlakyStore::new();
    let data = data_store(Arc::new(flaky.clone()));
    data.load().await.expect("load");

    let err = data
        .update_order_status(&OrderId::new("does-not-exist"), OrderStatus::Completed)
        .await
        .expect_err("should fail");
    assert!(matches!(
        err,
        DataError::Store(StoreError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_hung_store_times_out_as_unreachable() {
    let flaky = FlakyStore::new();
    let store: Arc<dyn DocumentStore> = Arc::new(TimeoutStore::new(
        Arc::new(flaky.clone()),
        Duration::from_millis(50),
    ));
    let data = data_store(store);
    data.load().await.expect("load");
    let cached = data.snapshot().await;

    flaky.hang(true);
    let started = Instant::now();
    let err = data.load().await.expect_err("load should time out");
    assert!(is_unreachable(&err));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(data.snapshot().await, cached);
}
