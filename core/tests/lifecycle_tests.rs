// tests/lifecycle_tests.rs
mod common;

use common::*;
use rust_decimal_macros::dec;
use sellerdesk::lifecycle::workflows::{NOTIFY_CUSTOMER, RESTOCK_ITEMS};
use sellerdesk::{
  LifecycleError, LineItem, MemoryStore, Notifier, OrderLifecycle, OrderStatus, OrderStore, StepOutcome,
};
use serial_test::serial;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
#[serial]
async fn update_status_sets_exactly_the_requested_status() {
  setup_tracing();
  let store = MemoryStore::new();
  let seeded = seed(&store).await;
  let mailer = Arc::new(RecordingMailer::default());
  let lifecycle = lifecycle(&store, mailer.clone());

  for status in OrderStatus::ALL {
    let updated = lifecycle.update_status(seeded.order.id, status).await.unwrap();
    assert_eq!(updated.order.status, status);
    assert!(updated.notified);
    let stored = store.find_order(seeded.order.id).await.unwrap().unwrap();
    assert_eq!(stored.status, status);
  }
  assert_eq!(mailer.sent.lock().len(), OrderStatus::ALL.len());
}

#[tokio::test]
#[serial]
async fn shipping_an_order_emails_the_customer() {
  setup_tracing();
  let store = MemoryStore::new();
  let seeded = seed(&store).await;
  let mailer = Arc::new(RecordingMailer::default());
  let lifecycle = lifecycle(&store, mailer.clone());

  let updated = lifecycle.update_status(seeded.order.id, OrderStatus::Shipped).await.unwrap();

  assert_eq!(updated.order.status, OrderStatus::Shipped);
  assert!(updated.notified);
  assert_eq!(updated.order.items[0].product.as_ref().unwrap().name, "Kanjivaram silk");
  assert_eq!(updated.order.user.as_ref().unwrap().email, seeded.customer.email);

  let sent = mailer.sent.lock();
  assert_eq!(sent.len(), 1);
  assert_eq!(sent[0].to, "meera@example.com");
  assert_eq!(sent[0].from_address, "orders@example.com");
  assert!(sent[0].subject.ends_with("is now shipped"));
  assert!(sent[0].html.contains("₹1000.00"));
}

#[tokio::test]
#[serial]
async fn unknown_order_is_not_found_and_nothing_changes() {
  setup_tracing();
  let store = MemoryStore::new();
  let seeded = seed(&store).await;
  let mailer = Arc::new(RecordingMailer::default());
  let lifecycle = lifecycle(&store, mailer.clone());
  let missing = Uuid::new_v4();

  let err = lifecycle.update_status(missing, OrderStatus::Delivered).await.unwrap_err();

  assert!(matches!(err, LifecycleError::NotFound(id) if id == missing));
  let untouched = store.find_order(seeded.order.id).await.unwrap().unwrap();
  assert_eq!(untouched.status, OrderStatus::Pending);
  assert!(mailer.sent.lock().is_empty());
}

#[tokio::test]
#[serial]
async fn rejected_status_write_is_a_validation_error() {
  setup_tracing();
  let store = MemoryStore::new();
  let seeded = seed(&store).await;
  let orders = Arc::new(ScriptedOrderStore {
    inner: store.clone(),
    reject_status_writes: true,
    fail_status_writes: false,
    fail_removal: false,
  });
  let lifecycle = OrderLifecycle::new(
    orders,
    Arc::new(store.clone()),
    Notifier::new(Arc::new(RecordingMailer::default()), mail_config()),
  );

  let err = lifecycle.update_status(seeded.order.id, OrderStatus::Shipped).await.unwrap_err();

  match err {
    LifecycleError::Validation(message) => assert!(message.starts_with("Failed to update order status")),
    other => panic!("expected Validation, got {:?}", other),
  }
}

#[tokio::test]
#[serial]
async fn backend_failure_on_status_write_is_a_validation_error() {
  setup_tracing();
  let store = MemoryStore::new();
  let seeded = seed(&store).await;
  let mailer = Arc::new(RecordingMailer::default());
  let orders = Arc::new(ScriptedOrderStore {
    inner: store.clone(),
    reject_status_writes: false,
    fail_status_writes: true,
    fail_removal: false,
  });
  let lifecycle = OrderLifecycle::new(
    orders,
    Arc::new(store.clone()),
    Notifier::new(mailer.clone(), mail_config()),
  );

  let err = lifecycle.update_status(seeded.order.id, OrderStatus::Shipped).await.unwrap_err();

  match err {
    LifecycleError::Validation(message) => {
      assert!(message.starts_with("Failed to update order status"));
      assert!(message.contains("connection reset by peer"));
    }
    other => panic!("expected Validation, got {:?}", other),
  }
  let stored = store.find_order(seeded.order.id).await.unwrap().unwrap();
  assert_eq!(stored.status, OrderStatus::Pending);
  assert!(mailer.sent.lock().is_empty());
}

#[tokio::test]
#[serial]
async fn mail_failure_degrades_to_not_notified() {
  setup_tracing();
  let store = MemoryStore::new();
  let seeded = seed(&store).await;
  let lifecycle = lifecycle(&store, Arc::new(FailingMailer));

  let updated = lifecycle.update_status(seeded.order.id, OrderStatus::Delivered).await.unwrap();

  assert!(!updated.notified);
  assert_eq!(updated.order.status, OrderStatus::Delivered);
  assert!(matches!(
    updated.steps.iter().find(|r| r.step == NOTIFY_CUSTOMER).map(|r| &r.outcome),
    Some(StepOutcome::Degraded { .. })
  ));
  let stored = store.find_order(seeded.order.id).await.unwrap().unwrap();
  assert_eq!(stored.status, OrderStatus::Delivered);
}

#[tokio::test]
#[serial]
async fn stalled_mail_transport_times_out() {
  setup_tracing();
  let store = MemoryStore::new();
  let seeded = seed(&store).await;
  let lifecycle = lifecycle(&store, Arc::new(StalledMailer));

  let deleted = lifecycle.delete_order(seeded.order.id).await.unwrap();

  assert!(!deleted.notified);
  assert!(store.find_order(seeded.order.id).await.unwrap().is_none());
  assert_eq!(stock_of(&store, seeded.product.id).await, 7);
}

#[tokio::test]
#[serial]
async fn customer_without_email_is_not_notified() {
  setup_tracing();
  let store = MemoryStore::new();
  let customer = seed_customer(&store, "   ").await;
  let product = seed_product(&store, "Dupatta", 1).await;
  let order = seed_order(
    &store,
    customer.id,
    vec![LineItem {
      product_id: product.id,
      quantity: 1,
      price: dec!(250),
    }],
  )
  .await;
  let mailer = Arc::new(RecordingMailer::default());
  let lifecycle = lifecycle(&store, mailer.clone());

  let updated = lifecycle.update_status(order.id, OrderStatus::PaymentDone).await.unwrap();

  assert!(!updated.notified);
  assert!(updated
    .steps
    .iter()
    .any(|r| r.step == NOTIFY_CUSTOMER && r.outcome == StepOutcome::Skipped));
  assert!(mailer.sent.lock().is_empty());
}

#[tokio::test]
#[serial]
async fn delete_restocks_every_item_then_removes_the_order() {
  setup_tracing();
  let store = MemoryStore::new();
  let seeded = seed(&store).await;
  let second = seed_product(&store, "Bandhani dupatta", 0).await;
  let order = seed_order(
    &store,
    seeded.customer.id,
    vec![
      LineItem {
        product_id: seeded.product.id,
        quantity: 3,
        price: dec!(500),
      },
      LineItem {
        product_id: second.id,
        quantity: 4,
        price: dec!(120.50),
      },
    ],
  )
  .await;
  let mailer = Arc::new(RecordingMailer::default());
  let lifecycle = lifecycle(&store, mailer.clone());

  let deleted = lifecycle.delete_order(order.id).await.unwrap();

  assert!(deleted.notified);
  assert_eq!(deleted.restocks.len(), 2);
  assert!(deleted.restocks.iter().all(|r| r.restocked()));
  assert_eq!(stock_of(&store, seeded.product.id).await, 5 + 3);
  assert_eq!(stock_of(&store, second.id).await, 4);

  let remaining: Vec<Uuid> = lifecycle.list_orders().await.unwrap().iter().map(|o| o.id).collect();
  assert!(!remaining.contains(&order.id));
  assert!(remaining.contains(&seeded.order.id));
  assert!(mailer.subjects()[0].ends_with("has been cancelled"));
}

#[tokio::test]
#[serial]
async fn scenario_ship_then_delete() {
  setup_tracing();
  let store = MemoryStore::new();
  let seeded = seed(&store).await;
  let mailer = Arc::new(RecordingMailer::default());
  let lifecycle = lifecycle(&store, mailer.clone());

  let shipped = lifecycle.update_status(seeded.order.id, OrderStatus::Shipped).await.unwrap();
  assert_eq!(shipped.order.status, OrderStatus::Shipped);

  lifecycle.delete_order(seeded.order.id).await.unwrap();

  assert_eq!(stock_of(&store, seeded.product.id).await, 5 + 2);
  assert!(lifecycle.list_orders().await.unwrap().is_empty());
  assert_eq!(mailer.subjects().len(), 2);
}

#[tokio::test]
#[serial]
async fn one_failed_increment_does_not_block_the_others_or_the_deletion() {
  setup_tracing();
  let store = MemoryStore::new();
  let seeded = seed(&store).await;
  let broken = seed_product(&store, "Zari border", 10).await;
  let order = seed_order(
    &store,
    seeded.customer.id,
    vec![
      LineItem {
        product_id: broken.id,
        quantity: 1,
        price: dec!(80),
      },
      LineItem {
        product_id: seeded.product.id,
        quantity: 2,
        price: dec!(500),
      },
    ],
  )
  .await;
  let ledger = Arc::new(FlakyLedger {
    inner: store.clone(),
    fail_for: HashSet::from([broken.id]),
  });
  let lifecycle = OrderLifecycle::new(
    Arc::new(store.clone()),
    ledger,
    Notifier::new(Arc::new(RecordingMailer::default()), mail_config()),
  );

  let deleted = lifecycle.delete_order(order.id).await.unwrap();

  assert_eq!(stock_of(&store, broken.id).await, 10);
  assert_eq!(stock_of(&store, seeded.product.id).await, 7);
  let failed: Vec<_> = deleted.restocks.iter().filter(|r| !r.restocked()).collect();
  assert_eq!(failed.len(), 1);
  assert_eq!(failed[0].product_id, broken.id);
  assert!(matches!(
    deleted.steps.iter().find(|r| r.step == RESTOCK_ITEMS).map(|r| &r.outcome),
    Some(StepOutcome::Degraded { .. })
  ));
  assert!(deleted.notified);
  assert!(store.find_order(order.id).await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn restock_of_a_removed_product_is_reported_not_fatal() {
  setup_tracing();
  let store = MemoryStore::new();
  let customer = seed_customer(&store, "ravi@example.com").await;
  let order = seed_order(
    &store,
    customer.id,
    vec![LineItem {
      product_id: Uuid::new_v4(),
      quantity: 1,
      price: dec!(99),
    }],
  )
  .await;
  let lifecycle = lifecycle(&store, Arc::new(RecordingMailer::default()));

  let deleted = lifecycle.delete_order(order.id).await.unwrap();

  assert!(!deleted.restocks[0].restocked());
  assert!(deleted.notified);
  assert!(store.find_order(order.id).await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn delete_unknown_order_mutates_nothing() {
  setup_tracing();
  let store = MemoryStore::new();
  let seeded = seed(&store).await;
  let mailer = Arc::new(RecordingMailer::default());
  let lifecycle = lifecycle(&store, mailer.clone());

  let err = lifecycle.delete_order(Uuid::new_v4()).await.unwrap_err();

  assert!(matches!(err, LifecycleError::NotFound(_)));
  assert_eq!(stock_of(&store, seeded.product.id).await, 5);
  assert_eq!(lifecycle.list_orders().await.unwrap().len(), 1);
  assert!(mailer.sent.lock().is_empty());
}

#[tokio::test]
#[serial]
async fn deleting_twice_restocks_once() {
  setup_tracing();
  let store = MemoryStore::new();
  let seeded = seed(&store).await;
  let lifecycle = lifecycle(&store, Arc::new(RecordingMailer::default()));

  lifecycle.delete_order(seeded.order.id).await.unwrap();
  let err = lifecycle.delete_order(seeded.order.id).await.unwrap_err();

  assert!(matches!(err, LifecycleError::NotFound(_)));
  assert_eq!(stock_of(&store, seeded.product.id).await, 7);
}

#[tokio::test]
#[serial]
async fn concurrent_deletes_of_one_order_restock_once() {
  setup_tracing();
  let store = MemoryStore::new();
  let seeded = seed(&store).await;
  // The stalled mailer keeps the first deletion in flight until its timeout.
  let lifecycle = lifecycle(&store, Arc::new(StalledMailer));

  let (first, second) = tokio::join!(
    lifecycle.delete_order(seeded.order.id),
    lifecycle.delete_order(seeded.order.id)
  );

  let outcomes = [first.is_ok(), second.is_ok()];
  assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
  let rejected = if first.is_err() { first.unwrap_err() } else { second.unwrap_err() };
  assert!(matches!(rejected, LifecycleError::Conflict(_)));
  assert_eq!(stock_of(&store, seeded.product.id).await, 7);
}

#[tokio::test]
#[serial]
async fn failed_removal_keeps_the_order_for_a_retry() {
  setup_tracing();
  let store = MemoryStore::new();
  let seeded = seed(&store).await;
  let orders = Arc::new(ScriptedOrderStore {
    inner: store.clone(),
    reject_status_writes: false,
    fail_status_writes: false,
    fail_removal: true,
  });
  let mailer = Arc::new(RecordingMailer::default());
  let lifecycle = OrderLifecycle::new(
    orders,
    Arc::new(store.clone()),
    Notifier::new(mailer.clone(), mail_config()),
  );

  let err = lifecycle.delete_order(seeded.order.id).await.unwrap_err();

  assert!(matches!(err, LifecycleError::Store { .. }));
  assert!(store.find_order(seeded.order.id).await.unwrap().is_some());
  // Restock and cancellation already happened before the removal failed.
  assert_eq!(stock_of(&store, seeded.product.id).await, 7);
  let subjects = mailer.subjects();
  assert_eq!(subjects.len(), 1);
  assert!(subjects[0].ends_with("has been cancelled"));
}

#[tokio::test]
#[serial]
async fn deletion_restocks_and_notifies_before_removing() {
  setup_tracing();
  let store = MemoryStore::new();
  let customer = seed_customer(&store, "meera@example.com").await;
  let silk = seed_product(&store, "Kanjivaram silk", 5).await;
  let cotton = seed_product(&store, "Chanderi cotton", 1).await;
  let order = seed_order(
    &store,
    customer.id,
    vec![
      LineItem {
        product_id: silk.id,
        quantity: 2,
        price: dec!(500),
      },
      LineItem {
        product_id: cotton.id,
        quantity: 1,
        price: dec!(500),
      },
    ],
  )
  .await;
  let (lifecycle, journal, mailer) = journaled_lifecycle(&store, false);

  lifecycle.delete_order(order.id).await.unwrap();

  assert_eq!(
    *journal.lock(),
    vec!["increment_stock", "increment_stock", "send", "remove_order"]
  );
  assert_eq!(mailer.inner.subjects().len(), 1);
  assert!(store.find_order(order.id).await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn failed_removal_comes_after_restock_and_notice() {
  setup_tracing();
  let store = MemoryStore::new();
  let seeded = seed(&store).await;
  let (lifecycle, journal, _mailer) = journaled_lifecycle(&store, true);

  assert!(lifecycle.delete_order(seeded.order.id).await.is_err());

  assert_eq!(*journal.lock(), vec!["increment_stock", "send", "remove_order"]);
  assert_eq!(stock_of(&store, seeded.product.id).await, 7);
}

#[tokio::test]
#[serial]
async fn orders_are_listed_newest_first() {
  setup_tracing();
  let store = MemoryStore::new();
  let seeded = seed(&store).await;
  tokio::time::sleep(std::time::Duration::from_millis(5)).await;
  let newer = seed_order(
    &store,
    seeded.customer.id,
    vec![LineItem {
      product_id: seeded.product.id,
      quantity: 1,
      price: dec!(500),
    }],
  )
  .await;
  let lifecycle = lifecycle(&store, Arc::new(RecordingMailer::default()));

  let listed = lifecycle.list_orders().await.unwrap();

  assert_eq!(listed.iter().map(|o| o.id).collect::<Vec<_>>(), vec![newer.id, seeded.order.id]);
}
