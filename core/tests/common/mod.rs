// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rust_decimal_macros::dec;
use sellerdesk::{
  CustomerDirectory, DeliveryReceipt, InventoryLedger, LineItem, MailConfig, MailError, Mailer, MemoryStore, NewOrder,
  NewProduct, NewUser, OrderLifecycle, OrderStatus, OrderStore, OrderView, OutboundEmail, Product, ProductCatalog,
  ShippingAddress, StoreError, StoreResult, User,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use uuid::Uuid;

// --- Tracing ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Mailers ---

/// Accepts everything and remembers what it was given.
#[derive(Default)]
pub struct RecordingMailer {
  pub sent: Mutex<Vec<OutboundEmail>>,
}

impl RecordingMailer {
  pub fn subjects(&self) -> Vec<String> {
    self.sent.lock().iter().map(|e| e.subject.clone()).collect()
  }
}

#[async_trait]
impl Mailer for RecordingMailer {
  async fn send(&self, email: &OutboundEmail) -> Result<DeliveryReceipt, MailError> {
    let mut sent = self.sent.lock();
    sent.push(email.clone());
    Ok(DeliveryReceipt {
      message_id: format!("test-{}", sent.len()),
    })
  }
}

pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
  async fn send(&self, _email: &OutboundEmail) -> Result<DeliveryReceipt, MailError> {
    Err(MailError::Transport("connection refused".to_string()))
  }
}

/// Never answers within any reasonable timeout.
pub struct StalledMailer;

#[async_trait]
impl Mailer for StalledMailer {
  async fn send(&self, _email: &OutboundEmail) -> Result<DeliveryReceipt, MailError> {
    tokio::time::sleep(Duration::from_secs(60)).await;
    Ok(DeliveryReceipt {
      message_id: "too-late".to_string(),
    })
  }
}

pub fn mail_config() -> MailConfig {
  MailConfig {
    from_name: "Team Naaree Collections".to_string(),
    from_address: "orders@example.com".to_string(),
    timeout: Duration::from_millis(100),
  }
}

// --- Store wrappers with injected failures ---

/// Inventory ledger that refuses increments for selected products.
pub struct FlakyLedger {
  pub inner: MemoryStore,
  pub fail_for: HashSet<Uuid>,
}

#[async_trait]
impl InventoryLedger for FlakyLedger {
  async fn increment_stock(&self, product_id: Uuid, quantity: u32) -> StoreResult<()> {
    if self.fail_for.contains(&product_id) {
      return Err(StoreError::Backend {
        source: anyhow::anyhow!("write conflict on product {}", product_id),
      });
    }
    self.inner.increment_stock(product_id, quantity).await
  }
}

/// Order store whose writes can be made to fail.
pub struct ScriptedOrderStore {
  pub inner: MemoryStore,
  pub reject_status_writes: bool,
  /// Status writes fail as if the backend were unreachable.
  pub fail_status_writes: bool,
  pub fail_removal: bool,
}

#[async_trait]
impl OrderStore for ScriptedOrderStore {
  async fn list_orders(&self) -> StoreResult<Vec<OrderView>> {
    self.inner.list_orders().await
  }

  async fn find_order(&self, order_id: Uuid) -> StoreResult<Option<OrderView>> {
    self.inner.find_order(order_id).await
  }

  async fn set_status(&self, order_id: Uuid, status: OrderStatus) -> StoreResult<Option<OrderView>> {
    if self.reject_status_writes {
      return Err(StoreError::Rejected("status failed schema validation".to_string()));
    }
    if self.fail_status_writes {
      return Err(StoreError::Backend {
        source: anyhow::anyhow!("connection reset by peer"),
      });
    }
    self.inner.set_status(order_id, status).await
  }

  async fn remove_order(&self, order_id: Uuid) -> StoreResult<bool> {
    if self.fail_removal {
      return Err(StoreError::Backend {
        source: anyhow::anyhow!("primary unavailable"),
      });
    }
    self.inner.remove_order(order_id).await
  }

  async fn insert_order(&self, order: NewOrder) -> StoreResult<OrderView> {
    self.inner.insert_order(order).await
  }
}

// --- Call journal ---

/// Ordered record of collaborator calls, shared by the journaling doubles.
pub type Journal = Arc<Mutex<Vec<&'static str>>>;

/// Order store and ledger that note every stock increment and removal.
pub struct JournalingStore {
  pub inner: MemoryStore,
  pub journal: Journal,
  pub fail_removal: bool,
}

#[async_trait]
impl OrderStore for JournalingStore {
  async fn list_orders(&self) -> StoreResult<Vec<OrderView>> {
    self.inner.list_orders().await
  }

  async fn find_order(&self, order_id: Uuid) -> StoreResult<Option<OrderView>> {
    self.inner.find_order(order_id).await
  }

  async fn set_status(&self, order_id: Uuid, status: OrderStatus) -> StoreResult<Option<OrderView>> {
    self.inner.set_status(order_id, status).await
  }

  async fn remove_order(&self, order_id: Uuid) -> StoreResult<bool> {
    self.journal.lock().push("remove_order");
    if self.fail_removal {
      return Err(StoreError::Backend {
        source: anyhow::anyhow!("primary unavailable"),
      });
    }
    self.inner.remove_order(order_id).await
  }

  async fn insert_order(&self, order: NewOrder) -> StoreResult<OrderView> {
    self.inner.insert_order(order).await
  }
}

#[async_trait]
impl InventoryLedger for JournalingStore {
  async fn increment_stock(&self, product_id: Uuid, quantity: u32) -> StoreResult<()> {
    self.journal.lock().push("increment_stock");
    self.inner.increment_stock(product_id, quantity).await
  }
}

pub struct JournalingMailer {
  pub journal: Journal,
  pub inner: RecordingMailer,
}

#[async_trait]
impl Mailer for JournalingMailer {
  async fn send(&self, email: &OutboundEmail) -> Result<DeliveryReceipt, MailError> {
    self.journal.lock().push("send");
    self.inner.send(email).await
  }
}

/// Lifecycle over a journaling store and mailer that share one journal.
pub fn journaled_lifecycle(
  store: &MemoryStore,
  fail_removal: bool,
) -> (OrderLifecycle, Journal, Arc<JournalingMailer>) {
  let journal: Journal = Arc::new(Mutex::new(Vec::new()));
  let wrapped = Arc::new(JournalingStore {
    inner: store.clone(),
    journal: journal.clone(),
    fail_removal,
  });
  let mailer = Arc::new(JournalingMailer {
    journal: journal.clone(),
    inner: RecordingMailer::default(),
  });
  let lifecycle = OrderLifecycle::new(
    wrapped.clone(),
    wrapped,
    sellerdesk::Notifier::new(mailer.clone(), mail_config()),
  );
  (lifecycle, journal, mailer)
}

// --- Fixtures ---

pub struct Seeded {
  pub customer: User,
  pub product: Product,
  pub order: OrderView,
}

pub fn address() -> ShippingAddress {
  ShippingAddress {
    street: "12 Lake Road".into(),
    city: "Pune".into(),
    state: "MH".into(),
    zip_code: "411001".into(),
    country: "India".into(),
    whatsapp_number: "+911234567890".into(),
  }
}

pub async fn seed_product(store: &MemoryStore, name: &str, quantity: u32) -> Product {
  store
    .create_product(NewProduct {
      name: name.to_string(),
      fabric_type: None,
      regional_varieties: None,
      price: dec!(500),
      discounts: None,
      sizes: vec![],
      availability: None,
      product_type: None,
      short_description: None,
      images: vec![],
      quantity,
    })
    .await
    .expect("seed product")
}

pub async fn seed_customer(store: &MemoryStore, email: &str) -> User {
  store
    .create_user(NewUser {
      name: "Meera".into(),
      email: email.to_string(),
      password_hash: "hash".into(),
      phone_number: Some("+911234567890".into()),
      addresses: vec![address()],
    })
    .await
    .expect("seed customer")
}

pub async fn seed_order(store: &MemoryStore, user_id: Uuid, items: Vec<LineItem>) -> OrderView {
  let total = items
    .iter()
    .map(|i| i.price * rust_decimal::Decimal::from(i.quantity))
    .sum();
  store
    .insert_order(NewOrder {
      user_id,
      items,
      shipping_address: address(),
      total_amount: total,
    })
    .await
    .expect("seed order")
}

/// Customer with an email, one product with 5 in stock, and a pending order
/// for 2 of it at 500.
pub async fn seed(store: &MemoryStore) -> Seeded {
  let customer = seed_customer(store, "meera@example.com").await;
  let product = seed_product(store, "Kanjivaram silk", 5).await;
  let order = seed_order(
    store,
    customer.id,
    vec![LineItem {
      product_id: product.id,
      quantity: 2,
      price: dec!(500),
    }],
  )
  .await;
  Seeded {
    customer,
    product,
    order,
  }
}

pub fn lifecycle(store: &MemoryStore, mailer: Arc<dyn Mailer>) -> OrderLifecycle {
  OrderLifecycle::new(
    Arc::new(store.clone()),
    Arc::new(store.clone()),
    sellerdesk::Notifier::new(mailer, mail_config()),
  )
}

pub async fn stock_of(store: &MemoryStore, product_id: Uuid) -> u32 {
  store
    .get_product(product_id)
    .await
    .expect("read product")
    .expect("product exists")
    .quantity
}
