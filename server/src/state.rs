// sellerdesk-server/src/state.rs

use crate::config::AppConfig;
use sellerdesk::{CustomerDirectory, InventoryLedger, Mailer, Notifier, OrderLifecycle, OrderStore, ProductCatalog};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub lifecycle: Arc<OrderLifecycle>,
  pub catalog: Arc<dyn ProductCatalog>,
  pub customers: Arc<dyn CustomerDirectory>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Wires one store (which plays every persistence role) and one mail
  /// transport into the handlers' shared state.
  pub fn new<S>(store: S, mailer: Arc<dyn Mailer>, config: Arc<AppConfig>) -> Self
  where
    S: OrderStore + InventoryLedger + ProductCatalog + CustomerDirectory + Clone + 'static,
  {
    let notifier = Notifier::new(mailer, config.mail_config());
    let orders: Arc<dyn OrderStore> = Arc::new(store.clone());
    let inventory: Arc<dyn InventoryLedger> = Arc::new(store.clone());
    Self {
      lifecycle: Arc::new(OrderLifecycle::new(orders, inventory, notifier)),
      catalog: Arc::new(store.clone()),
      customers: Arc::new(store),
      config,
    }
  }
}
