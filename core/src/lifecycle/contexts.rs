// sellerdesk/src/lifecycle/contexts.rs

//! State carried through the lifecycle workflows.

use uuid::Uuid;

use crate::model::{OrderStatus, OrderView};

#[derive(Debug, Clone)]
pub struct StatusUpdateCtx {
  pub order_id: Uuid,
  pub requested: OrderStatus,
  /// Set by `apply_status`.
  pub order: Option<OrderView>,
  pub notified: bool,
}

impl StatusUpdateCtx {
  pub fn new(order_id: Uuid, requested: OrderStatus) -> Self {
    Self {
      order_id,
      requested,
      order: None,
      notified: false,
    }
  }
}

/// Outcome of returning one line item's units to stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestockReport {
  pub product_id: Uuid,
  pub quantity: u32,
  /// `None` when the increment went through.
  pub error: Option<String>,
}

impl RestockReport {
  pub fn restocked(&self) -> bool {
    self.error.is_none()
  }
}

#[derive(Debug, Clone)]
pub struct DeletionCtx {
  pub order_id: Uuid,
  /// Snapshot taken by `load_order`; every later step works from it.
  pub order: Option<OrderView>,
  pub restocks: Vec<RestockReport>,
  pub notified: bool,
}

impl DeletionCtx {
  pub fn new(order_id: Uuid) -> Self {
    Self {
      order_id,
      order: None,
      restocks: Vec::new(),
      notified: false,
    }
  }
}
