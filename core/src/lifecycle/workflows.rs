// sellerdesk/src/lifecycle/workflows.rs

//! Step definitions for the two lifecycle operations.
//!
//! Status update: `apply_status` (required) then `notify_customer` (best effort).
//! Deletion: `load_order` (required), `restock_items` (best effort),
//! `notify_customer` (best effort), `remove_order` (required). The order is
//! removed last so restocking and the cancellation email always work from
//! the stored order, and a failed removal leaves it in place to retry.

use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{LifecycleError, StoreError, WorkflowError};
use crate::lifecycle::contexts::{DeletionCtx, RestockReport, StatusUpdateCtx};
use crate::model::OrderView;
use crate::notification::{compose, Notification, NotificationKind, Notifier};
use crate::store::{InventoryLedger, OrderStore};
use crate::workflow::{ContextData, StepControl, StepKind, Workflow};

pub const APPLY_STATUS: &str = "apply_status";
pub const LOAD_ORDER: &str = "load_order";
pub const RESTOCK_ITEMS: &str = "restock_items";
pub const NOTIFY_CUSTOMER: &str = "notify_customer";
pub const REMOVE_ORDER: &str = "remove_order";

fn has_no_recipient(order: Option<&OrderView>) -> bool {
  order.and_then(OrderView::customer_email).is_none()
}

/// Resolves the recipient and renders the message while the context is locked.
fn prepare_notification(
  order: Option<&OrderView>,
  kind: NotificationKind,
  producing_step: &str,
) -> Result<(String, Notification), WorkflowError> {
  let order = order.ok_or_else(|| WorkflowError::MissingOutput {
    step_name: producing_step.to_string(),
    missing: "an order snapshot",
  })?;
  let to = order.customer_email().ok_or_else(|| WorkflowError::MissingOutput {
    step_name: producing_step.to_string(),
    missing: "a customer email",
  })?;
  Ok((to.to_string(), compose(order, kind)))
}

pub fn status_update_workflow(
  orders: Arc<dyn OrderStore>,
  notifier: Notifier,
) -> Workflow<StatusUpdateCtx, LifecycleError> {
  let mut w = Workflow::new(
    "order_status_update",
    &[(APPLY_STATUS, StepKind::Required), (NOTIFY_CUSTOMER, StepKind::BestEffort)],
  );

  w.on(APPLY_STATUS, move |ctx: ContextData<StatusUpdateCtx>| {
    let orders = orders.clone();
    async move {
      let (order_id, status) = {
        let guard = ctx.read();
        (guard.order_id, guard.requested)
      };

      let updated = match orders.set_status(order_id, status).await {
        Ok(Some(view)) => view,
        Ok(None) | Err(StoreError::NotFound(_)) => return Err(LifecycleError::NotFound(order_id)),
        // Any failed write is reported to the client as a bad update.
        Err(StoreError::Rejected(reason)) => {
          return Err(LifecycleError::Validation(format!(
            "Failed to update order status: {}",
            reason
          )))
        }
        Err(e) => {
          warn!(%order_id, %status, error = %e, "Status write failed in the store backend.");
          return Err(LifecycleError::Validation(format!("Failed to update order status: {}", e)));
        }
      };

      info!(%order_id, %status, "Order status written.");
      ctx.write().order = Some(updated);
      Ok::<_, LifecycleError>(StepControl::Continue)
    }
  });

  w.skip_when(NOTIFY_CUSTOMER, |ctx: &StatusUpdateCtx| has_no_recipient(ctx.order.as_ref()));
  w.on(NOTIFY_CUSTOMER, move |ctx: ContextData<StatusUpdateCtx>| {
    let notifier = notifier.clone();
    async move {
      let (to, notification) = {
        let guard = ctx.read();
        prepare_notification(
          guard.order.as_ref(),
          NotificationKind::StatusUpdate(guard.requested),
          APPLY_STATUS,
        )?
      };
      notifier.send(&to, &notification).await?;
      ctx.write().notified = true;
      Ok::<_, LifecycleError>(StepControl::Continue)
    }
  });

  w
}

pub fn deletion_workflow(
  orders: Arc<dyn OrderStore>,
  inventory: Arc<dyn InventoryLedger>,
  notifier: Notifier,
) -> Workflow<DeletionCtx, LifecycleError> {
  let mut w = Workflow::new(
    "order_deletion",
    &[
      (LOAD_ORDER, StepKind::Required),
      (RESTOCK_ITEMS, StepKind::BestEffort),
      (NOTIFY_CUSTOMER, StepKind::BestEffort),
      (REMOVE_ORDER, StepKind::Required),
    ],
  );

  let loader = orders.clone();
  w.on(LOAD_ORDER, move |ctx: ContextData<DeletionCtx>| {
    let orders = loader.clone();
    async move {
      let order_id = ctx.read().order_id;
      let order = orders
        .find_order(order_id)
        .await?
        .ok_or(LifecycleError::NotFound(order_id))?;
      ctx.write().order = Some(order);
      Ok::<_, LifecycleError>(StepControl::Continue)
    }
  });

  // Each item is incremented on its own; one failure does not stop the rest.
  w.on(RESTOCK_ITEMS, move |ctx: ContextData<DeletionCtx>| {
    let inventory = inventory.clone();
    async move {
      let (order_id, items) = {
        let guard = ctx.read();
        let order = guard.order.as_ref().ok_or_else(|| WorkflowError::MissingOutput {
          step_name: LOAD_ORDER.to_string(),
          missing: "an order snapshot",
        })?;
        let items: Vec<_> = order.items.iter().map(|i| (i.product_id, i.quantity)).collect();
        (guard.order_id, items)
      };

      let mut reports = Vec::with_capacity(items.len());
      for (product_id, quantity) in items {
        let error = match inventory.increment_stock(product_id, quantity).await {
          Ok(()) => None,
          Err(e) => {
            warn!(%order_id, %product_id, quantity, error = %e, "Restock failed for line item.");
            Some(e.to_string())
          }
        };
        reports.push(RestockReport {
          product_id,
          quantity,
          error,
        });
      }

      let total = reports.len();
      let failed = reports.iter().filter(|r| !r.restocked()).count();
      ctx.write().restocks = reports;
      if failed > 0 {
        return Err(LifecycleError::Restock { failed, total });
      }
      info!(%order_id, items = total, "Order items restocked.");
      Ok::<_, LifecycleError>(StepControl::Continue)
    }
  });

  w.skip_when(NOTIFY_CUSTOMER, |ctx: &DeletionCtx| has_no_recipient(ctx.order.as_ref()));
  w.on(NOTIFY_CUSTOMER, move |ctx: ContextData<DeletionCtx>| {
    let notifier = notifier.clone();
    async move {
      let (to, notification) = {
        let guard = ctx.read();
        prepare_notification(guard.order.as_ref(), NotificationKind::Cancellation, LOAD_ORDER)?
      };
      notifier.send(&to, &notification).await?;
      ctx.write().notified = true;
      Ok::<_, LifecycleError>(StepControl::Continue)
    }
  });

  w.on(REMOVE_ORDER, move |ctx: ContextData<DeletionCtx>| {
    let orders = orders.clone();
    async move {
      let order_id = ctx.read().order_id;
      if !orders.remove_order(order_id).await? {
        // Removed by someone else after load_order read it.
        return Err(LifecycleError::NotFound(order_id));
      }
      info!(%order_id, "Order removed.");
      Ok::<_, LifecycleError>(StepControl::Continue)
    }
  });

  w
}
