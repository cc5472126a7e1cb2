// sellerdesk/src/lifecycle/service.rs

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::contexts::{DeletionCtx, RestockReport, StatusUpdateCtx};
use super::workflows::{deletion_workflow, status_update_workflow, APPLY_STATUS};
use crate::error::{LifecycleError, LifecycleResult, WorkflowError};
use crate::model::{OrderStatus, OrderView};
use crate::notification::Notifier;
use crate::store::{InventoryLedger, OrderStore};
use crate::workflow::{ContextData, StepReport, Workflow};

/// Result of [`OrderLifecycle::update_status`].
#[derive(Debug, Clone)]
pub struct StatusUpdated {
  pub order: OrderView,
  /// Whether the status email reached the mail transport.
  pub notified: bool,
  pub steps: Vec<StepReport>,
}

/// Result of [`OrderLifecycle::delete_order`].
#[derive(Debug, Clone)]
pub struct OrderDeleted {
  pub order_id: Uuid,
  /// Whether the cancellation email reached the mail transport.
  pub notified: bool,
  pub restocks: Vec<RestockReport>,
  pub steps: Vec<StepReport>,
}

/// Owns the state-changing operations on an order.
///
/// Notification and restocking failures never fail an operation; they show up
/// as `notified == false`, failed [`RestockReport`]s and degraded
/// [`StepReport`]s.
pub struct OrderLifecycle {
  orders: Arc<dyn OrderStore>,
  status_flow: Workflow<StatusUpdateCtx, LifecycleError>,
  deletion_flow: Workflow<DeletionCtx, LifecycleError>,
  deletions_in_flight: Mutex<HashSet<Uuid>>,
}

impl OrderLifecycle {
  pub fn new(orders: Arc<dyn OrderStore>, inventory: Arc<dyn InventoryLedger>, notifier: Notifier) -> Self {
    Self {
      status_flow: status_update_workflow(orders.clone(), notifier.clone()),
      deletion_flow: deletion_workflow(orders.clone(), inventory, notifier),
      orders,
      deletions_in_flight: Mutex::new(HashSet::new()),
    }
  }

  #[instrument(name = "OrderLifecycle::list_orders", skip(self), err(Display))]
  pub async fn list_orders(&self) -> LifecycleResult<Vec<OrderView>> {
    Ok(self.orders.list_orders().await?)
  }

  #[instrument(name = "OrderLifecycle::get_order", skip(self), err(Display))]
  pub async fn get_order(&self, order_id: Uuid) -> LifecycleResult<OrderView> {
    self
      .orders
      .find_order(order_id)
      .await?
      .ok_or(LifecycleError::NotFound(order_id))
  }

  /// Sets the order's status and emails the customer about it.
  ///
  /// Any status may follow any other. Fails with `NotFound` (nothing written)
  /// or `Validation` when the store rejects the write.
  #[instrument(name = "OrderLifecycle::update_status", skip(self), err(Display))]
  pub async fn update_status(&self, order_id: Uuid, status: OrderStatus) -> LifecycleResult<StatusUpdated> {
    let ctx_data = ContextData::new(StatusUpdateCtx::new(order_id, status));
    let run = self.status_flow.run(ctx_data.clone()).await?;

    let ctx = ctx_data.into_inner();
    let order = ctx.order.ok_or_else(|| WorkflowError::MissingOutput {
      step_name: APPLY_STATUS.to_string(),
      missing: "the updated order",
    })?;

    info!(%order_id, %status, notified = ctx.notified, "Order status updated.");
    Ok(StatusUpdated {
      order,
      notified: ctx.notified,
      steps: run.steps,
    })
  }

  /// Restocks every line item, sends the cancellation email, then removes
  /// the order.
  ///
  /// A concurrent delete of the same order in this process fails with
  /// `Conflict` rather than restocking twice.
  #[instrument(name = "OrderLifecycle::delete_order", skip(self), err(Display))]
  pub async fn delete_order(&self, order_id: Uuid) -> LifecycleResult<OrderDeleted> {
    let _claim = DeletionClaim::acquire(&self.deletions_in_flight, order_id)?;

    let ctx_data = ContextData::new(DeletionCtx::new(order_id));
    let run = self.deletion_flow.run(ctx_data.clone()).await?;
    let ctx = ctx_data.into_inner();

    let failed_restocks = ctx.restocks.iter().filter(|r| !r.restocked()).count();
    if failed_restocks > 0 {
      warn!(%order_id, failed_restocks, "Order deleted with incomplete restocking.");
    }
    info!(%order_id, notified = ctx.notified, "Order deleted.");

    Ok(OrderDeleted {
      order_id,
      notified: ctx.notified,
      restocks: ctx.restocks,
      steps: run.steps,
    })
  }
}

/// Marks an order as being deleted for as long as the claim is alive.
struct DeletionClaim<'a> {
  in_flight: &'a Mutex<HashSet<Uuid>>,
  order_id: Uuid,
}

impl<'a> DeletionClaim<'a> {
  fn acquire(in_flight: &'a Mutex<HashSet<Uuid>>, order_id: Uuid) -> LifecycleResult<Self> {
    if !in_flight.lock().insert(order_id) {
      warn!(%order_id, "Rejected concurrent deletion of the same order.");
      return Err(LifecycleError::Conflict(order_id));
    }
    Ok(Self { in_flight, order_id })
  }
}

impl Drop for DeletionClaim<'_> {
  fn drop(&mut self) {
    self.in_flight.lock().remove(&self.order_id);
  }
}
