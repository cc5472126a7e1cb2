// sellerdesk/src/error.rs
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Problems with how a workflow was assembled, discovered while running it.
#[derive(Debug, Error)]
pub enum WorkflowError {
  #[error("Handler missing for required step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Step '{step_name}' finished without producing {missing}")]
  MissingOutput { step_name: String, missing: &'static str },
}

/// Failures reported by the persistence collaborators.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Record not found: {0}")]
  NotFound(String),

  /// The store refused a write for structural reasons (constraint, range, shape).
  #[error("Write rejected: {0}")]
  Rejected(String),

  #[error("Store backend failure: {source}")]
  Backend {
    #[from]
    source: anyhow::Error,
  },
}

/// Failures reported by a mail transport.
#[derive(Debug, Error)]
pub enum MailError {
  #[error("Mail transport failure: {0}")]
  Transport(String),

  #[error("Mail provider rejected the message (status {status}): {body}")]
  Rejected { status: u16, body: String },

  #[error("Mail delivery timed out after {0:?}")]
  Timeout(Duration),
}

/// Errors produced by the order lifecycle operations.
///
/// Only `NotFound`, `Validation`, `Conflict`, `Store` and `Workflow` ever reach
/// a caller. `Notification` and `Restock` are raised inside best-effort steps
/// and end up as degraded step reports and boolean flags.
#[derive(Debug, Error)]
pub enum LifecycleError {
  #[error("Order not found: {0}")]
  NotFound(Uuid),

  #[error("Validation failed: {0}")]
  Validation(String),

  #[error("Order {0} is already being deleted")]
  Conflict(Uuid),

  #[error("Notification not delivered: {source}")]
  Notification {
    #[from]
    source: MailError,
  },

  #[error("Restocking failed for {failed} of {total} line items")]
  Restock { failed: usize, total: usize },

  #[error("Store error: {source}")]
  Store {
    #[from]
    source: StoreError,
  },

  #[error("Workflow error: {source}")]
  Workflow {
    #[from]
    source: WorkflowError,
  },
}

pub type LifecycleResult<T, E = LifecycleError> = std::result::Result<T, E>;
