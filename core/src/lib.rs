// sellerdesk/src/lib.rs

//! sellerdesk: the order lifecycle behind a small seller-admin backend.
//!
//! The crate covers:
//!  - The order, product and customer model.
//!  - Collaborator traits for the document store and the mail transport,
//!    plus an in-memory store.
//!  - A pure [`compose`] function rendering customer notifications.
//!  - [`OrderLifecycle`], which changes an order's status or deletes it,
//!    restocking inventory and emailing the customer along the way, and
//!    reports whether the email went out without ever failing on it.
//!  - The [`Workflow`] step runner those operations are built on.

pub mod error;
pub mod lifecycle;
pub mod model;
pub mod notification;
pub mod store;
pub mod workflow;

// --- Re-exports for the Public API ---

pub use crate::error::{LifecycleError, LifecycleResult, MailError, StoreError, WorkflowError};

pub use crate::lifecycle::{OrderDeleted, OrderLifecycle, RestockReport, StatusUpdated};

pub use crate::model::{
  Availability, CustomerSummary, LineItem, LineItemView, NewOrder, NewProduct, NewUser, Order, OrderStatus, OrderView,
  ParseStatusError, Product, ProductPatch, ProductSummary, ProductType, ShippingAddress, User,
};

pub use crate::notification::{
  compose, DeliveryReceipt, MailConfig, Mailer, Notification, NotificationKind, Notifier, OutboundEmail,
};

pub use crate::store::{CustomerDirectory, InventoryLedger, MemoryStore, OrderStore, ProductCatalog, StoreResult};

pub use crate::workflow::{
  ContextData, StepControl, StepKind, StepOutcome, StepReport, Workflow, WorkflowOutcome, WorkflowRun,
};
