// sellerdesk/src/lifecycle/mod.rs

//! Order status changes and order deletion, with their restocking and
//! notification side effects.

pub mod contexts;
pub mod service;
pub mod workflows;

pub use contexts::{DeletionCtx, RestockReport, StatusUpdateCtx};
pub use service::{OrderDeleted, OrderLifecycle, StatusUpdated};
