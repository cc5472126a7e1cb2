// sellerdesk/src/workflow/mod.rs

//! A small step runner used to sequence the order lifecycle operations.
//!
//! A [`Workflow`] is an ordered list of named steps. Each step is either
//! [`StepKind::Required`], whose failure aborts the run, or
//! [`StepKind::BestEffort`], whose failure is logged and recorded in the
//! returned [`WorkflowRun`] while the run carries on.

pub mod context_data;
pub mod control;
pub mod definition;
pub mod execution;
pub mod step;

pub use context_data::ContextData;
pub use control::{StepControl, StepOutcome, StepReport, WorkflowOutcome, WorkflowRun};
pub use definition::{Handler, Workflow};
pub use step::{SkipCondition, StepDef, StepKind};
