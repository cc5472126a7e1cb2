// sellerdesk/src/workflow/step.rs

use std::sync::Arc;

/// Predicate evaluated against the context before a step runs.
/// Returning `true` skips the step.
pub type SkipCondition<TData> = Arc<dyn Fn(&TData) -> bool + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
  /// An error aborts the whole run.
  Required,
  /// An error is recorded as [`super::StepOutcome::Degraded`] and the run continues.
  BestEffort,
}

#[derive(Clone)]
pub struct StepDef<TData: 'static + Send + Sync> {
  pub name: String,
  pub kind: StepKind,
  pub skip_if: Option<SkipCondition<TData>>,
}

impl<TData: 'static + Send + Sync> std::fmt::Debug for StepDef<TData> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StepDef")
      .field("name", &self.name)
      .field("kind", &self.kind)
      .field("skip_if_present", &self.skip_if.is_some())
      .finish()
  }
}
