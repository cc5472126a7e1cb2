// sellerdesk/src/workflow/control.rs

//! Flow signals returned by handlers and the per-run report.

/// Signal from a handler: keep going, or halt the run after this handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
  Continue,
  Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowOutcome {
  /// Every step ran, was skipped, or degraded.
  Completed,
  /// A handler returned [`StepControl::Stop`].
  Stopped,
}

/// What happened to one step during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
  Completed,
  Skipped,
  /// A best-effort step failed; the run went on without it.
  Degraded { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
  pub step: String,
  pub outcome: StepOutcome,
}

impl StepReport {
  pub(crate) fn new(step: &str, outcome: StepOutcome) -> Self {
    Self {
      step: step.to_string(),
      outcome,
    }
  }
}

/// Result of a run that did not abort on a required step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowRun {
  pub outcome: WorkflowOutcome,
  pub steps: Vec<StepReport>,
}

impl WorkflowRun {
  pub fn step(&self, name: &str) -> Option<&StepOutcome> {
    self.steps.iter().find(|r| r.step == name).map(|r| &r.outcome)
  }

  pub fn degraded_steps(&self) -> impl Iterator<Item = &StepReport> {
    self
      .steps
      .iter()
      .filter(|r| matches!(r.outcome, StepOutcome::Degraded { .. }))
  }
}
