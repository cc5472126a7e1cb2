// sellerdesk/src/workflow/execution.rs

//! `Workflow::run()`: walks the steps in order and reports what each one did.

use crate::error::WorkflowError;
use crate::workflow::context_data::ContextData;
use crate::workflow::control::{StepControl, StepOutcome, StepReport, WorkflowOutcome, WorkflowRun};
use crate::workflow::definition::{Handler, Workflow};
use crate::workflow::step::StepKind;
use tracing::{event, instrument, span, Instrument, Level};

impl<TData, Err> Workflow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  /// Executes every step against `ctx_data`.
  ///
  /// A failing required step aborts the run with its error. A failing
  /// best-effort step is recorded as [`StepOutcome::Degraded`] and the next
  /// step runs as if it had succeeded.
  #[instrument(
    name = "Workflow::run",
    skip_all,
    fields(workflow = self.name, num_steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<WorkflowRun, Err> {
    let mut reports = Vec::with_capacity(self.steps.len());

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();

      if let Some(skip_cond) = &step_def.skip_if {
        let should_skip = {
          let guard = ctx_data.read();
          skip_cond(&*guard)
        };
        if should_skip {
          event!(Level::INFO, step_name, "Step skipped by its skip condition.");
          reports.push(StepReport::new(step_name, StepOutcome::Skipped));
          continue;
        }
      }

      let handlers = match self.handlers.get(step_name) {
        Some(handlers) if !handlers.is_empty() => handlers,
        _ => match step_def.kind {
          StepKind::BestEffort => {
            event!(Level::DEBUG, step_name, "Best-effort step has no handlers, skipping.");
            reports.push(StepReport::new(step_name, StepOutcome::Skipped));
            continue;
          }
          StepKind::Required => {
            event!(Level::ERROR, step_name, "Required step has no handlers.");
            return Err(Err::from(WorkflowError::HandlerMissing {
              step_name: step_def.name.clone(),
            }));
          }
        },
      };

      let step_span = span!(
        Level::INFO,
        "workflow_step",
        step_name,
        step_index = step_idx,
        kind = ?step_def.kind
      );

      match run_handlers(handlers, &ctx_data).instrument(step_span).await {
        Ok(StepControl::Continue) => {
          reports.push(StepReport::new(step_name, StepOutcome::Completed));
        }
        Ok(StepControl::Stop) => {
          event!(Level::INFO, step_name, "Workflow stopped by a handler.");
          reports.push(StepReport::new(step_name, StepOutcome::Completed));
          return Ok(WorkflowRun {
            outcome: WorkflowOutcome::Stopped,
            steps: reports,
          });
        }
        Err(e) => match step_def.kind {
          StepKind::Required => {
            event!(Level::ERROR, step_name, error = %e, "Required step failed.");
            return Err(e);
          }
          StepKind::BestEffort => {
            event!(Level::WARN, step_name, error = %e, "Best-effort step failed, continuing.");
            reports.push(StepReport::new(
              step_name,
              StepOutcome::Degraded { reason: e.to_string() },
            ));
          }
        },
      }
    }

    event!(Level::DEBUG, "Workflow completed.");
    Ok(WorkflowRun {
      outcome: WorkflowOutcome::Completed,
      steps: reports,
    })
  }
}

async fn run_handlers<TData, Err>(
  handlers: &[Handler<TData, Err>],
  ctx_data: &ContextData<TData>,
) -> Result<StepControl, Err>
where
  TData: 'static + Send + Sync,
{
  for handler_fn in handlers {
    if handler_fn(ctx_data.clone()).await? == StepControl::Stop {
      return Ok(StepControl::Stop);
    }
  }
  Ok(StepControl::Continue)
}
