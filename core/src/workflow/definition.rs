// sellerdesk/src/workflow/definition.rs

//! The `Workflow<TData, Err>` struct and the methods used to assemble one.

use crate::error::WorkflowError;
use crate::workflow::context_data::ContextData;
use crate::workflow::control::StepControl;
use crate::workflow::step::{StepDef, StepKind};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A step handler: takes a handle to the shared context and resolves to a
/// flow signal or the workflow's error type.
///
/// Handlers must drop any lock guard on the context before awaiting.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<StepControl, Err>> + Send>>
    + Send
    + Sync,
>;

/// An ordered set of named steps over a context type `TData`.
///
/// `Err` must be constructible from [`WorkflowError`] so that configuration
/// problems discovered at run time surface through the same error type as
/// handler failures.
pub struct Workflow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  pub(crate) name: &'static str,
  pub(crate) steps: Vec<StepDef<TData>>,
  pub(crate) handlers: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Workflow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  pub fn new(name: &'static str, step_defs: &[(&str, StepKind)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(step_name, kind)| StepDef {
        name: (*step_name).to_string(),
        kind: *kind,
        skip_if: None,
      })
      .collect();

    Self {
      name,
      steps,
      handlers: HashMap::new(),
    }
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn step_names(&self) -> impl Iterator<Item = &str> {
    self.steps.iter().map(|s| s.name.as_str())
  }

  fn step_mut(&mut self, step_name: &str) -> &mut StepDef<TData> {
    let workflow = self.name;
    match self.steps.iter_mut().find(|s| s.name == step_name) {
      Some(step) => step,
      // A typo in a step name is a wiring bug, not a runtime condition.
      None => panic!(
        "sellerdesk setup error: step '{}' is not defined in workflow '{}'",
        step_name, workflow
      ),
    }
  }

  /// Attaches a handler to `step_name`. Several handlers on one step run in
  /// registration order.
  ///
  /// # Panics
  ///
  /// Panics if the step was not declared in [`Workflow::new`].
  pub fn on<F, UserErr>(&mut self, step_name: &str, handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static)
  where
    F: Future<Output = Result<StepControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.step_mut(step_name);
    let handler: Handler<TData, Err> = Box::new(move |ctx_data| {
      let user_fut = handler_fn(ctx_data);
      Box::pin(async move { user_fut.await.map_err(Into::into) })
    });
    self.handlers.entry(step_name.to_string()).or_default().push(handler);
  }

  /// Skips `step_name` whenever `condition` holds for the context at the
  /// moment the step is reached.
  ///
  /// # Panics
  ///
  /// Panics if the step was not declared in [`Workflow::new`].
  pub fn skip_when(&mut self, step_name: &str, condition: impl Fn(&TData) -> bool + Send + Sync + 'static) {
    self.step_mut(step_name).skip_if = Some(Arc::new(condition));
  }
}
