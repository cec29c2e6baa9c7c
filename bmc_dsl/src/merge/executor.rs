//! Execution of merge plans through a processor chain.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::{MergeError, MergeResult};

use super::processors::{
    DefaultsProcessor, LinkAgnosticProcessor, Outcome, PlanProcessor, ValueArrayProcessor,
};
use super::{MergeSteps, Operation, Step};

/// Runs [`MergeSteps`] against a base map.
pub struct MergeExecutor {
    chain: Vec<Box<dyn PlanProcessor>>,
}

impl MergeExecutor {
    /// Executor that rewrites link properties in place but never updates the
    /// resources on the other end of a link.
    #[must_use]
    pub fn non_linking() -> Self {
        Self::with_processors(vec![
            Box::new(ValueArrayProcessor),
            Box::new(LinkAgnosticProcessor),
        ])
    }

    /// Executor running `processors` in order before the default handling of
    /// plain assignments and removals.
    #[must_use]
    pub fn with_processors(mut processors: Vec<Box<dyn PlanProcessor>>) -> Self {
        processors.push(Box::new(DefaultsProcessor));
        Self { chain: processors }
    }

    /// Apply `plan` to `base`.
    ///
    /// Steps run in order; the first failing step aborts the execution and
    /// leaves earlier mutations in place.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::MissingContext`] when a nested step's object is
    /// gone and [`MergeError::Unhandled`] when no processor accepts an
    /// operation.
    pub fn execute(&self, base: &mut Map<String, Value>, plan: &MergeSteps) -> MergeResult<()> {
        debug!(steps = plan.len(), "executing merge plan");
        self.visit(base, plan)
    }

    fn visit(&self, context: &mut Map<String, Value>, steps: &MergeSteps) -> MergeResult<()> {
        for step in steps {
            match step {
                Step::Operation(operation) => self.perform(context, operation)?,
                Step::Nested { key, steps: nested } => {
                    let child = context
                        .get_mut(key)
                        .and_then(Value::as_object_mut)
                        .ok_or_else(|| MergeError::MissingContext { key: key.clone() })?;
                    self.visit(child, nested)?;
                }
            }
        }
        Ok(())
    }

    fn perform(&self, context: &mut Map<String, Value>, operation: &Operation) -> MergeResult<()> {
        trace!(?operation, "performing merge operation");
        for processor in &self.chain {
            if processor.perform(context, operation)? == Outcome::Done {
                return Ok(());
            }
        }
        Err(MergeError::Unhandled {
            operation: format!("{operation:?}"),
        })
    }
}

impl std::fmt::Debug for MergeExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MergeExecutor")
            .field("processors", &self.chain.len())
            .finish()
    }
}
