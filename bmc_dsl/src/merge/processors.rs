//! Processors performing merge operations on a map context.
//!
//! Processors form a chain of responsibility: each one either performs an
//! operation or passes it on. The last processor in every chain is
//! [`DefaultsProcessor`], which rejects whatever nobody else handled.

use serde_json::{Map, Value, json};
use tracing::trace;

use crate::error::{MergeError, MergeResult};

use super::{LINK_KEY, Operation};

/// Whether a processor consumed an operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// The operation was performed.
    Done,
    /// The operation is left for the next processor.
    Pass,
}

/// A link in the executor's processor chain.
pub trait PlanProcessor {
    /// Perform `operation` on `context` or pass it on.
    ///
    /// # Errors
    ///
    /// Returns a [`MergeError`] when the operation is recognised but cannot be
    /// carried out.
    fn perform(&self, context: &mut Map<String, Value>, operation: &Operation)
    -> MergeResult<Outcome>;
}

/// Replaces the contents of value arrays.
#[derive(Debug, Default)]
pub(super) struct ValueArrayProcessor;

impl PlanProcessor for ValueArrayProcessor {
    fn perform(
        &self,
        context: &mut Map<String, Value>,
        operation: &Operation,
    ) -> MergeResult<Outcome> {
        let Operation::UpdateValueArray { key, values } = operation else {
            return Ok(Outcome::Pass);
        };
        match context.get_mut(key) {
            Some(Value::Array(items)) => {
                items.clear();
                items.extend(values.iter().cloned());
            }
            _ => {
                context.insert(key.clone(), Value::Array(values.clone()));
            }
        }
        Ok(Outcome::Done)
    }
}

/// Rewrites link properties without touching the resources they point at.
///
/// Back-link bookkeeping is ignored, which is what makes an executor
/// non-linking.
#[derive(Debug, Default)]
pub(super) struct LinkAgnosticProcessor;

impl PlanProcessor for LinkAgnosticProcessor {
    fn perform(
        &self,
        context: &mut Map<String, Value>,
        operation: &Operation,
    ) -> MergeResult<Outcome> {
        match operation {
            Operation::SetResourceLink { key, uri } => {
                let link = uri.as_ref().map_or(Value::Null, |target| link_to(target));
                context.insert(key.clone(), link);
            }
            Operation::SetListOfResourceLinks { key, uris } => {
                let links = uris.iter().map(|target| link_to(target)).collect();
                context.insert(key.clone(), Value::Array(links));
            }
            Operation::LinkNeedsRemoval { uri } | Operation::LinkNeedsAdding { uri } => {
                trace!(uri = %uri, "ignoring back-link update");
            }
            Operation::SetConstant { .. }
            | Operation::UpdateValueArray { .. }
            | Operation::RemoveProperty { .. } => return Ok(Outcome::Pass),
        }
        Ok(Outcome::Done)
    }
}

/// Plain property assignment and removal; rejects everything else.
#[derive(Debug, Default)]
pub(super) struct DefaultsProcessor;

impl PlanProcessor for DefaultsProcessor {
    fn perform(
        &self,
        context: &mut Map<String, Value>,
        operation: &Operation,
    ) -> MergeResult<Outcome> {
        match operation {
            Operation::SetConstant { key, value } => {
                context.insert(key.clone(), value.clone());
            }
            Operation::RemoveProperty { key } => {
                context.shift_remove(key);
            }
            other => {
                return Err(MergeError::Unhandled {
                    operation: format!("{other:?}"),
                });
            }
        }
        Ok(Outcome::Done)
    }
}

fn link_to(uri: &str) -> Value {
    json!({ LINK_KEY: uri })
}
