//! Merge engine applying an override tree onto a base resource map.
//!
//! Merging runs in two phases. [`Plan`] walks the override against the base
//! and records a tree of [`Step`]s without touching anything; a
//! [`MergeExecutor`] then performs the steps through a chain of processors,
//! mutating the base in place.
//!
//! Objects merge key by key, value arrays are replaced wholesale and every
//! other override value wins at the key it is bound to. Keys suffixed with
//! `@removed` delete the property they name.
//!
//! ```rust
//! use bmc_dsl::merge::{MergeExecutor, Plan};
//! use bmc_dsl::node::TreeNode;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), bmc_dsl::MergeError> {
//! let mut base = json!({"Status": {"State": "Enabled", "Health": "OK"}, "Oem": {}})
//!     .as_object()
//!     .cloned()
//!     .unwrap_or_default();
//! let overlay = TreeNode::build(&json!({"Status": {"Health": "Critical"}, "Oem@removed": true}));
//!
//! let plan = Plan::builder().base(&base).overlay(&overlay).build()?;
//! MergeExecutor::non_linking().execute(&mut base, &plan)?;
//!
//! assert_eq!(
//!     serde_json::Value::Object(base),
//!     json!({"Status": {"State": "Enabled", "Health": "Critical"}})
//! );
//! # Ok(())
//! # }
//! ```

mod executor;
mod plan;
mod processors;

pub use executor::MergeExecutor;
pub use plan::{Plan, PlanBuilder};
pub use processors::{Outcome, PlanProcessor};

use serde_json::Value;

/// Key that holds the target URI of a resource link.
pub const LINK_KEY: &str = "@odata.id";

/// Suffix marking an override key as a property removal.
pub const REMOVED_SUFFIX: &str = "@removed";

/// A single mutation of one map context.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Operation {
    /// Bind `value` to `key`, replacing whatever was there.
    SetConstant {
        /// Property to set.
        key: String,
        /// Replacement value.
        value: Value,
    },
    /// Replace the contents of the value array bound to `key`.
    UpdateValueArray {
        /// Property holding the array.
        key: String,
        /// New array contents.
        values: Vec<Value>,
    },
    /// Delete `key` from the context.
    RemoveProperty {
        /// Property to delete.
        key: String,
    },
    /// Point the link bound to `key` at `uri`, or clear it when `None`.
    SetResourceLink {
        /// Property holding the link.
        key: String,
        /// New link target.
        uri: Option<String>,
    },
    /// Replace the links bound to `key` with links to `uris`.
    SetListOfResourceLinks {
        /// Property holding the links.
        key: String,
        /// New link targets in order.
        uris: Vec<String>,
    },
    /// The resource at `uri` no longer links back to the merged resource.
    LinkNeedsRemoval {
        /// URI of the previously linked resource.
        uri: String,
    },
    /// The resource at `uri` gains a link back to the merged resource.
    LinkNeedsAdding {
        /// URI of the newly linked resource.
        uri: String,
    },
}

/// One entry of a merge plan.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// Mutate the current context.
    Operation(Operation),
    /// Descend into the object bound to `key` and run `steps` there.
    Nested {
        /// Key of the nested object in the current context.
        key: String,
        /// Steps planned for the nested object.
        steps: MergeSteps,
    },
}

/// Ordered list of merge steps for one map context.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MergeSteps(Vec<Step>);

impl MergeSteps {
    /// Create an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append an operation.
    pub fn add(&mut self, operation: Operation) {
        self.0.push(Step::Operation(operation));
    }

    /// Append nested steps for the object bound to `key`.
    pub fn add_nested(&mut self, key: impl Into<String>, steps: Self) {
        self.0.push(Step::Nested {
            key: key.into(),
            steps,
        });
    }

    /// Iterate over the steps in execution order.
    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.0.iter()
    }

    /// Number of steps at this level.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when there is nothing to do at this level.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a MergeSteps {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Returns the target URI when `value` is a resource link.
///
/// A link is an object whose only property is `@odata.id`.
#[must_use]
pub fn link_uri(value: &Value) -> Option<&str> {
    let map = value.as_object()?;
    if map.len() != 1 {
        return None;
    }
    map.get(LINK_KEY).and_then(Value::as_str)
}
