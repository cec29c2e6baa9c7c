//! Builder DSL for partial updates of resource documents.
//!
//! Calling code describes nested property changes with closures; every block
//! receives a [`MapScope`] for the map it populates, so nesting is plain
//! lexical scoping. The result is an [`Overlay`], which is merged on top of a
//! live resource map with [`Overlay::apply_to`].
//!
//! ```rust
//! use bmc_dsl::dsl::{ArrayItem, Overlay};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), bmc_dsl::DslError> {
//! let overlay = Overlay::build(|system| {
//!     system.set("Name", "System1");
//!     system.object("Status", |status| {
//!         status.set("Health", "OK").set("State", "Enabled");
//!         Ok(())
//!     })?;
//!     system.array("BootOrder", [ArrayItem::from("Pxe"), ArrayItem::from("Hdd")])?;
//!     Ok(())
//! })?;
//!
//! let mut target = json!({"Status": {"HealthRollup": "OK"}})
//!     .as_object()
//!     .cloned()
//!     .unwrap_or_default();
//! overlay.apply_to(&mut target)?;
//! assert_eq!(
//!     serde_json::Value::Object(target),
//!     json!({
//!         "Status": {"HealthRollup": "OK", "Health": "OK", "State": "Enabled"},
//!         "Name": "System1",
//!         "BootOrder": ["Pxe", "Hdd"]
//!     })
//! );
//! # Ok(())
//! # }
//! ```

mod array;
mod scope;

pub use array::{ArrayItem, array_literal};
pub use scope::{Block, Entry, MapScope};

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{DslError, DslResult};
use crate::merge::{MergeExecutor, Plan};
use crate::node::{MapNode, TreeNode, flatten, flatten_map};
use crate::settings::MergeSettings;

/// A document tree built by the DSL, ready to be applied as a patch.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    root: TreeNode,
}

impl Overlay {
    /// Build a map-rooted overlay by running `builder` on an empty root map.
    ///
    /// # Errors
    ///
    /// Propagates the first [`DslError`] raised by `builder`.
    pub fn build<F>(builder: F) -> DslResult<Self>
    where
        F: FnOnce(&mut MapScope<'_>) -> DslResult<()>,
    {
        let mut root = MapNode::new();
        builder(&mut MapScope::new(&mut root))?;
        Ok(Self {
            root: TreeNode::Map(root),
        })
    }

    /// Wrap an existing tree. The root may have any shape, but only
    /// map-rooted overlays can be applied.
    #[must_use]
    pub const fn from_node(root: TreeNode) -> Self {
        Self { root }
    }

    /// Borrow the root node.
    #[must_use]
    pub const fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Returns `true` when the overlay can be applied as a patch.
    #[must_use]
    pub const fn is_map(&self) -> bool {
        self.root.is_map()
    }

    /// Render the overlay as a plain JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        flatten(&self.root)
    }

    /// Render the overlay as a plain JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`DslError::NotAMap`] when the root is not map-shaped.
    pub fn to_map(&self) -> DslResult<Map<String, Value>> {
        self.root_map().map(flatten_map)
    }

    /// Merge the overlay into `target` with default merge settings.
    ///
    /// # Errors
    ///
    /// Returns [`DslError::NotAMap`] for array- or primitive-rooted overlays
    /// and [`DslError::Merge`] when the merge engine rejects the overlay.
    pub fn apply_to(&self, target: &mut Map<String, Value>) -> DslResult<()> {
        self.apply_with(target, MergeSettings::default())
    }

    /// Merge the overlay into `target` using `settings`.
    ///
    /// The merge does not follow links: link properties are rewritten, but the
    /// resources they point at are left untouched.
    ///
    /// # Errors
    ///
    /// See [`Overlay::apply_to`].
    pub fn apply_with(
        &self,
        target: &mut Map<String, Value>,
        settings: MergeSettings,
    ) -> DslResult<()> {
        self.root_map()?;
        let plan = Plan::builder()
            .base(target)
            .overlay(&self.root)
            .settings(settings)
            .build()?;
        debug!(steps = plan.len(), "applying overlay");
        MergeExecutor::non_linking().execute(target, &plan)?;
        Ok(())
    }

    fn root_map(&self) -> DslResult<&MapNode> {
        self.root.as_map().ok_or_else(|| DslError::NotAMap {
            kind: self.root.kind(),
        })
    }
}

impl Default for Overlay {
    fn default() -> Self {
        Self {
            root: TreeNode::Map(MapNode::new()),
        }
    }
}

impl From<Value> for Overlay {
    fn from(value: Value) -> Self {
        Self::from_node(TreeNode::from(value))
    }
}

/// Deep-merge `src` into `dest`.
///
/// # Errors
///
/// Returns [`DslError::Merge`] when the merge engine rejects `src`, for
/// example because of a malformed `@removed` key.
pub fn merge_maps(dest: &mut Map<String, Value>, src: &Map<String, Value>) -> DslResult<()> {
    Overlay::from_node(TreeNode::Map(MapNode::build(src))).apply_to(dest)
}

/// Coerce the keys of `src` to strings. Values are kept as they are.
#[must_use]
pub fn make_type_safe_map<K, V, I>(src: I) -> Map<String, Value>
where
    K: ToString,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    src.into_iter()
        .map(|(key, value)| (key.to_string(), value.into()))
        .collect()
}

#[cfg(test)]
mod tests;
