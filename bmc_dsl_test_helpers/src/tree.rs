//! Resource tree fixtures.

use bmc_dsl::Resource;
use serde_json::json;

/// A small tree: `root` with children `child1` and `child2`, and `grandchild`
/// below `child2`.
#[derive(Clone, Debug)]
pub struct SampleTree {
    /// Root resource.
    pub root: Resource,
    /// First child of `root`.
    pub child1: Resource,
    /// Second child of `root`.
    pub child2: Resource,
    /// Child of `child2`.
    pub grandchild: Resource,
}

impl SampleTree {
    /// Build the tree. Every resource carries its name as the `Name` property.
    #[must_use]
    pub fn new() -> Self {
        let root = named("root");
        let child1 = named("child1");
        let child2 = named("child2");
        let grandchild = named("grandchild");
        root.append(&child1);
        root.append(&child2);
        child2.append(&grandchild);
        Self {
            root,
            child1,
            child2,
            grandchild,
        }
    }
}

impl Default for SampleTree {
    fn default() -> Self {
        Self::new()
    }
}

/// A resource whose `Name` property matches its name.
#[must_use]
pub fn named(name: &str) -> Resource {
    let data = json!({ "Name": name });
    Resource::with_data(name, data.as_object().cloned().unwrap_or_default())
}

/// Names of `resources`, in order.
#[must_use]
pub fn names(resources: &[Resource]) -> Vec<String> {
    resources
        .iter()
        .map(|resource| resource.name().to_owned())
        .collect()
}

/// Position of `resource` in `resources`.
#[must_use]
pub fn position(resources: &[Resource], resource: &Resource) -> Option<usize> {
    resources.iter().position(|candidate| candidate == resource)
}
