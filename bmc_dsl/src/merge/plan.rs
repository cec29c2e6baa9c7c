//! Planning of merge steps from a base map and an override tree.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{MergeError, MergeResult};
use crate::node::{ArrayNode, MapNode, TreeNode, flatten, flatten_array};
use crate::settings::MergeSettings;

use super::{LINK_KEY, MergeSteps, Operation, REMOVED_SUFFIX, link_uri};

/// Properties whose base values are never merged into.
const NON_MERGEABLE: &[&str] = &["Actions"];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ModifyMode {
    Apply,
    Remove,
    Skip,
}

/// Entry point for building merge plans.
#[derive(Debug)]
pub struct Plan;

impl Plan {
    /// Start building a plan.
    #[must_use]
    pub fn builder<'a>() -> PlanBuilder<'a> {
        PlanBuilder::default()
    }
}

/// Builder collecting the inputs of a merge plan.
#[derive(Debug, Default)]
pub struct PlanBuilder<'a> {
    base: Option<&'a Map<String, Value>>,
    overlay: Option<&'a TreeNode>,
    settings: MergeSettings,
}

impl<'a> PlanBuilder<'a> {
    /// Map the plan mutates.
    #[must_use]
    pub const fn base(mut self, base: &'a Map<String, Value>) -> Self {
        self.base = Some(base);
        self
    }

    /// Tree whose values win over the base.
    #[must_use]
    pub const fn overlay(mut self, overlay: &'a TreeNode) -> Self {
        self.overlay = Some(overlay);
        self
    }

    /// Settings steering how absent and non-mergeable properties are treated.
    #[must_use]
    pub const fn settings(mut self, settings: MergeSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Produce the merge steps.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::PlanBuilding`] when the base or the overlay is
    /// missing, [`MergeError::ExpectedObject`] when the overlay is not a map,
    /// and any error raised while planning individual properties.
    pub fn build(self) -> MergeResult<MergeSteps> {
        let base = self.base.ok_or(MergeError::PlanBuilding {
            what: "Base resource",
        })?;
        let overlay = self.overlay.ok_or(MergeError::PlanBuilding {
            what: "Override resource",
        })?;
        let map = ensure_map(overlay)?;
        let steps = Planner::new(base, self.settings).plan(map)?;
        debug!(steps = steps.len(), "planned merge");
        Ok(steps)
    }
}

struct Planner<'a> {
    base: &'a Map<String, Value>,
    settings: MergeSettings,
    steps: MergeSteps,
}

impl<'a> Planner<'a> {
    const fn new(base: &'a Map<String, Value>, settings: MergeSettings) -> Self {
        Self {
            base,
            settings,
            steps: MergeSteps::new(),
        }
    }

    fn plan(mut self, overlay: &MapNode) -> MergeResult<MergeSteps> {
        // Removals run after modifications so a key both modified and removed
        // in one overlay ends up removed.
        let mut removals = Vec::new();
        for (key, value) in overlay {
            match self.modify_mode(key, value)? {
                ModifyMode::Remove => removals.push(removed_key(key)),
                ModifyMode::Apply => self.plan_modification(key, value)?,
                ModifyMode::Skip => {}
            }
        }
        for key in removals {
            self.plan_removal(key);
        }
        self.remove_absent_properties(overlay);
        Ok(self.steps)
    }

    fn modify_mode(&self, key: &str, value: &TreeNode) -> MergeResult<ModifyMode> {
        if key.ends_with(REMOVED_SUFFIX) {
            return match value {
                TreeNode::Primitive(primitive) if primitive.is_true() => Ok(ModifyMode::Remove),
                TreeNode::Primitive(_) | TreeNode::Array(_) | TreeNode::Map(_) => {
                    Err(MergeError::InvalidRemoval { key: key.to_owned() })
                }
            };
        }
        if NON_MERGEABLE.contains(&key) && self.base.contains_key(key) {
            return self.check_non_mergeable(key);
        }
        Ok(ModifyMode::Apply)
    }

    fn check_non_mergeable(&self, key: &str) -> MergeResult<ModifyMode> {
        if self.settings.fail_for_non_mergeable {
            return Err(MergeError::NonMergeable {
                key: key.to_owned(),
                resource: resource_id(self.base),
                kind: "actions",
            });
        }
        warn!(key, resource = %resource_id(self.base), "skipping non-mergeable property");
        Ok(ModifyMode::Skip)
    }

    fn plan_modification(&mut self, key: &str, value: &TreeNode) -> MergeResult<()> {
        let base = self.base;
        match (base.get(key), value) {
            (Some(current), _) if link_uri(current).is_some() => {
                self.plan_link(key, current, &flatten(value));
            }
            (Some(Value::Array(current)), TreeNode::Array(items)) if is_link_array(current) => {
                self.plan_link_array(key, current, items);
            }
            (Some(Value::Array(_)), TreeNode::Array(items)) => {
                self.steps.add(Operation::UpdateValueArray {
                    key: key.to_owned(),
                    values: flatten_array(items),
                });
            }
            (Some(Value::Object(nested)), TreeNode::Map(map)) => {
                let steps = Self::new(nested, self.settings).plan(map)?;
                self.steps.add_nested(key, steps);
            }
            _ => self.steps.add(Operation::SetConstant {
                key: key.to_owned(),
                value: flatten(value),
            }),
        }
        Ok(())
    }

    fn plan_link(&mut self, key: &str, current: &Value, requested: &Value) {
        let old_uri = link_uri(current).map(str::to_owned);
        let new_uri = requested
            .get(LINK_KEY)
            .and_then(Value::as_str)
            .map(str::to_owned);
        let changed = old_uri != new_uri;
        if changed && let Some(uri) = old_uri {
            self.steps.add(Operation::LinkNeedsRemoval { uri });
        }
        self.steps.add(Operation::SetResourceLink {
            key: key.to_owned(),
            uri: new_uri.clone(),
        });
        if changed && let Some(uri) = new_uri {
            self.steps.add(Operation::LinkNeedsAdding { uri });
        }
    }

    fn plan_link_array(&mut self, key: &str, current: &[Value], requested: &ArrayNode) {
        for uri in current.iter().filter_map(link_uri) {
            self.steps.add(Operation::LinkNeedsRemoval {
                uri: uri.to_owned(),
            });
        }
        let uris: Vec<String> = flatten_array(requested)
            .iter()
            .filter_map(|item| item.get(LINK_KEY).and_then(Value::as_str))
            .map(str::to_owned)
            .collect();
        self.steps.add(Operation::SetListOfResourceLinks {
            key: key.to_owned(),
            uris: uris.clone(),
        });
        for uri in uris {
            self.steps.add(Operation::LinkNeedsAdding { uri });
        }
    }

    fn plan_removal(&mut self, key: &str) {
        let base = self.base;
        if let Some(uri) = base.get(key).and_then(link_uri) {
            self.steps.add(Operation::LinkNeedsRemoval {
                uri: uri.to_owned(),
            });
        }
        self.steps.add(Operation::RemoveProperty {
            key: key.to_owned(),
        });
    }

    fn remove_absent_properties(&mut self, overlay: &MapNode) {
        if !self.settings.remove_absent_properties {
            return;
        }
        let base = self.base;
        let absent: Vec<&String> = base
            .keys()
            .filter(|key| !overlay.contains_key(key) && key.as_str() != "Id")
            .collect();
        for key in absent {
            self.plan_removal(key);
        }
    }
}

fn ensure_map(node: &TreeNode) -> MergeResult<&MapNode> {
    node.as_map()
        .ok_or_else(|| MergeError::ExpectedObject { kind: node.kind() })
}

fn removed_key(key: &str) -> &str {
    key.strip_suffix(REMOVED_SUFFIX).unwrap_or(key)
}

fn is_link_array(items: &[Value]) -> bool {
    !items.is_empty() && items.iter().all(|item| link_uri(item).is_some())
}

/// Identify a resource for error messages: its `@odata.id`, or
/// `Name(Id)/UUID` when it has none.
pub(super) fn resource_id(resource: &Map<String, Value>) -> String {
    if let Some(id) = resource.get(LINK_KEY) {
        return render(Some(id));
    }
    format!(
        "{}({})/{}",
        render(resource.get("Name")),
        render(resource.get("Id")),
        render(resource.get("UUID"))
    )
}

fn render(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => String::from("null"),
    }
}
