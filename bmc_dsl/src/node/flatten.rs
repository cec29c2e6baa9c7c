//! Conversion of document trees back into plain JSON values.

use serde_json::{Map, Value};

use super::{ArrayNode, MapNode, PrimitiveNode, TreeNode};

/// Convert `node` into the JSON value it was built from.
#[must_use]
pub fn flatten(node: &TreeNode) -> Value {
    match node {
        TreeNode::Primitive(PrimitiveNode(value)) => value.clone(),
        TreeNode::Array(array) => Value::Array(flatten_array(array)),
        TreeNode::Map(map) => Value::Object(flatten_map(map)),
    }
}

/// Convert a map node into a JSON object map, keeping entry order.
#[must_use]
pub fn flatten_map(map: &MapNode) -> Map<String, Value> {
    map.iter()
        .map(|(key, node)| (key.clone(), flatten(node)))
        .collect()
}

/// Convert an array node into a vector of JSON values.
#[must_use]
pub fn flatten_array(array: &ArrayNode) -> Vec<Value> {
    array.iter().map(flatten).collect()
}
