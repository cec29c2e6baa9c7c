//! Typed intermediate representation for semi-structured resource data.
//!
//! A [`TreeNode`] is built by classifying a [`serde_json::Value`] recursively:
//! objects become [`MapNode`]s, arrays become [`ArrayNode`]s and every other
//! value, `null` included, becomes a [`PrimitiveNode`]. The `flatten` family
//! converts a tree back into plain JSON values and is the exact structural
//! inverse of [`TreeNode::build`].
//!
//! ```rust
//! use bmc_dsl::node::{TreeNode, flatten};
//! use serde_json::json;
//!
//! let value = json!({"Status": {"Health": "OK"}, "Links": [1, "two", null]});
//! let tree = TreeNode::build(&value);
//! assert!(tree.is_map());
//! assert_eq!(flatten(&tree), value);
//! ```

use indexmap::IndexMap;
use serde_json::{Map, Value};

mod flatten;

pub use flatten::{flatten, flatten_array, flatten_map};

/// A node of the document tree.
#[derive(Clone, Debug, PartialEq)]
pub enum TreeNode {
    /// A scalar value or `null`.
    Primitive(PrimitiveNode),
    /// An ordered, possibly heterogeneous sequence.
    Array(ArrayNode),
    /// A string-keyed mapping preserving insertion order.
    Map(MapNode),
}

impl TreeNode {
    /// Classify `value` into a tree, recursing through objects and arrays.
    #[must_use]
    pub fn build(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::Map(MapNode::build(map)),
            Value::Array(items) => Self::Array(ArrayNode::build(items)),
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                Self::Primitive(PrimitiveNode(value.clone()))
            }
        }
    }

    /// Returns `true` when the node is map-shaped.
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    /// Borrow the node as a map, if it is one.
    #[must_use]
    pub const fn as_map(&self) -> Option<&MapNode> {
        match self {
            Self::Map(map) => Some(map),
            Self::Array(_) | Self::Primitive(_) => None,
        }
    }

    /// Borrow the node as an array, if it is one.
    #[must_use]
    pub const fn as_array(&self) -> Option<&ArrayNode> {
        match self {
            Self::Array(array) => Some(array),
            Self::Map(_) | Self::Primitive(_) => None,
        }
    }

    /// Borrow the wrapped scalar, if the node is a primitive.
    #[must_use]
    pub const fn as_primitive(&self) -> Option<&Value> {
        match self {
            Self::Primitive(PrimitiveNode(value)) => Some(value),
            Self::Map(_) | Self::Array(_) => None,
        }
    }

    /// Short label used in error messages and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Primitive(_) => "primitive",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
        }
    }
}

impl From<Value> for TreeNode {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Map(map.into()),
            Value::Array(items) => Self::Array(items.into_iter().collect()),
            scalar @ (Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)) => {
                Self::Primitive(PrimitiveNode(scalar))
            }
        }
    }
}

impl From<MapNode> for TreeNode {
    fn from(map: MapNode) -> Self {
        Self::Map(map)
    }
}

impl From<ArrayNode> for TreeNode {
    fn from(array: ArrayNode) -> Self {
        Self::Array(array)
    }
}

/// Wrapper around a scalar JSON value.
///
/// Only [`TreeNode::build`] and the `From<Value>` conversion construct
/// primitives, so a `PrimitiveNode` never holds an object or an array.
#[derive(Clone, Debug, PartialEq)]
pub struct PrimitiveNode(Value);

impl PrimitiveNode {
    /// A primitive holding `null`.
    #[must_use]
    pub const fn null() -> Self {
        Self(Value::Null)
    }

    /// Borrow the wrapped scalar.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.0
    }

    /// Returns `true` when the wrapped scalar is the boolean `true`.
    #[must_use]
    pub const fn is_true(&self) -> bool {
        matches!(self.0, Value::Bool(true))
    }
}

/// Ordered sequence of tree nodes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArrayNode(Vec<TreeNode>);

impl ArrayNode {
    /// Create an empty array node.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Classify every element of `items`.
    #[must_use]
    pub fn build(items: &[Value]) -> Self {
        Self(items.iter().map(TreeNode::build).collect())
    }

    /// Append `node` to the end of the array.
    pub fn push(&mut self, node: impl Into<TreeNode>) {
        self.0.push(node.into());
    }

    /// Iterate over the elements in order.
    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, TreeNode> {
        self.0.iter()
    }

    /// Number of elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the array holds no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Value> for ArrayNode {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().map(TreeNode::from).collect())
    }
}

impl<'a> IntoIterator for &'a ArrayNode {
    type Item = &'a TreeNode;
    type IntoIter = std::slice::Iter<'a, TreeNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// String-keyed mapping of tree nodes in insertion order.
///
/// Order only affects how the map renders; merge semantics are keyed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapNode(IndexMap<String, TreeNode>);

impl MapNode {
    /// Create an empty map node.
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Classify every entry of `map`.
    #[must_use]
    pub fn build(map: &Map<String, Value>) -> Self {
        Self(
            map.iter()
                .map(|(key, value)| (key.clone(), TreeNode::build(value)))
                .collect(),
        )
    }

    /// Bind `node` to `key`, replacing and returning any previous entry.
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<TreeNode>) -> Option<TreeNode> {
        self.0.insert(key.into(), node.into())
    }

    /// Look up the node bound to `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TreeNode> {
        self.0.get(key)
    }

    /// Returns `true` when `key` is bound.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Copy every entry of `other` into this map, later entries winning.
    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// Iterate over the entries in insertion order.
    #[must_use]
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, TreeNode> {
        self.0.iter()
    }

    /// Iterate over the keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, TreeNode> {
        self.0.keys()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for MapNode {
    fn from(map: Map<String, Value>) -> Self {
        Self(
            map.into_iter()
                .map(|(key, value)| (key, TreeNode::from(value)))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a MapNode {
    type Item = (&'a String, &'a TreeNode);
    type IntoIter = indexmap::map::Iter<'a, String, TreeNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
