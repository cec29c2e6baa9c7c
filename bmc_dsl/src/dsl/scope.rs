//! Map scopes: the cursor a DSL block writes through.

use serde_json::Value;

use crate::error::{DslError, DslResult};
use crate::node::{MapNode, TreeNode};

use super::array::{ArrayItem, array_literal};

/// A nested block populating a fresh map.
pub type Block<'b> = Box<dyn FnOnce(&mut MapScope<'_>) -> DslResult<()> + 'b>;

/// Anything a key can be bound to.
pub enum Entry<'b> {
    /// A scalar, or a JSON value classified into a tree.
    Value(Value),
    /// A nested object populated by a block.
    Object(Block<'b>),
    /// An array literal.
    Array(Vec<ArrayItem<'b>>),
    /// The `<empty>` marker, which is only meaningful inside an array.
    Empty,
}

impl Entry<'_> {
    /// Short label used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Value(_) => "value",
            Self::Object(_) => "object",
            Self::Array(_) => "array",
            Self::Empty => "empty",
        }
    }
}

impl std::fmt::Debug for Entry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Object(_) => f.write_str("Object(<block>)"),
            Self::Array(items) => f.debug_tuple("Array").field(items).finish(),
            Self::Empty => f.write_str("Empty"),
        }
    }
}

impl From<Value> for Entry<'_> {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Write access to the map currently being built.
///
/// Binding a key that is already present replaces the previous entry.
#[derive(Debug)]
pub struct MapScope<'m> {
    map: &'m mut MapNode,
}

impl<'m> MapScope<'m> {
    /// Open a scope over `map`.
    #[must_use]
    pub const fn new(map: &'m mut MapNode) -> Self {
        Self { map }
    }

    /// Bind `value` to `key`. Scalars and `null` become primitives; objects
    /// and arrays are classified recursively.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.map.insert(key, TreeNode::from(value.into()));
        self
    }

    /// Bind `key` to a new object populated by `block`.
    ///
    /// # Errors
    ///
    /// Propagates the first error raised inside `block`; the key is left
    /// unbound in that case.
    pub fn object<F>(&mut self, key: impl Into<String>, block: F) -> DslResult<&mut Self>
    where
        F: FnOnce(&mut MapScope<'_>) -> DslResult<()>,
    {
        let mut nested = MapNode::new();
        block(&mut MapScope::new(&mut nested))?;
        self.map.insert(key, nested);
        Ok(self)
    }

    /// Bind `key` to the array built from `items`.
    ///
    /// # Errors
    ///
    /// Returns [`DslError::EmptyNotSole`] when `<empty>` is mixed with other
    /// items and [`DslError::NestedArray`] for nested array literals.
    pub fn array<'b, I>(&mut self, key: impl Into<String>, items: I) -> DslResult<&mut Self>
    where
        I: IntoIterator<Item = ArrayItem<'b>>,
    {
        let array = array_literal(items)?;
        self.map.insert(key, array);
        Ok(self)
    }

    /// Bind `key` to any [`Entry`].
    ///
    /// # Errors
    ///
    /// Returns [`DslError::EmptyOutsideArray`] for [`Entry::Empty`] and the
    /// errors of [`MapScope::object`] and [`MapScope::array`] otherwise.
    pub fn bind(&mut self, key: impl Into<String>, entry: Entry<'_>) -> DslResult<&mut Self> {
        match entry {
            Entry::Value(value) => Ok(self.set(key, value)),
            Entry::Object(block) => self.object(key, block),
            Entry::Array(items) => self.array(key, items),
            Entry::Empty => Err(DslError::EmptyOutsideArray { key: key.into() }),
        }
    }

    /// Returns `true` when `key` is bound in this scope.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Number of keys bound in this scope.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` when nothing is bound in this scope.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
