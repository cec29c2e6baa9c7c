//! Array literals.

use serde_json::Value;

use crate::error::{DslError, DslResult};
use crate::node::{ArrayNode, MapNode, TreeNode};

use super::scope::{Block, MapScope};

/// One item of an array literal.
pub enum ArrayItem<'b> {
    /// A plain value: objects are classified into maps, everything else is
    /// wrapped as a primitive.
    Value(Value),
    /// A nested object populated by a block.
    Block(Block<'b>),
    /// A computed sequence spread into the array; `None` elements are dropped.
    Spread(Vec<Option<Value>>),
    /// The `<empty>` marker: an array explicitly declared empty. Only valid as
    /// the sole item.
    Empty,
    /// A nested array literal, which is not supported.
    Array(Vec<Self>),
}

impl<'b> ArrayItem<'b> {
    /// Item holding `value`.
    #[must_use]
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    /// Item holding a nested object populated by `block`.
    #[must_use]
    pub fn block<F>(block: F) -> Self
    where
        F: FnOnce(&mut MapScope<'_>) -> DslResult<()> + 'b,
    {
        Self::Block(Box::new(block))
    }

    /// Item spreading `values` into the array, skipping `None`s.
    #[must_use]
    pub fn spread<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<Value>>,
    {
        Self::Spread(values.into_iter().collect())
    }
}

impl std::fmt::Debug for ArrayItem<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Block(_) => f.write_str("Block(<block>)"),
            Self::Spread(values) => f.debug_tuple("Spread").field(values).finish(),
            Self::Empty => f.write_str("Empty"),
            Self::Array(items) => f.debug_tuple("Array").field(items).finish(),
        }
    }
}

impl From<Value> for ArrayItem<'_> {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for ArrayItem<'_> {
    fn from(value: &str) -> Self {
        Self::Value(Value::from(value))
    }
}

/// Build an array node from `items`, evaluated left to right.
///
/// `[Empty]` yields an empty array.
///
/// # Errors
///
/// Returns [`DslError::EmptyNotSole`] when [`ArrayItem::Empty`] appears next
/// to other items, [`DslError::NestedArray`] for [`ArrayItem::Array`], and any
/// error raised by a block item.
pub fn array_literal<'b, I>(items: I) -> DslResult<ArrayNode>
where
    I: IntoIterator<Item = ArrayItem<'b>>,
{
    let collected: Vec<ArrayItem<'b>> = items.into_iter().collect();
    let mut array = ArrayNode::new();
    if matches!(collected.as_slice(), [ArrayItem::Empty]) {
        return Ok(array);
    }
    for item in collected {
        append(&mut array, item)?;
    }
    Ok(array)
}

fn append(array: &mut ArrayNode, item: ArrayItem<'_>) -> DslResult<()> {
    match item {
        ArrayItem::Value(value) => array.push(TreeNode::from(value)),
        ArrayItem::Block(block) => {
            let mut nested = MapNode::new();
            block(&mut MapScope::new(&mut nested))?;
            array.push(nested);
        }
        ArrayItem::Spread(values) => {
            for value in values.into_iter().flatten() {
                array.push(TreeNode::from(value));
            }
        }
        ArrayItem::Empty => return Err(DslError::EmptyNotSole),
        ArrayItem::Array(_) => return Err(DslError::NestedArray),
    }
    Ok(())
}
