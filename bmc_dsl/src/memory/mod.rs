//! Resource memory: records resources while a tree is being built and hands
//! them back ordered parent-before-child.
//!
//! Elements only need to know their parent. Ordering is breadth first over the
//! forest spanned by the recorded elements, so every recorded ancestor comes
//! before its recorded descendants, and siblings keep the order in which their
//! branches were first reached.

mod sorter;

use std::hash::Hash;

use tracing::{debug, trace};

pub use sorter::MemorySorter;

use crate::error::{MemoryError, MemoryResult};

/// A node in a parent-linked tree.
pub trait TreeElement: Clone + Eq + Hash {
    /// The element's parent, or `None` for a root.
    fn parent(&self) -> Option<Self>;
}

/// Records tree elements between [`ResourceMemory::open`] and
/// [`ResourceMemory::close`].
#[derive(Debug)]
pub struct ResourceMemory<R> {
    memory: Vec<R>,
    open: bool,
}

impl<R: TreeElement> Default for ResourceMemory<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: TreeElement> ResourceMemory<R> {
    /// A closed, empty memory.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            memory: Vec::new(),
            open: false,
        }
    }

    /// Start recording, discarding anything recorded before.
    pub fn open(&mut self) {
        self.memory.clear();
        self.open = true;
    }

    /// Stop recording. Recorded elements stay available.
    pub const fn close(&mut self) {
        self.open = false;
    }

    /// Returns `true` between [`ResourceMemory::open`] and
    /// [`ResourceMemory::close`].
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Record `resource` unconditionally. Duplicates are kept and resolved
    /// when ordering.
    pub fn record(&mut self, resource: R) {
        self.memory.push(resource);
    }

    /// Record `resource` if memory is open.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::NotOpen`] when memory is closed.
    pub fn remember(&mut self, resource: R) -> MemoryResult<R> {
        if !self.open {
            return Err(MemoryError::NotOpen);
        }
        trace!(recorded = self.memory.len() + 1, "remembering resource");
        self.memory.push(resource.clone());
        Ok(resource)
    }

    /// Elements in recording order, duplicates included.
    #[must_use]
    pub fn recorded(&self) -> &[R] {
        &self.memory
    }

    /// Recorded elements ordered parent-before-child, each at most once.
    #[must_use]
    pub fn fetch_ordered_resources(&self) -> Vec<R> {
        let ordered = MemorySorter::new(&self.memory).sort();
        debug!(
            recorded = self.memory.len(),
            ordered = ordered.len(),
            "ordered resource memory"
        );
        ordered
    }

    /// Open memory, run `builder`, close memory and return what `builder`
    /// remembered in parent-before-child order.
    ///
    /// Memory is closed again even when `builder` fails.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::AlreadyOpen`] when called while memory is open,
    /// and propagates errors returned by `builder`.
    pub fn memorize<F, E>(&mut self, builder: F) -> Result<Vec<R>, E>
    where
        F: FnOnce(&mut Self) -> Result<(), E>,
        E: From<MemoryError>,
    {
        if self.open {
            return Err(MemoryError::AlreadyOpen.into());
        }
        self.open();
        let outcome = builder(self);
        self.close();
        outcome?;
        Ok(self.fetch_ordered_resources())
    }
}

#[cfg(test)]
mod tests;
