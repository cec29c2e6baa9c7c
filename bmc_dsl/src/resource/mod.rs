//! Shared resource handles.
//!
//! A [`Resource`] is a cheap, reference-counted handle onto a named JSON
//! document with a parent link and children. Equality and hashing follow
//! identity, not content, so two resources with the same properties remain
//! distinct in [`ResourceMemory`](crate::memory::ResourceMemory).

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

use serde_json::{Map, Value};
use tracing::debug;

use crate::dsl::{MapScope, Overlay};
use crate::error::DslResult;
use crate::memory::TreeElement;

struct Inner {
    name: String,
    data: RefCell<Map<String, Value>>,
    parent: RefCell<Weak<Self>>,
    children: RefCell<Vec<Resource>>,
}

/// A named document in the simulated resource tree.
#[derive(Clone)]
pub struct Resource(Rc<Inner>);

impl Resource {
    /// A resource with no properties.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_data(name, Map::new())
    }

    /// A resource backed by `data`.
    #[must_use]
    pub fn with_data(name: impl Into<String>, data: Map<String, Value>) -> Self {
        Self(Rc::new(Inner {
            name: name.into(),
            data: RefCell::new(data),
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
        }))
    }

    /// The resource's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Attach `child` below this resource, detaching it from any previous
    /// parent.
    pub fn append(&self, child: &Self) {
        if let Some(previous) = child.parent() {
            previous
                .0
                .children
                .borrow_mut()
                .retain(|sibling| sibling != child);
        }
        child.0.parent.replace(Rc::downgrade(&self.0));
        self.0.children.borrow_mut().push(child.clone());
    }

    /// The resource's parent, if it has one that is still alive.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0.parent.borrow().upgrade().map(Self)
    }

    /// Direct children in attachment order.
    #[must_use]
    pub fn children(&self) -> Vec<Self> {
        self.0.children.borrow().clone()
    }

    /// A snapshot of the resource's properties.
    #[must_use]
    pub fn data(&self) -> Map<String, Value> {
        self.0.data.borrow().clone()
    }

    /// Look up a property by slash-separated path. Numeric segments index
    /// into arrays.
    ///
    /// ```rust
    /// use bmc_dsl::resource::Resource;
    /// use serde_json::json;
    ///
    /// let data = json!({"Configurations": [{"TDP": 120}]});
    /// let processor = Resource::with_data("Cpu1", data.as_object().cloned().unwrap_or_default());
    /// assert_eq!(processor.traverse("Configurations/0/TDP"), Some(json!(120)));
    /// assert_eq!(processor.traverse("Configurations/1/TDP"), None);
    /// ```
    #[must_use]
    pub fn traverse(&self, path: &str) -> Option<Value> {
        let data = self.0.data.borrow();
        let mut segments = path.split('/').filter(|segment| !segment.is_empty());
        let first = segments.next()?;
        let mut current = data.get(first)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current.clone())
    }

    /// Merge `overlay` into the resource's properties.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`Overlay::apply_to`]; the resource is left
    /// unchanged when planning fails.
    pub fn apply(&self, overlay: &Overlay) -> DslResult<()> {
        debug!(resource = self.name(), "applying overlay to resource");
        overlay.apply_to(&mut self.0.data.borrow_mut())
    }

    /// Build an overlay with `builder` and merge it into the resource.
    ///
    /// # Errors
    ///
    /// Propagates errors raised by `builder` or by the merge.
    pub fn update<F>(&self, builder: F) -> DslResult<&Self>
    where
        F: FnOnce(&mut MapScope<'_>) -> DslResult<()>,
    {
        self.apply(&Overlay::build(builder)?)?;
        Ok(self)
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Resource {}

impl Hash for Resource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("name", &self.0.name)
            .field("children", &self.0.children.borrow().len())
            .finish_non_exhaustive()
    }
}

impl TreeElement for Resource {
    fn parent(&self) -> Option<Self> {
        Self::parent(self)
    }
}
