//! Breadth-first ordering of recorded tree elements.

use std::collections::{HashMap, HashSet, VecDeque};

use super::TreeElement;

/// A node of the forest spanned by the recorded elements.
///
/// `order` is the element's first index in the recorded list, or `None` for
/// ancestors that were reached but never recorded.
#[derive(Debug)]
struct MemoNode<R> {
    element: Option<R>,
    order: Option<usize>,
    children: Vec<Self>,
}

impl<R: TreeElement> MemoNode<R> {
    const fn sentinel() -> Self {
        Self {
            element: None,
            order: None,
            children: Vec::new(),
        }
    }

    const fn new(element: R, order: Option<usize>) -> Self {
        Self {
            element: Some(element),
            order,
            children: Vec::new(),
        }
    }

    fn holds(&self, element: &R) -> bool {
        self.element.as_ref() == Some(element)
    }
}

/// Orders recorded elements so that every ancestor precedes its descendants.
#[derive(Debug)]
pub struct MemorySorter<'a, R> {
    unsorted: &'a [R],
    first_index: HashMap<&'a R, usize>,
    already_added: HashSet<R>,
    root: MemoNode<R>,
}

impl<'a, R: TreeElement> MemorySorter<'a, R> {
    /// Prepare to sort `unsorted`.
    #[must_use]
    pub fn new(unsorted: &'a [R]) -> Self {
        let mut first_index = HashMap::with_capacity(unsorted.len());
        for (index, element) in unsorted.iter().enumerate() {
            first_index.entry(element).or_insert(index);
        }
        Self {
            unsorted,
            first_index,
            already_added: HashSet::new(),
            root: MemoNode::sentinel(),
        }
    }

    /// Produce the ordered elements, each recorded element exactly once.
    #[must_use]
    pub fn sort(mut self) -> Vec<R> {
        for element in self.unsorted {
            if self.already_added.contains(element) {
                continue;
            }
            let path = self.path_from_root(element);
            self.graft(path);
        }
        self.breadth_first()
    }

    /// The chain of ancestors of `element`, outermost first, ending with
    /// `element` itself.
    fn path_from_root(&self, element: &R) -> Vec<(R, Option<usize>)> {
        let mut path = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(element.clone());
        while let Some(node) = current {
            if !seen.insert(node.clone()) {
                break;
            }
            current = node.parent();
            let order = self.first_index.get(&node).copied();
            path.push((node, order));
        }
        path.reverse();
        path
    }

    fn graft(&mut self, path: Vec<(R, Option<usize>)>) {
        let mut cursor = &mut self.root;
        for (element, order) in path {
            let position = cursor
                .children
                .iter()
                .position(|child| child.holds(&element));
            let index = position.unwrap_or_else(|| {
                cursor.children.push(MemoNode::new(element.clone(), order));
                cursor.children.len() - 1
            });
            if order.is_some() {
                self.already_added.insert(element);
            }
            let Some(next) = cursor.children.get_mut(index) else {
                return;
            };
            cursor = next;
        }
    }

    fn breadth_first(&self) -> Vec<R> {
        let mut ordered = Vec::with_capacity(self.already_added.len());
        let mut queue: VecDeque<&MemoNode<R>> = self.root.children.iter().collect();
        while let Some(node) = queue.pop_front() {
            if let Some(element) = node.order.and_then(|index| self.unsorted.get(index)) {
                ordered.push(element.clone());
            }
            queue.extend(node.children.iter());
        }
        ordered
    }
}
