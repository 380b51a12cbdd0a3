//! Tree of rendered field wrappers
//!
//! Each visible field is a node in an arena keyed by [`NodeId`]. A node's
//! children are the related fields of the option currently selected on it.
//! Ids are handed out from a monotonically increasing counter and never reused,
//! so a stale id simply stops resolving once its subtree is removed.

use super::schema::Field;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Stable identifier of a wrapper node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// A rendered field plus the fields it has spawned
#[derive(Debug, Clone)]
pub struct Wrapper {
    pub field: Arc<Field>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct WrapperTree {
    nodes: HashMap<NodeId, Wrapper>,
    roots: Vec<NodeId>,
    next_id: u64,
}

impl WrapperTree {
    /// Build a forest with one childless root per field, preserving order
    pub fn from_fields(fields: impl IntoIterator<Item = Arc<Field>>) -> Self {
        let mut tree = Self::default();
        for field in fields {
            let id = tree.insert(field, None);
            tree.roots.push(id);
        }
        tree
    }

    fn insert(&mut self, field: Arc<Field>, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            Wrapper {
                field,
                parent,
                children: Vec::new(),
            },
        );
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Wrapper> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|w| w.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|w| w.parent)
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nesting level, 0 for roots
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent(parent);
        }
        depth
    }

    /// Visible nodes in render order (pre-order, children after their parent)
    pub fn visible(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    /// Names of all visible fields
    pub fn visible_names(&self) -> BTreeSet<&str> {
        self.nodes.values().map(|w| w.field.name.as_str()).collect()
    }

    /// Drop every descendant of `id`, leaving `id` itself with no children.
    /// Returns the number of nodes removed.
    pub fn clear_children(&mut self, id: NodeId) -> usize {
        let children = match self.nodes.get_mut(&id) {
            Some(wrapper) => std::mem::take(&mut wrapper.children),
            None => return 0,
        };
        children
            .into_iter()
            .map(|child| self.remove_subtree(child))
            .sum()
    }

    fn remove_subtree(&mut self, id: NodeId) -> usize {
        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(wrapper) = self.nodes.remove(&current) {
                stack.extend(wrapper.children);
                removed += 1;
            }
        }
        removed
    }

    /// Replace the children of `id` with fresh wrappers for `fields`.
    /// Returns the new child ids in order, or an empty list if `id` is gone.
    pub fn replace_children(&mut self, id: NodeId, fields: &[Arc<Field>]) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        self.clear_children(id);
        let new_children: Vec<NodeId> = fields
            .iter()
            .map(|field| self.insert(Arc::clone(field), Some(id)))
            .collect();
        if let Some(wrapper) = self.nodes.get_mut(&id) {
            wrapper.children = new_children.clone();
        }
        new_children
    }
}
