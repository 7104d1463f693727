//! Path addressing into a schema tree.
//!
//! A path is an ordered list of traversal steps from the root: descend into
//! a named property of an object, or descend into the shared items
//! definition of an array. A path that no longer matches the tree (an
//! ancestor was removed or retyped underneath it) simply fails to resolve;
//! stale focus is an expected state, not an error.

use crate::node::SchemaNode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One traversal step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStep {
    /// Descend into `properties[name]` of an object node.
    Property(String),
    /// Descend into the items definition of an array node. Arrays carry one
    /// definition shared by all elements, so the step carries no index; any
    /// element index the UI attaches collapses to this same step.
    Items,
}

impl PathStep {
    pub fn property(name: impl Into<String>) -> PathStep {
        PathStep::Property(name.into())
    }
}

/// An ordered sequence of steps addressing one node under a root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath(Vec<PathStep>);

impl NodePath {
    /// The empty path: the root itself.
    pub fn root() -> NodePath {
        NodePath(Vec::new())
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// This path extended by a descent into `properties[name]`.
    pub fn child(&self, name: impl Into<String>) -> NodePath {
        let mut steps = self.0.clone();
        steps.push(PathStep::property(name));
        NodePath(steps)
    }

    /// This path extended by a descent into `items`.
    pub fn items(&self) -> NodePath {
        let mut steps = self.0.clone();
        steps.push(PathStep::Items);
        NodePath(steps)
    }

    /// The path one step up, or `None` at the root.
    pub fn parent(&self) -> Option<NodePath> {
        if self.0.is_empty() {
            None
        } else {
            Some(NodePath(self.0[..self.0.len() - 1].to_vec()))
        }
    }
}

impl From<Vec<PathStep>> for NodePath {
    fn from(steps: Vec<PathStep>) -> Self {
        NodePath(steps)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for step in &self.0 {
            match step {
                PathStep::Property(name) => write!(f, ".{name}")?,
                PathStep::Items => write!(f, "[]")?,
            }
        }
        Ok(())
    }
}

/// Walk `path` from `root`, returning the node it designates.
///
/// `None` means the path is stale: a property step hit a non-object or a
/// missing key, or an items step hit a non-array or an array with no items
/// definition yet.
pub fn resolve<'a>(root: &'a SchemaNode, path: &NodePath) -> Option<&'a SchemaNode> {
    let mut current = root;
    for step in path.steps() {
        current = match (step, current) {
            (PathStep::Property(name), SchemaNode::Object { properties, .. }) => {
                properties.get(name)?
            }
            (PathStep::Items, SchemaNode::Array { items, .. }) => items.as_deref()?,
            _ => return None,
        };
    }
    Some(current)
}

fn resolve_mut<'a>(root: &'a mut SchemaNode, path: &NodePath) -> Option<&'a mut SchemaNode> {
    let mut current = root;
    for step in path.steps() {
        current = match (step, current) {
            (PathStep::Property(name), SchemaNode::Object { properties, .. }) => {
                properties.get_mut(name)?
            }
            (PathStep::Items, SchemaNode::Array { items, .. }) => match items {
                Some(items) => items.as_mut(),
                None => return None,
            },
            _ => return None,
        };
    }
    Some(current)
}

/// Deep-copy `root`, apply `edit` to the node `path` designates on the copy,
/// and return the copy.
///
/// The whole document is cloned per edit, so the previous root and any saved
/// snapshot never alias the new one. A stale path leaves the copy untouched,
/// which makes every mutation built on top of this a safe no-op against
/// stale focus.
pub fn with_edit_at<F>(root: &SchemaNode, path: &NodePath, edit: F) -> SchemaNode
where
    F: FnOnce(&mut SchemaNode),
{
    let mut next = root.clone();
    if let Some(target) = resolve_mut(&mut next, path) {
        edit(target);
    }
    next
}
