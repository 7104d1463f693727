//! Document handle.
//!
//! A `Document` owns the live schema tree, a version counter, and the dirty
//! tracker. It is the unit the surrounding application loads, hands to an
//! `EditSession`, and persists when dirty.
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Edit … Edit → Save → Edit …
//!   ↓       ↓            ↓
//! JSON   Mutations   snapshot replaced, dirty clears
//! ```

use crate::errors::EditorResult;
use crate::mutations::Mutation;
use crate::tracker::DirtyTracker;
use blueprint_schema::{NodePath, SchemaNode};

/// Outcome of applying one mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyResult {
    /// Version after the apply; bumped only when the tree changed.
    pub version: u64,

    /// Whether the mutation changed the tree. No-ops report `false`.
    pub changed: bool,
}

/// An editable schema document.
#[derive(Debug, Clone)]
pub struct Document {
    root: SchemaNode,
    version: u64,
    tracker: DirtyTracker,
}

impl Document {
    /// Adopt an in-memory tree as a freshly loaded document.
    ///
    /// The tree is normalized first (required-set repair, canonical absent
    /// forms), and the snapshot is taken after that, so a just-loaded
    /// document is never dirty.
    pub fn new(mut root: SchemaNode) -> Self {
        root.normalize();
        let tracker = DirtyTracker::new(&root);
        Self {
            root,
            version: 0,
            tracker,
        }
    }

    /// Parse a document from the collaborator's JSON payload.
    pub fn from_json(source: &str) -> EditorResult<Self> {
        let root: SchemaNode = serde_json::from_str(source)?;
        Ok(Self::new(root))
    }

    /// Serialize the live tree for persistence. Property order survives the
    /// round trip.
    pub fn to_json(&self) -> EditorResult<String> {
        Ok(serde_json::to_string(&self.root)?)
    }

    pub fn root(&self) -> &SchemaNode {
        &self.root
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Apply a mutation at `focus`, adopting the returned root.
    pub fn apply(&mut self, mutation: &Mutation, focus: &NodePath) -> ApplyResult {
        let next = mutation.apply(&self.root, focus);
        let changed = next != self.root;
        if changed {
            self.version += 1;
            self.root = next;
        }
        tracing::trace!(version = self.version, changed, "mutation applied");
        ApplyResult {
            version: self.version,
            changed,
        }
    }

    /// Whether the live tree has diverged from the last saved snapshot.
    pub fn is_dirty(&self) -> bool {
        self.tracker.is_dirty(&self.root)
    }

    /// Record the live tree as persisted; dirty clears until the next edit.
    pub fn mark_saved(&mut self) {
        self.tracker.mark_saved(&self.root);
    }
}
