//! Snapshot-based change detection.

use blueprint_schema::SchemaNode;

/// Compares the live document against the last persisted snapshot.
///
/// The snapshot is an independent deep copy taken at load time and after
/// every successful save; it shares nothing with the live tree, so live
/// edits can never corrupt it. Equality is structural and order-sensitive:
/// reordering an object's properties counts as a change.
#[derive(Debug, Clone)]
pub struct DirtyTracker {
    snapshot: SchemaNode,
}

impl DirtyTracker {
    pub fn new(document: &SchemaNode) -> Self {
        Self {
            snapshot: document.clone(),
        }
    }

    /// True iff `current` has diverged from the snapshot.
    pub fn is_dirty(&self, current: &SchemaNode) -> bool {
        *current != self.snapshot
    }

    /// Replace the snapshot with a deep copy of `current`.
    pub fn mark_saved(&mut self, current: &SchemaNode) {
        self.snapshot = current.clone();
    }

    pub fn snapshot(&self) -> &SchemaNode {
        &self.snapshot
    }
}
