//! Edit session management.
//!
//! An `EditSession` bundles one document with the breadcrumb trail over it
//! and applies mutations at the current focus. It also owns the StaleFocus
//! policy: a focus path invalidated by an earlier edit or an external reload
//! drops the mutation and snaps navigation back to the nearest surviving
//! ancestor.

use crate::config::EditorOptions;
use crate::document::{ApplyResult, Document};
use crate::mutations::{FieldPatch, Mutation};
use crate::navigation::NavigationState;
use blueprint_schema::{resolve, NodePath, SchemaNode};

/// Single-user editing session over one document.
pub struct EditSession {
    document: Document,
    navigation: NavigationState,
    options: EditorOptions,
}

impl EditSession {
    pub fn new(document: Document) -> Self {
        Self::with_options(document, EditorOptions::default())
    }

    pub fn with_options(document: Document, options: EditorOptions) -> Self {
        let navigation = NavigationState::with_root_label(options.root_label.clone());
        Self {
            document,
            navigation,
            options,
        }
    }

    /// Select the node the UI is editing. Revisiting an open breadcrumb
    /// jumps back; a new path drills down.
    pub fn navigate(&mut self, path: NodePath, label: impl Into<String>) {
        self.navigation.navigate(path, label);
    }

    /// Apply a mutation at the current focus.
    ///
    /// A stale focus reports `changed = false`, leaves the document alone,
    /// and snaps the trail back to the nearest resolvable ancestor.
    pub fn apply(&mut self, mutation: Mutation) -> ApplyResult {
        if resolve(self.document.root(), self.navigation.focus()).is_none() {
            let stale = self.navigation.focus().clone();
            self.snap_to_valid();
            tracing::debug!(
                %stale,
                focus = %self.navigation.focus(),
                "stale focus, mutation dropped"
            );
            return ApplyResult {
                version: self.document.version(),
                changed: false,
            };
        }

        let focus = self.navigation.focus().clone();
        self.document.apply(&mutation, &focus)
    }

    /// Insert a fresh property on the focus object, named with the
    /// configured prefix.
    pub fn add_property(&mut self) -> ApplyResult {
        let prefix = self.options.property_prefix.clone();
        self.apply(Mutation::AddProperty {
            prefix: Some(prefix),
        })
    }

    pub fn remove_property(&mut self, name: impl Into<String>) -> ApplyResult {
        self.apply(Mutation::RemoveProperty { name: name.into() })
    }

    pub fn rename_property(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> ApplyResult {
        self.apply(Mutation::RenameProperty {
            from: from.into(),
            to: to.into(),
        })
    }

    pub fn update_field(&mut self, name: impl Into<String>, patch: FieldPatch) -> ApplyResult {
        self.apply(Mutation::UpdateField {
            name: name.into(),
            patch,
        })
    }

    pub fn toggle_required(&mut self, name: impl Into<String>) -> ApplyResult {
        self.apply(Mutation::ToggleRequired { name: name.into() })
    }

    pub fn update_description(&mut self, text: Option<String>) -> ApplyResult {
        self.apply(Mutation::UpdateDescription { text })
    }

    /// Adopt an externally reloaded document, keeping the trail where it
    /// still resolves.
    pub fn rebase(&mut self, document: Document) {
        self.document = document;
        self.snap_to_valid();
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn focus(&self) -> &NodePath {
        self.navigation.focus()
    }

    /// The node under focus, when the focus still resolves.
    pub fn focus_node(&self) -> Option<&SchemaNode> {
        resolve(self.document.root(), self.navigation.focus())
    }

    pub fn is_dirty(&self) -> bool {
        self.document.is_dirty()
    }

    pub fn mark_saved(&mut self) {
        self.document.mark_saved();
    }

    fn snap_to_valid(&mut self) {
        while resolve(self.document.root(), self.navigation.focus()).is_none() {
            if !self.navigation.pop() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> EditSession {
        let document = Document::from_json(r#"{"type":"object","properties":{}}"#).unwrap();
        EditSession::new(document)
    }

    #[test]
    fn session_starts_at_root_and_clean() {
        let session = session();
        assert!(session.focus().is_root());
        assert!(!session.is_dirty());
        assert_eq!(session.navigation().depth(), 1);
    }

    #[test]
    fn configured_prefix_names_generated_properties() {
        let document = Document::from_json(r#"{"type":"object","properties":{}}"#).unwrap();
        let options: EditorOptions =
            serde_json::from_str(r#"{"propertyPrefix": "property"}"#).unwrap();
        let mut session = EditSession::with_options(document, options);

        let result = session.add_property();
        assert!(result.changed);
        assert!(session
            .document()
            .root()
            .properties()
            .unwrap()
            .contains_key("property1"));
    }

    #[test]
    fn focus_node_tracks_navigation() {
        let mut session = session();
        session.add_property();
        session.navigate(NodePath::root().child("newProperty1"), "newProperty1");

        let node = session.focus_node().unwrap();
        assert_eq!(node.kind(), crate::Kind::String);
    }
}
