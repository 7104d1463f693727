//! Breadcrumb navigation state.
//!
//! Tracks where in the tree the user is editing. The trail always starts at
//! the root entry; drilling into a new path appends a breadcrumb, revisiting
//! an open one truncates everything deeper (closing the tabs behind a
//! back-jump).

use crate::config::DEFAULT_ROOT_LABEL;
use blueprint_schema::NodePath;

/// A recorded, re-visitable focus path with a display label.
#[derive(Debug, Clone, PartialEq)]
pub struct Breadcrumb {
    pub path: NodePath,
    pub label: String,
}

/// Ordered trail of visited paths; the last entry is the focus.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationState {
    trail: Vec<Breadcrumb>,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::with_root_label(DEFAULT_ROOT_LABEL)
    }

    pub fn with_root_label(label: impl Into<String>) -> Self {
        Self {
            trail: vec![Breadcrumb {
                path: NodePath::root(),
                label: label.into(),
            }],
        }
    }

    /// Select a focus path.
    ///
    /// A path already on the trail truncates back to it (inclusive), keeping
    /// its original label; a new path is appended. Either way it becomes the
    /// focus.
    pub fn navigate(&mut self, path: NodePath, label: impl Into<String>) {
        if let Some(position) = self.trail.iter().position(|crumb| crumb.path == path) {
            self.trail.truncate(position + 1);
        } else {
            self.trail.push(Breadcrumb {
                path,
                label: label.into(),
            });
        }
    }

    /// The current focus path.
    pub fn focus(&self) -> &NodePath {
        &self.trail[self.trail.len() - 1].path
    }

    pub fn trail(&self) -> &[Breadcrumb] {
        &self.trail
    }

    pub fn depth(&self) -> usize {
        self.trail.len()
    }

    /// Drop the deepest breadcrumb; the root entry never leaves. Used by
    /// stale-focus recovery, not exposed to callers.
    pub(crate) fn pop(&mut self) -> bool {
        if self.trail.len() > 1 {
            self.trail.pop();
            true
        } else {
            false
        }
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_a_single_root_entry() {
        let navigation = NavigationState::new();
        assert_eq!(navigation.depth(), 1);
        assert!(navigation.focus().is_root());
        assert_eq!(navigation.trail()[0].label, "Root");
    }

    #[test]
    fn drill_down_appends_and_sets_focus() {
        let mut navigation = NavigationState::new();
        let path = NodePath::root().child("user");
        navigation.navigate(path.clone(), "user");

        assert_eq!(navigation.depth(), 2);
        assert_eq!(navigation.focus(), &path);
    }

    #[test]
    fn revisiting_an_open_crumb_truncates_and_keeps_its_label() {
        let mut navigation = NavigationState::new();
        let a = NodePath::root().child("a");
        let b = a.child("b");

        navigation.navigate(a.clone(), "A");
        navigation.navigate(b, "B");
        navigation.navigate(a.clone(), "");

        assert_eq!(navigation.depth(), 2);
        assert_eq!(navigation.focus(), &a);
        assert_eq!(navigation.trail()[1].label, "A");
    }

    #[test]
    fn navigating_to_root_collapses_the_trail() {
        let mut navigation = NavigationState::new();
        navigation.navigate(NodePath::root().child("a"), "A");
        navigation.navigate(NodePath::root(), "");

        assert_eq!(navigation.depth(), 1);
        assert!(navigation.focus().is_root());
    }

    #[test]
    fn pop_never_removes_the_root() {
        let mut navigation = NavigationState::new();
        navigation.navigate(NodePath::root().child("a"), "A");

        assert!(navigation.pop());
        assert!(!navigation.pop());
        assert_eq!(navigation.depth(), 1);
    }
}
