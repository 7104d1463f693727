//! # Blueprint Editor
//!
//! Core editing engine for blueprint schema documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ UI collaborator: lists, dialogs, save/fetch │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditSession                         │
//! │  - Breadcrumb navigation over focus paths   │
//! │  - Mutations applied at the focus node      │
//! │  - Snapshot-based dirty tracking            │
//! │  - Stale-focus recovery                     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ schema: SchemaNode tree + path resolver     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core principles
//!
//! 1. **The document is a value**: every mutation consumes the current root
//!    and returns a new one; nothing inside the engine holds shared mutable
//!    state.
//! 2. **Invalid requests degrade to no-ops**: the caller is an interactive
//!    editor, and a failed edit must never take the session down. Only the
//!    JSON boundary can return an error.
//! 3. **Invariants hold after every operation**: unique sibling names,
//!    `required` always a subset of properties, kind-appropriate fields only.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blueprint_editor::{Document, EditSession, NodePath};
//!
//! let document = Document::from_json(payload)?;
//! let mut session = EditSession::new(document);
//!
//! session.navigate(NodePath::root().child("user"), "user");
//! session.add_property();
//! session.toggle_required("newProperty1");
//!
//! if session.is_dirty() {
//!     persist(session.document().to_json()?);
//!     session.mark_saved();
//! }
//! ```

mod config;
mod document;
mod errors;
mod mutations;
mod navigation;
mod session;
mod tracker;

pub use config::EditorOptions;
pub use document::{ApplyResult, Document};
pub use errors::{EditorError, EditorResult};
pub use mutations::{DefaultValue, FieldPatch, Mutation, NumberValue};
pub use navigation::{Breadcrumb, NavigationState};
pub use session::EditSession;
pub use tracker::DirtyTracker;

// Re-export the model types callers hold alongside the engine.
pub use blueprint_schema::{resolve, Kind, NodePath, PathStep, SchemaNode, StringFormat};
