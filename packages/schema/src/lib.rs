//! # Blueprint Schema
//!
//! The data model for blueprint schema documents: a recursive tree of typed
//! nodes (`SchemaNode`) plus path addressing into that tree (`NodePath`).
//!
//! The editor crate mutates these values; this crate owns the shape, the
//! per-kind field sets, and the resolver. All types are plain serde values,
//! and a node round-trips through JSON with property order preserved.

pub mod node;
pub mod path;

pub use node::{Kind, PropertyMap, SchemaNode, StringFormat};
pub use path::{resolve, with_edit_at, NodePath, PathStep};
