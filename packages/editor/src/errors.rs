//! Error types for the editor.
//!
//! Mutations never fail; preconditions that do not hold degrade to no-ops
//! (see `mutations`). The only fallible surface is the JSON boundary where
//! documents cross to and from the persistence collaborator.

use thiserror::Error;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("malformed schema document: {0}")]
    Json(#[from] serde_json::Error),
}
