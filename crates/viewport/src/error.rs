//! Error types for fallible engine setup paths.
//!
//! Interaction paths (pointer, wheel, keys) never fail; they resolve to no-ops
//! reported through [`crate::tool::Transition::Ignored`] instead.

use crate::types::ObjectId;

/// Errors raised by registry and editor operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewportError {
    #[error("An object with id '{0}' is already in the scene")]
    DuplicateObject(ObjectId),

    #[error("No object with id '{0}' in the scene")]
    UnknownObject(ObjectId),
}
