//! Error types for Trellis operations.
//!
//! Two kinds of failure exist:
//!
//! - [`Rejection`]: a repository operation was refused because of a
//!   capability, reference or structural rule. Nothing was changed and the
//!   caller can carry on; these come from ordinary interactive input such as
//!   a stale drag after a delete.
//! - [`TrellisError`]: a host-level failure such as using a destroyed
//!   editor, reading a malformed model, or I/O.

use std::io;

use thiserror::Error;

use trellis_core::identifier::Id;

use crate::export;

/// Reason a repository operation was refused.
///
/// A rejected operation leaves the snapshot untouched.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Rejection {
    #[error("unknown id `{0}`")]
    UnknownId(Id),

    #[error("the repository is read-only")]
    ReadOnly,

    #[error("element `{0}` is not movable")]
    NotMovable(Id),

    #[error("no selected element can be moved")]
    NothingToMove,

    #[error("invalid displacement ({dx}, {dy})")]
    InvalidDelta { dx: f32, dy: f32 },

    #[error("element `{0}` is not resizable")]
    NotResizable(Id),

    #[error("invalid size {width}x{height}, both dimensions must be positive")]
    InvalidSize { width: f32, height: f32 },

    #[error("invalid position ({x}, {y})")]
    InvalidPosition { x: f32, y: f32 },

    #[error("moving `{element}` under `{owner}` would create an ownership cycle")]
    Cycle { element: Id, owner: Id },

    #[error("element `{0}` does not accept children")]
    NotDroppable(Id),

    #[error("element `{0}` is not connectable")]
    NotConnectable(Id),

    #[error("element `{0}` cannot be connected to itself")]
    SelfConnection(Id),

    #[error("`{0}` is not editable")]
    NotEditable(Id),

    #[error("relationship `{0}` does not carry messages")]
    NoMessages(Id),

    #[error("relationship `{relationship}` has no message at index {index}")]
    UnknownMessage { relationship: Id, index: usize },
}

/// Errors raised when a [`DiagramModel`](crate::model::DiagramModel) violates
/// snapshot invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unsupported model version `{0}`")]
    UnsupportedVersion(String),

    #[error("duplicate id `{0}`")]
    DuplicateId(Id),

    #[error("element `{element}` references missing owner `{owner}`")]
    DanglingOwner { element: Id, owner: Id },

    #[error("ownership cycle through element `{0}`")]
    OwnershipCycle(Id),

    #[error("relationship `{relationship}` references missing element `{element}`")]
    MissingEndpoint { relationship: Id, element: Id },

    #[error("assessment references unknown id `{0}`")]
    UnknownAssessmentTarget(Id),
}

/// The main error type for Trellis operations.
#[derive(Debug, Error)]
pub enum TrellisError {
    #[error("the editor has already been destroyed")]
    Destroyed,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid model: {0}")]
    Model(#[from] ModelError),

    #[error("Export error: {0}")]
    Export(#[from] export::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation rejected: {0}")]
    Rejected(#[from] Rejection),
}
