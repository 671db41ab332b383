//! Typed errors for tree input and lazy subtree attachment.
//!
//! Two failure families, two types:
//!
//! 1. [`InputError`] — tree data from the outside world was rejected at the
//!    JSON boundary. Always recoverable: callers substitute an empty tree or
//!    keep the current one.
//! 2. [`AttachError`] — a lazy-attach precondition was violated. This is a
//!    caller bug; the tree is left untouched.

use std::fmt;

// ── Input errors ────────────────────────────────────────────────────────

/// External tree data could not be used.
#[derive(Debug)]
pub enum InputError {
    /// The text was not valid JSON, or an element had an unusable shape.
    Json(serde_json::Error),
    /// The document parsed, but its top level is not an array.
    NotAnArray {
        /// JSON kind found instead ("object", "string", ...).
        found: &'static str,
    },
}

// ── Attach errors ───────────────────────────────────────────────────────

/// A subtree could not be attached to the addressed item.
#[derive(Debug)]
pub enum AttachError {
    /// The item already has a child list; attaching twice is not allowed.
    AlreadyFetched {
        /// Path id of the addressed item.
        id: String,
    },
    /// The item is a leaf and never loads children.
    Leaf {
        /// Path id of the addressed item.
        id: String,
    },
}

// ── Display ─────────────────────────────────────────────────────────────

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed tree JSON: {err}"),
            Self::NotAnArray { found } => {
                write!(f, "tree data must be a JSON array, found {found}")
            }
        }
    }
}

impl fmt::Display for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyFetched { id } => write!(f, "item '{id}' already has its subtree"),
            Self::Leaf { id } => write!(f, "item '{id}' does not load children on demand"),
        }
    }
}

// ── std::error::Error ───────────────────────────────────────────────────

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::NotAnArray { .. } => None,
        }
    }
}

impl std::error::Error for AttachError {}

// ── From conversions ────────────────────────────────────────────────────

impl From<serde_json::Error> for InputError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────
