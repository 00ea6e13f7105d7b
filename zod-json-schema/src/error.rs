//! Error types for schema compilation.
//!
//! Most unsupported or unrepresentable constructs are not errors: they degrade
//! to an omitted field or a looser fragment. The variants here cover malformed
//! input graphs and failures raised by caller-supplied hooks.

use thiserror::Error;

use crate::def::NodeId;

/// Error returned by a caller-supplied override or post-process hook.
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while compiling a schema tree.
#[derive(Debug, Error)]
pub enum Error {
    /// A node id does not belong to the arena being compiled.
    #[error("node {0} does not exist in this schema arena")]
    UnknownNode(NodeId),

    /// A lazy node was reached before its target was bound.
    #[error("lazy node {0} was never bound to a target definition")]
    UnboundLazy(NodeId),

    /// `bind_lazy` was called on a node that is not lazy.
    #[error("node {0} is not a lazy node")]
    NotLazy(NodeId),

    /// An override or post-process hook failed.
    #[error("schema hook failed: {0}")]
    Hook(#[source] HookError),

    /// JSON (de)serialization of a fragment failed.
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Wrap a hook failure.
    pub fn hook(err: impl Into<HookError>) -> Self {
        Self::Hook(err.into())
    }
}

/// Result type alias for compilation.
pub type Result<T> = std::result::Result<T, Error>;
