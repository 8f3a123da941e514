//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors cover structural problems with the tree being assembled.
///
/// Traversal never produces these: graph-shape problems met while walking
/// are folded into the `TraversalResult` instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found: '{0}'")]
    NotFound(String),

    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error("cycle detected in tree at node: '{0}'")]
    CycleDetected(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
