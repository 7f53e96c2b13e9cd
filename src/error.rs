//! Error type shared by `GraphDict` and `TwoWayDict`.

use thiserror::Error;

/// Errors returned by graph dictionary operations.
///
/// A failed operation never leaves the container partially modified.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum GraphError {
    /// The node is not present, or was purged by `reindex`.
    #[error("node not found")]
    NodeNotFound,

    /// `popitem` was called on an empty container.
    #[error("container is empty")]
    Empty,
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(GraphError::NodeNotFound.to_string(), "node not found");
        assert_eq!(GraphError::Empty.to_string(), "container is empty");
    }
}
