//! Graph error types.

use thiserror::Error;

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors raised by [`DependencyGraph`](crate::DependencyGraph).
///
/// Every variant signals misuse of the graph (an edge or lookup against a key
/// that was never inserted); none of them is expected during normal operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GraphError {
	/// The key has no node in the graph.
	#[error("missing graph node: {0}")]
	MissingNode(String),
}
