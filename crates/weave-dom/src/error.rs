//! Host document error types.

use thiserror::Error;

use crate::document::NodeId;

/// Result type for document operations.
pub type DomResult<T> = Result<T, DomError>;

/// Errors raised by a host document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DomError {
	/// The node handle does not belong to this document.
	#[error("node {0} does not exist in this document")]
	NodeNotFound(NodeId),

	/// An element-only operation was applied to another kind of node.
	#[error("node {node} is not an element; cannot {operation}")]
	NotAnElement {
		/// Node the operation was applied to.
		node: NodeId,
		/// Operation that was attempted.
		operation: &'static str,
	},

	/// An event listener failed.
	#[error("'{event_type}' listener failed: {source}")]
	Listener {
		/// Event being dispatched.
		event_type: String,
		/// Error returned by the listener.
		#[source]
		source: Box<dyn std::error::Error + 'static>,
	},
}
