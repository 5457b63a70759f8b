//! Reactive core error types.

use thiserror::Error;

/// Result type for reactive operations.
pub type ReactiveResult<T> = Result<T, ReactiveError>;

/// Errors raised while evaluating expressions or propagating changes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReactiveError {
	/// The expression was empty or only whitespace.
	#[error("empty expression")]
	EmptyExpression,

	/// A path segment does not exist on the mapping it was looked up in.
	#[error("cannot resolve '{segment}' in expression '{expression}': no such key")]
	MissingKey {
		/// Full expression being resolved.
		expression: String,
		/// Segment that was not found.
		segment: String,
	},

	/// A path segment was looked up on a value that is not a mapping.
	#[error("cannot resolve '{segment}' in expression '{expression}': parent is not a mapping")]
	NotAMapping {
		/// Full expression being resolved.
		expression: String,
		/// Segment that could not be resolved.
		segment: String,
	},

	/// Nested change notification went deeper than the runtime allows.
	#[error("change notification nested deeper than {limit} levels")]
	NotifyDepthExceeded {
		/// The configured limit.
		limit: usize,
	},

	/// A watcher callback failed.
	#[error("watcher callback failed: {0}")]
	Callback(#[source] Box<dyn std::error::Error + 'static>),
}

impl ReactiveError {
	/// Wraps an error raised inside a watcher callback.
	pub fn callback<E>(error: E) -> Self
	where
		E: std::error::Error + 'static,
	{
		Self::Callback(Box::new(error))
	}

	pub(crate) fn missing_key(expression: &str, segment: &str) -> Self {
		Self::MissingKey {
			expression: expression.to_owned(),
			segment: segment.to_owned(),
		}
	}

	pub(crate) fn not_a_mapping(expression: &str, segment: &str) -> Self {
		Self::NotAMapping {
			expression: expression.to_owned(),
			segment: segment.to_owned(),
		}
	}
}
