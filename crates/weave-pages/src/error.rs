//! Binding error types.

use thiserror::Error;
use weave_dom::DomError;
use weave_reactive::ReactiveError;

/// Result type for binding operations.
pub type BindResult<T> = Result<T, BindError>;

/// Errors raised while constructing or driving a view model.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BindError {
	/// Expression evaluation or notification failed.
	#[error(transparent)]
	Reactive(#[from] ReactiveError),

	/// The host document rejected an operation.
	#[error(transparent)]
	Dom(#[from] DomError),

	/// A `v-` attribute named a directive that does not exist.
	#[error("unknown directive 'v-{0}'")]
	UnknownDirective(String),

	/// `v-bind` or `v-on` without the `:<argument>` part.
	#[error("directive 'v-{0}' requires an argument, e.g. 'v-{0}:name'")]
	MissingDirectiveArgument(String),

	/// Access to a key that is not a top-level data key.
	#[error("unknown property '{0}'")]
	UnknownProperty(String),

	/// Call of a method that was not registered.
	#[error("unknown method '{0}'")]
	UnknownMethod(String),

	/// The configured data is not a mapping.
	#[error("data must be a mapping, got {0}")]
	DataNotAMapping(&'static str),

	/// Options could not be deserialized.
	#[error("invalid options: {0}")]
	Options(#[from] serde_json::Error),

	/// A user method failed.
	#[error("method failed: {0}")]
	Method(#[source] Box<dyn std::error::Error + 'static>),
}

impl BindError {
	/// Wraps an arbitrary error raised by a user method.
	pub fn method<E>(error: E) -> Self
	where
		E: std::error::Error + 'static,
	{
		Self::Method(Box::new(error))
	}
}
