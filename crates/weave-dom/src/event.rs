//! Events delivered to listeners.

use std::rc::Rc;

/// Result returned by event listeners.
pub type ListenerResult = Result<(), Box<dyn std::error::Error + 'static>>;

/// Type alias for event listener functions.
pub type EventListener = Rc<dyn Fn(&Event) -> ListenerResult + 'static>;

/// Wraps a closure as an [`EventListener`].
pub fn listener<F>(f: F) -> EventListener
where
	F: Fn(&Event) -> ListenerResult + 'static,
{
	Rc::new(f)
}

/// A synthetic event.
///
/// `value` carries the target's current value for input-like events, the way
/// `event.target.value` does in a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
	event_type: String,
	value: Option<String>,
}

impl Event {
	/// Creates an event of the given type without a target value.
	pub fn new(event_type: impl Into<String>) -> Self {
		Self {
			event_type: event_type.into(),
			value: None,
		}
	}

	/// Creates an `input` event carrying the target's new value.
	pub fn input(value: impl Into<String>) -> Self {
		Self::new("input").with_value(value)
	}

	/// Sets the target value.
	pub fn with_value(mut self, value: impl Into<String>) -> Self {
		self.value = Some(value.into());
		self
	}

	/// The event type, e.g. `click`.
	pub fn event_type(&self) -> &str {
		&self.event_type
	}

	/// The target's value, if the event carries one.
	pub fn value(&self) -> Option<&str> {
		self.value.as_deref()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_input_event_carries_value() {
		let event = Event::input("B");
		assert_eq!(event.event_type(), "input");
		assert_eq!(event.value(), Some("B"));
	}

	#[rstest]
	fn test_plain_event_has_no_value() {
		assert_eq!(Event::new("click").value(), None);
	}
}
