//! Watcher - a live binding between one expression and a callback
//!
//! A [`Watcher`] evaluates its expression once on construction while it is the
//! runtime's collection target, which subscribes it to every slot on the path.
//! Each [`update`](Watcher::update) re-evaluates the expression (without
//! collecting) and calls the callback when the result differs from the last
//! observed value.
//!
//! ## Example
//!
//! ```ignore
//! use weave_reactive::{Watcher, observe};
//! use serde_json::json;
//!
//! let data = observe(json!({ "count": 0 }));
//! let root = data.as_object().unwrap();
//!
//! let watcher = Watcher::new(root, "count", |value| {
//!     println!("count: {value}");
//!     Ok(())
//! })?;
//!
//! root.set("count", 1)?; // prints "count: 1"
//! root.set("count", 1)?; // equal value, nothing printed
//! ```

use core::cell::{Cell, RefCell};
use core::fmt;

extern crate alloc;
use alloc::boxed::Box;
use alloc::rc::Rc;

use crate::error::ReactiveResult;
use crate::expression;
use crate::observer::ReactiveObject;
use crate::runtime::CollectionGuard;
use crate::value::Value;

/// Type alias for watcher callbacks
type WatcherCallback = Box<dyn Fn(&Value) -> ReactiveResult<()> + 'static>;

struct WatcherInner {
	/// Data root the expression is resolved against
	root: ReactiveObject,
	/// Dotted path expression
	expression: String,
	/// Called with the new value when it changes
	callback: WatcherCallback,
	/// Last observed value
	old_value: RefCell<Value>,
	/// Number of evaluations, the initial one included
	evaluations: Cell<u64>,
}

/// A computation bound to one property-access expression.
///
/// Cloning creates a new handle to the **same** watcher. Watchers are kept
/// alive by the dependency sets they are registered in and have no teardown.
#[derive(Clone)]
pub struct Watcher {
	inner: Rc<WatcherInner>,
}

impl Watcher {
	/// Create a watcher and collect its dependencies.
	///
	/// The expression is evaluated once with this watcher as the collection
	/// target; the result becomes the initial old value. The callback is not
	/// called for the initial value.
	///
	/// # Errors
	///
	/// Returns the lookup error if the expression does not resolve. The
	/// collection target is restored either way.
	pub fn new<F>(root: &ReactiveObject, expression: impl Into<String>, callback: F) -> ReactiveResult<Self>
	where
		F: Fn(&Value) -> ReactiveResult<()> + 'static,
	{
		let watcher = Self {
			inner: Rc::new(WatcherInner {
				root: root.clone(),
				expression: expression.into(),
				callback: Box::new(callback),
				old_value: RefCell::new(Value::Null),
				evaluations: Cell::new(0),
			}),
		};

		let value = watcher.collect(|| watcher.evaluate())?;
		*watcher.inner.old_value.borrow_mut() = value;
		Ok(watcher)
	}

	/// Run `f` with this watcher as the collection target.
	///
	/// Every slot read inside `f` subscribes this watcher again, including slots
	/// it is already subscribed to.
	pub fn collect<R>(&self, f: impl FnOnce() -> R) -> R {
		let _guard = CollectionGuard::enter(self.clone());
		f()
	}

	fn evaluate(&self) -> ReactiveResult<Value> {
		self.inner.evaluations.set(self.inner.evaluations.get() + 1);
		expression::get_value(&self.inner.root, &self.inner.expression)
	}

	/// Re-evaluate and call the callback if the value changed.
	///
	/// The old value is replaced only after the callback succeeds.
	pub fn update(&self) -> ReactiveResult<()> {
		let new_value = self.evaluate()?;
		if new_value == *self.inner.old_value.borrow() {
			return Ok(());
		}

		tracing::debug!(
			expression = %self.inner.expression,
			value = %new_value,
			"watcher fired"
		);
		(self.inner.callback)(&new_value)?;
		*self.inner.old_value.borrow_mut() = new_value;
		Ok(())
	}

	/// The tracked expression.
	pub fn expression(&self) -> &str {
		&self.inner.expression
	}

	/// The last observed value.
	pub fn value(&self) -> Value {
		self.inner.old_value.borrow().clone()
	}

	/// How many times the expression has been evaluated.
	pub fn evaluations(&self) -> u64 {
		self.inner.evaluations.get()
	}

	/// Returns true if both handles point to the same watcher.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}
}

impl fmt::Debug for Watcher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Watcher")
			.field("expression", &self.inner.expression)
			.field("value", &self.inner.old_value.borrow())
			.field("evaluations", &self.inner.evaluations.get())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ReactiveError;
	use crate::observer::observe;
	use crate::runtime::with_runtime;
	use rstest::rstest;
	use serde_json::json;
	use std::cell::RefCell;
	use std::rc::Rc;

	fn root(data: serde_json::Value) -> ReactiveObject {
		observe(data).as_object().unwrap().clone()
	}

	fn recording(log: &Rc<RefCell<Vec<String>>>) -> impl Fn(&Value) -> ReactiveResult<()> + 'static {
		let log = log.clone();
		move |value| {
			log.borrow_mut().push(value.to_string());
			Ok(())
		}
	}

	#[rstest]
	fn test_watcher_collects_every_path_segment() {
		let data = root(json!({ "user": { "name": "A" } }));

		let watcher = Watcher::new(&data, "user.name", |_| Ok(())).unwrap();

		assert_eq!(watcher.value(), Value::from("A"));
		assert_eq!(data.slot("user").unwrap().dep().len(), 1);
		let user = data.get("user").unwrap();
		assert_eq!(user.as_object().unwrap().slot("name").unwrap().dep().len(), 1);
		assert!(!with_runtime(|rt| rt.is_collecting()));
	}

	#[rstest]
	fn test_watcher_fires_on_change_only() {
		let data = root(json!({ "count": 0 }));
		let log = Rc::new(RefCell::new(Vec::new()));
		let _watcher = Watcher::new(&data, "count", recording(&log)).unwrap();

		data.set("count", 1).unwrap();
		data.set("count", 1).unwrap();
		data.set("count", 2).unwrap();

		assert_eq!(*log.borrow(), vec!["1", "2"]);
	}

	#[rstest]
	fn test_update_does_not_collect() {
		let data = root(json!({ "count": 0 }));
		let _watcher = Watcher::new(&data, "count", |_| Ok(())).unwrap();

		data.set("count", 1).unwrap();
		data.set("count", 2).unwrap();

		assert_eq!(data.slot("count").unwrap().dep().len(), 1);
	}

	#[rstest]
	fn test_failed_construction_clears_target() {
		let data = root(json!({ "user": {} }));

		let result = Watcher::new(&data, "user.missing.deep", |_| Ok(()));

		assert!(matches!(result, Err(ReactiveError::MissingKey { .. })));
		assert!(!with_runtime(|rt| rt.is_collecting()));
	}

	#[rstest]
	fn test_explicit_collect_registers_again() {
		let data = root(json!({ "count": 0 }));
		let watcher = Watcher::new(&data, "count", |_| Ok(())).unwrap();

		watcher.collect(|| data.get("count"));

		assert_eq!(data.slot("count").unwrap().dep().len(), 2);
		assert_eq!(watcher.evaluations(), 1);
	}

	#[rstest]
	fn test_callback_error_keeps_old_value() {
		let data = root(json!({ "count": 0 }));
		let watcher = Watcher::new(&data, "count", |_| {
			Err(ReactiveError::callback(std::fmt::Error))
		})
		.unwrap();

		let result = data.set("count", 1);

		assert!(matches!(result, Err(ReactiveError::Callback(_))));
		assert_eq!(watcher.value(), Value::from(0));
		assert_eq!(data.get("count"), Some(Value::from(1)));
	}
}
