//! Reactive Runtime
//!
//! This module holds the per-thread state of the reactive system:
//!
//! 1. **Collection Stack**: the watcher currently collecting dependencies (the top
//!    of the stack), or nothing. Slot reads consult it to decide whether to record
//!    a dependency.
//! 2. **Notify Depth**: how many change notifications are currently nested on the
//!    call stack. Writes made from inside a watcher callback re-enter notification
//!    synchronously; the depth is bounded so a write cycle fails instead of
//!    exhausting the stack.
//!
//! Both are only ever touched through RAII guards, so they are restored on every
//! exit path, including errors and panics inside an evaluation.
//!
//! ## Example
//!
//! ```ignore
//! use weave_reactive::runtime::with_runtime;
//!
//! with_runtime(|rt| {
//!     assert!(!rt.is_collecting());
//! });
//! ```

use core::cell::{Cell, RefCell};

use crate::dep::Dep;
use crate::error::{ReactiveError, ReactiveResult};
use crate::watcher::Watcher;

/// Default bound on nested change notifications.
pub const DEFAULT_MAX_NOTIFY_DEPTH: usize = 100;

/// Per-thread reactive runtime.
///
/// There is one runtime per thread; reactive values are `!Send`, so a value and
/// the runtime tracking it always live on the same thread.
pub struct Runtime {
	/// Watchers currently collecting dependencies; the last one is the target
	collection_stack: RefCell<Vec<Watcher>>,
	/// Number of `Dep::notify` passes currently on the call stack
	notify_depth: Cell<usize>,
	/// Upper bound for `notify_depth`
	max_notify_depth: Cell<usize>,
}

impl Runtime {
	/// Create a new Runtime instance
	pub fn new() -> Self {
		Self {
			collection_stack: RefCell::new(Vec::new()),
			notify_depth: Cell::new(0),
			max_notify_depth: Cell::new(DEFAULT_MAX_NOTIFY_DEPTH),
		}
	}

	/// Get the watcher currently collecting dependencies
	pub fn current_target(&self) -> Option<Watcher> {
		self.collection_stack.borrow().last().cloned()
	}

	/// Whether a collection pass is in progress
	pub fn is_collecting(&self) -> bool {
		!self.collection_stack.borrow().is_empty()
	}

	pub(crate) fn push_target(&self, watcher: Watcher) {
		self.collection_stack.borrow_mut().push(watcher);
	}

	pub(crate) fn pop_target(&self) -> Option<Watcher> {
		self.collection_stack.borrow_mut().pop()
	}

	/// Record the current collection target, if any, as a subscriber of `dep`
	///
	/// This is called on every tracked slot read. Registration is not
	/// deduplicated: reading the same slot twice in one pass subscribes twice.
	pub fn track(&self, dep: &Dep) {
		if let Some(target) = self.current_target() {
			tracing::trace!(expression = target.expression(), "dependency collected");
			dep.append(target);
		}
	}

	/// Number of change notifications currently nested on the call stack
	pub fn notify_depth(&self) -> usize {
		self.notify_depth.get()
	}

	/// Upper bound on nested change notifications
	pub fn max_notify_depth(&self) -> usize {
		self.max_notify_depth.get()
	}

	/// Set the upper bound on nested change notifications
	pub fn set_max_notify_depth(&self, limit: usize) {
		self.max_notify_depth.set(limit);
	}
}

impl Default for Runtime {
	fn default() -> Self {
		Self::new()
	}
}

// Thread-local runtime instance
//
// Each thread gets its own runtime, which also isolates tests running on
// separate threads from each other.
thread_local! {
	static RUNTIME: Runtime = Runtime::new();
}

/// Get a reference to the thread's runtime
///
/// # Example
///
/// ```ignore
/// use weave_reactive::runtime::with_runtime;
///
/// let collecting = with_runtime(|rt| rt.is_collecting());
/// ```
pub fn with_runtime<F, R>(f: F) -> R
where
	F: FnOnce(&Runtime) -> R,
{
	RUNTIME.with(f)
}

/// Try to access the thread's runtime (safe version for Drop implementations)
///
/// Returns None if the thread-local storage has been destroyed.
pub(crate) fn try_with_runtime<F, R>(f: F) -> Option<R>
where
	F: FnOnce(&Runtime) -> R,
{
	RUNTIME.try_with(f).ok()
}

/// Set the bound on nested change notifications for the current thread.
pub fn set_max_notify_depth(limit: usize) {
	with_runtime(|rt| rt.set_max_notify_depth(limit));
}

/// Scope during which a watcher is the collection target.
///
/// The target is pushed on creation and popped on drop.
pub(crate) struct CollectionGuard {
	_private: (),
}

impl CollectionGuard {
	pub(crate) fn enter(watcher: Watcher) -> Self {
		with_runtime(|rt| rt.push_target(watcher));
		Self { _private: () }
	}
}

impl Drop for CollectionGuard {
	fn drop(&mut self) {
		let _ = try_with_runtime(|rt| rt.pop_target());
	}
}

/// One level of change notification.
pub(crate) struct NotifyGuard {
	_private: (),
}

impl NotifyGuard {
	pub(crate) fn enter() -> ReactiveResult<Self> {
		with_runtime(|rt| {
			let depth = rt.notify_depth.get() + 1;
			let limit = rt.max_notify_depth.get();
			if depth > limit {
				return Err(ReactiveError::NotifyDepthExceeded { limit });
			}
			rt.notify_depth.set(depth);
			Ok(Self { _private: () })
		})
	}
}

impl Drop for NotifyGuard {
	fn drop(&mut self) {
		let _ = try_with_runtime(|rt| rt.notify_depth.set(rt.notify_depth.get().saturating_sub(1)));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::observer::observe;
	use rstest::rstest;
	use serde_json::json;
	use serial_test::serial;

	fn watcher_on(key: &str) -> Watcher {
		let data = observe(json!({ "a": 1, "b": 2 }));
		let root = data.as_object().unwrap().clone();
		Watcher::new(&root, key, |_| Ok(())).unwrap()
	}

	#[rstest]
	fn test_runtime_collection_stack() {
		let runtime = Runtime::new();
		assert!(runtime.current_target().is_none());
		assert!(!runtime.is_collecting());

		let first = watcher_on("a");
		let second = watcher_on("b");

		runtime.push_target(first.clone());
		assert_eq!(runtime.current_target().unwrap().expression(), "a");

		runtime.push_target(second);
		assert_eq!(runtime.current_target().unwrap().expression(), "b");

		runtime.pop_target();
		assert_eq!(runtime.current_target().unwrap().expression(), "a");

		runtime.pop_target();
		assert!(!runtime.is_collecting());
	}

	#[rstest]
	fn test_track_without_target_is_noop() {
		let runtime = Runtime::new();
		let dep = Dep::new();

		runtime.track(&dep);

		assert!(dep.is_empty());
	}

	#[rstest]
	fn test_track_appends_current_target() {
		let runtime = Runtime::new();
		let dep = Dep::new();
		runtime.push_target(watcher_on("a"));

		runtime.track(&dep);
		runtime.track(&dep);

		assert_eq!(dep.len(), 2);
	}

	#[rstest]
	fn test_collection_guard_restores_on_drop() {
		let watcher = watcher_on("a");
		{
			let _guard = CollectionGuard::enter(watcher);
			assert!(with_runtime(|rt| rt.is_collecting()));
		}
		assert!(!with_runtime(|rt| rt.is_collecting()));
	}

	#[rstest]
	#[serial]
	fn test_notify_guard_bounds_depth() {
		set_max_notify_depth(2);

		let first = NotifyGuard::enter().unwrap();
		let second = NotifyGuard::enter().unwrap();
		assert_eq!(with_runtime(|rt| rt.notify_depth()), 2);
		assert!(matches!(
			NotifyGuard::enter(),
			Err(ReactiveError::NotifyDepthExceeded { limit: 2 })
		));

		drop(second);
		drop(first);
		assert_eq!(with_runtime(|rt| rt.notify_depth()), 0);

		set_max_notify_depth(DEFAULT_MAX_NOTIFY_DEPTH);
	}
}
