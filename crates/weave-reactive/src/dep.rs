//! Dependency sets.
//!
//! A [`Dep`] is attached to every reactive slot and lists the watchers that read
//! the slot while collecting. Order is the order of collection; duplicates are
//! kept.

use core::cell::RefCell;
use core::fmt;

use crate::error::ReactiveResult;
use crate::runtime::NotifyGuard;
use crate::watcher::Watcher;

/// The watchers interested in one reactive slot.
#[derive(Default)]
pub struct Dep {
	subscribers: RefCell<Vec<Watcher>>,
}

impl Dep {
	/// Create an empty dependency set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a watcher to the end of the set.
	///
	/// No deduplication: a watcher appended twice is updated twice per notify.
	pub fn append(&self, watcher: Watcher) {
		self.subscribers.borrow_mut().push(watcher);
	}

	/// Call [`Watcher::update`] on every subscriber in insertion order.
	///
	/// Subscribers appended while this pass runs are not part of it. The first
	/// failing update aborts the pass and is returned.
	pub fn notify(&self) -> ReactiveResult<()> {
		let subscribers = self.subscribers.borrow().clone();
		if subscribers.is_empty() {
			return Ok(());
		}

		let _depth = NotifyGuard::enter()?;
		for watcher in &subscribers {
			watcher.update()?;
		}
		Ok(())
	}

	/// Number of registrations (duplicates included).
	pub fn len(&self) -> usize {
		self.subscribers.borrow().len()
	}

	/// Returns true if no watcher is registered.
	pub fn is_empty(&self) -> bool {
		self.subscribers.borrow().is_empty()
	}

	/// Snapshot of the registered watchers.
	pub fn subscribers(&self) -> Vec<Watcher> {
		self.subscribers.borrow().clone()
	}
}

impl fmt::Debug for Dep {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Dep")
			.field("subscribers", &self.len())
			.finish()
	}
}
