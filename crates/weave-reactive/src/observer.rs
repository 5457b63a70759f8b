//! Observer - the reactive transform
//!
//! [`observe`] turns plain JSON into reactive values. Every key of a mapping
//! becomes a [`Slot`]: reading it through [`Slot::get`] registers the runtime's
//! collection target in the slot's [`Dep`], writing it through
//! [`ReactiveObject::set`] stores the value and notifies that [`Dep`].
//!
//! ## Reassigning a mapping
//!
//! Writing a mapping to a key installs a fresh slot (and a fresh [`Dep`]) for
//! that key. Subscribers of the previous slot are notified of this write and
//! then orphaned: later writes to the key, or to fields of the new mapping, do
//! not reach them. Watchers created after the write subscribe to the new slots.
//!
//! ## Example
//!
//! ```ignore
//! use weave_reactive::observe;
//! use serde_json::json;
//!
//! let data = observe(json!({ "count": 0 }));
//! let root = data.as_object().unwrap();
//! root.set("count", 1)?;
//! assert_eq!(root.get("count").unwrap().as_i64(), Some(1));
//! ```

use core::cell::RefCell;
use core::fmt;

extern crate alloc;
use alloc::rc::Rc;

use indexmap::IndexMap;

use crate::dep::Dep;
use crate::error::ReactiveResult;
use crate::runtime::with_runtime;
use crate::value::Value;

/// Convert plain JSON into a reactive value.
///
/// Mappings become [`ReactiveObject`]s, recursively. Everything else is stored
/// as is.
pub fn observe(value: serde_json::Value) -> Value {
	match value {
		serde_json::Value::Null => Value::Null,
		serde_json::Value::Bool(b) => Value::Bool(b),
		serde_json::Value::Number(n) => Value::Number(n),
		serde_json::Value::String(s) => Value::String(s),
		serde_json::Value::Array(items) => Value::Array(items),
		serde_json::Value::Object(map) => Value::Object(ReactiveObject::from_map(map)),
	}
}

/// One intercepted property: its current value and its dependency set.
pub struct Slot {
	value: RefCell<Value>,
	dep: Dep,
}

impl Slot {
	fn new(value: Value) -> Rc<Self> {
		Rc::new(Self {
			value: RefCell::new(value),
			dep: Dep::new(),
		})
	}

	/// Read the value, registering the collection target if one is active.
	pub fn get(&self) -> Value {
		with_runtime(|rt| rt.track(&self.dep));
		self.get_untracked()
	}

	/// Read the value without tracking.
	pub fn get_untracked(&self) -> Value {
		self.value.borrow().clone()
	}

	/// The watchers subscribed to this slot.
	pub fn dep(&self) -> &Dep {
		&self.dep
	}
}

impl fmt::Debug for Slot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Slot")
			.field("value", &self.value.borrow())
			.field("dep", &self.dep)
			.finish()
	}
}

/// A reactive mapping.
///
/// Cloning creates a new handle to the **same** mapping. Equality of
/// [`Value::Object`] is identity of this handle's target.
#[derive(Clone, Default)]
pub struct ReactiveObject {
	slots: Rc<RefCell<IndexMap<String, Rc<Slot>>>>,
}

impl ReactiveObject {
	/// Create an empty reactive mapping.
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a reactive mapping from a plain JSON map, observing nested mappings.
	pub fn from_map(map: serde_json::Map<String, serde_json::Value>) -> Self {
		let slots = map
			.into_iter()
			.map(|(key, value)| (key, Slot::new(observe(value))))
			.collect();
		Self {
			slots: Rc::new(RefCell::new(slots)),
		}
	}

	/// The slot currently installed for `key`.
	pub fn slot(&self, key: &str) -> Option<Rc<Slot>> {
		self.slots.borrow().get(key).cloned()
	}

	/// Read `key`, tracking the dependency.
	///
	/// Returns `None` if the key is absent.
	pub fn get(&self, key: &str) -> Option<Value> {
		let slot = self.slot(key)?;
		Some(slot.get())
	}

	/// Write `key` and notify its subscribers.
	///
	/// A key that does not exist yet is defined as a new reactive slot; there is
	/// nobody to notify. Writing a mapping installs a fresh slot for the key (see
	/// the module documentation). Returns the first error raised by a notified
	/// watcher.
	pub fn set(&self, key: &str, value: impl Into<Value>) -> ReactiveResult<()> {
		let value = value.into();
		let Some(slot) = self.slot(key) else {
			self.slots.borrow_mut().insert(key.to_owned(), Slot::new(value));
			return Ok(());
		};

		if value.is_object() {
			self.slots
				.borrow_mut()
				.insert(key.to_owned(), Slot::new(value.clone()));
		}
		*slot.value.borrow_mut() = value;
		slot.dep.notify()
	}

	/// Returns true if `key` is present.
	pub fn contains_key(&self, key: &str) -> bool {
		self.slots.borrow().contains_key(key)
	}

	/// Keys in insertion order.
	pub fn keys(&self) -> Vec<String> {
		self.slots.borrow().keys().cloned().collect()
	}

	/// Number of keys.
	pub fn len(&self) -> usize {
		self.slots.borrow().len()
	}

	/// Returns true if the mapping has no keys.
	pub fn is_empty(&self) -> bool {
		self.slots.borrow().is_empty()
	}

	/// Returns true if both handles point to the same mapping.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.slots, &other.slots)
	}

	/// Plain JSON snapshot, read without tracking.
	pub fn to_json(&self) -> serde_json::Value {
		let map = self
			.slots
			.borrow()
			.iter()
			.map(|(key, slot)| (key.clone(), slot.get_untracked().to_json()))
			.collect();
		serde_json::Value::Object(map)
	}
}

impl fmt::Debug for ReactiveObject {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ReactiveObject")
			.field("keys", &self.keys())
			.finish()
	}
}
