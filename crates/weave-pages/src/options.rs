//! View model construction options
//!
//! The root selector and the data mapping are plain configuration and can be
//! deserialized. Methods are closures and are registered in code.
//!
//! ## Example
//!
//! ```ignore
//! use weave_pages::Options;
//!
//! let options = Options::from_json(r##"{ "el": "#app", "data": { "user": { "name": "A" } } }"##)?
//!     .method("rename", |vm, event| vm.set_path("user.name", event.value().unwrap_or_default()));
//! ```

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::Deserialize;
use weave_dom::{Document, Event, HostDocument};

use crate::error::BindResult;
use crate::view_model::ViewModel;

/// A named method, called with the view model as context and the triggering
/// event.
pub type Method<D = Document> = Rc<dyn Fn(&ViewModel<D>, &Event) -> BindResult<()> + 'static>;

/// Methods by name, in registration order.
pub struct Methods<D: HostDocument = Document> {
	entries: IndexMap<String, Method<D>>,
}

impl<D: HostDocument> Methods<D> {
	/// Creates an empty method table.
	pub fn new() -> Self {
		Self {
			entries: IndexMap::new(),
		}
	}

	/// Registers `method` under `name`, replacing any previous one.
	pub fn insert(&mut self, name: impl Into<String>, method: Method<D>) {
		self.entries.insert(name.into(), method);
	}

	/// The method registered under `name`.
	pub fn get(&self, name: &str) -> Option<Method<D>> {
		self.entries.get(name).cloned()
	}

	/// Returns true if `name` is registered.
	pub fn contains(&self, name: &str) -> bool {
		self.entries.contains_key(name)
	}

	/// Registered names in registration order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	/// Number of registered methods.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if no method is registered.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<D: HostDocument> Default for Methods<D> {
	fn default() -> Self {
		Self::new()
	}
}

impl<D: HostDocument> Clone for Methods<D> {
	fn clone(&self) -> Self {
		Self {
			entries: self.entries.clone(),
		}
	}
}

impl<D: HostDocument> fmt::Debug for Methods<D> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.names()).finish()
	}
}

#[derive(Debug, Deserialize)]
struct OptionsConfig {
	el: String,
	#[serde(default)]
	data: serde_json::Value,
}

/// Options for [`ViewModel::new`].
pub struct Options<D: HostDocument = Document> {
	/// Selector of the template root.
	pub el: String,
	/// Initial data; a mapping, or null for none.
	pub data: serde_json::Value,
	/// Methods available to `v-on` and [`ViewModel::call_method`].
	pub methods: Methods<D>,
}

impl<D: HostDocument> Options<D> {
	/// Creates options for the root matching `el`, with no data and no methods.
	pub fn new(el: impl Into<String>) -> Self {
		Self {
			el: el.into(),
			data: serde_json::Value::Null,
			methods: Methods::new(),
		}
	}

	/// Deserializes `el` and `data` from JSON.
	pub fn from_json(json: &str) -> BindResult<Self> {
		let config: OptionsConfig = serde_json::from_str(json)?;
		Ok(Self::from_config(config))
	}

	/// Deserializes `el` and `data` from an already parsed JSON value.
	pub fn from_value(value: serde_json::Value) -> BindResult<Self> {
		let config: OptionsConfig = serde_json::from_value(value)?;
		Ok(Self::from_config(config))
	}

	fn from_config(config: OptionsConfig) -> Self {
		Self {
			el: config.el,
			data: config.data,
			methods: Methods::new(),
		}
	}

	/// Sets the initial data.
	pub fn data(mut self, data: serde_json::Value) -> Self {
		self.data = data;
		self
	}

	/// Registers a method.
	pub fn method<F>(mut self, name: impl Into<String>, method: F) -> Self
	where
		F: Fn(&ViewModel<D>, &Event) -> BindResult<()> + 'static,
	{
		self.methods.insert(name, Rc::new(method));
		self
	}
}

impl<D: HostDocument> Clone for Options<D> {
	fn clone(&self) -> Self {
		Self {
			el: self.el.clone(),
			data: self.data.clone(),
			methods: self.methods.clone(),
		}
	}
}

impl<D: HostDocument> fmt::Debug for Options<D> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Options")
			.field("el", &self.el)
			.field("data", &self.data)
			.field("methods", &self.methods)
			.finish()
	}
}
