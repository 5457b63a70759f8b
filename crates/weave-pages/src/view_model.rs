//! View model
//!
//! [`ViewModel`] ties a data mapping to the template below a root element.
//!
//! Construction resolves the root selector first. When nothing matches, the
//! view model is created unmounted: no template is compiled, no property is
//! forwarded and the data is not checked. Otherwise the data is made
//! reactive, every top-level key becomes a forwarded property
//! ([`ViewModel::get`] / [`ViewModel::set`]) and the template is compiled
//! once.
//!
//! The initial data moves out of the options into the reactive root, so
//! [`ViewModel::data`] is the only copy.
//!
//! ## Example
//!
//! ```ignore
//! use weave_pages::{Options, ViewModel};
//! use weave_dom::{Document, HostDocument};
//! use serde_json::json;
//!
//! let document = Document::parse(r#"<div id="app"><p>Hello {{ user.name }}</p></div>"#);
//! let vm = ViewModel::new(&document, Options::new("#app").data(json!({ "user": { "name": "A" } })))?;
//!
//! vm.set_path("user.name", "B")?;
//! assert_eq!(document.text_content(&document.query_selector("p").unwrap()), "Hello B");
//! ```

use std::fmt;
use std::rc::Rc;

use indexmap::IndexSet;
use weave_dom::{Document, Event, HostDocument};
use weave_reactive::expression::{get_value, set_value};
use weave_reactive::{ReactiveObject, Value};

use crate::compiler::Compiler;
use crate::error::{BindError, BindResult};
use crate::options::{Methods, Options};

struct ViewModelInner<D: HostDocument> {
	document: D,
	el: Option<D::Node>,
	data: ReactiveObject,
	options: Options<D>,
	properties: IndexSet<String>,
}

/// A data mapping bound to a template.
///
/// Cloning creates a new handle to the **same** view model.
pub struct ViewModel<D: HostDocument = Document> {
	inner: Rc<ViewModelInner<D>>,
}

impl<D: HostDocument> ViewModel<D> {
	/// Binds `options.data` to the template below `options.el` in `document`.
	///
	/// # Errors
	///
	/// - [`BindError::DataNotAMapping`] if the root is found and `data` is
	///   neither a mapping nor null
	/// - [`BindError::UnknownDirective`] / [`BindError::MissingDirectiveArgument`]
	///   for malformed directive attributes
	/// - [`BindError::Reactive`] if a bound expression does not resolve
	/// - [`BindError::Dom`] if the document rejects a write
	pub fn new(document: &D, mut options: Options<D>) -> BindResult<Self> {
		let el = document.query_selector(&options.el);
		let data = match std::mem::take(&mut options.data) {
			serde_json::Value::Object(map) => ReactiveObject::from_map(map),
			_ if el.is_none() => ReactiveObject::new(),
			serde_json::Value::Null => ReactiveObject::new(),
			other => return Err(BindError::DataNotAMapping(json_type(&other))),
		};

		let properties = match el {
			Some(_) => data.keys().into_iter().collect(),
			None => {
				tracing::debug!(selector = %options.el, "root element not found; nothing to bind");
				IndexSet::new()
			}
		};

		let vm = Self {
			inner: Rc::new(ViewModelInner {
				document: document.clone(),
				el,
				data,
				options,
				properties,
			}),
		};

		if let Some(root) = vm.el() {
			tracing::debug!(selector = %vm.inner.options.el, properties = vm.inner.properties.len(), "compiling template");
			Compiler::new(vm.clone()).compile(root)?;
		}
		Ok(vm)
	}

	/// Reads a forwarded top-level property.
	pub fn get(&self, key: &str) -> BindResult<Value> {
		self.check_property(key)?;
		self.inner
			.data
			.get(key)
			.ok_or_else(|| BindError::UnknownProperty(key.to_owned()))
	}

	/// Writes a forwarded top-level property, notifying its watchers.
	pub fn set(&self, key: &str, value: impl Into<Value>) -> BindResult<()> {
		self.check_property(key)?;
		self.inner.data.set(key, value)?;
		Ok(())
	}

	fn check_property(&self, key: &str) -> BindResult<()> {
		if self.inner.properties.contains(key) {
			Ok(())
		} else {
			Err(BindError::UnknownProperty(key.to_owned()))
		}
	}

	/// Reads a dotted path from the data root.
	pub fn get_path(&self, expression: &str) -> BindResult<Value> {
		Ok(get_value(&self.inner.data, expression)?)
	}

	/// Writes a dotted path in the data root.
	pub fn set_path(&self, expression: &str, value: impl Into<Value>) -> BindResult<()> {
		set_value(&self.inner.data, expression, value)?;
		Ok(())
	}

	/// Calls the method registered as `name` with this view model as context.
	pub fn call_method(&self, name: &str, event: &Event) -> BindResult<()> {
		let method = self
			.methods()
			.get(name)
			.ok_or_else(|| BindError::UnknownMethod(name.to_owned()))?;
		method(self, event)
	}

	/// Returns true if the root element was found.
	pub fn is_mounted(&self) -> bool {
		self.inner.el.is_some()
	}

	/// The forwarded property names, in data order.
	pub fn properties(&self) -> impl Iterator<Item = &str> {
		self.inner.properties.iter().map(String::as_str)
	}

	/// The options the view model was created with.
	///
	/// Their `data` is null: it moved into [`ViewModel::data`].
	pub fn options(&self) -> &Options<D> {
		&self.inner.options
	}

	/// The reactive data root.
	pub fn data(&self) -> &ReactiveObject {
		&self.inner.data
	}

	/// The registered methods.
	pub fn methods(&self) -> &Methods<D> {
		&self.inner.options.methods
	}

	/// The root element, if mounted.
	pub fn el(&self) -> Option<&D::Node> {
		self.inner.el.as_ref()
	}

	/// The host document.
	pub fn document(&self) -> &D {
		&self.inner.document
	}
}

impl<D: HostDocument> Clone for ViewModel<D> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<D: HostDocument> fmt::Debug for ViewModel<D> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ViewModel")
			.field("el", &self.inner.options.el)
			.field("mounted", &self.is_mounted())
			.field("data", &self.inner.data)
			.field("methods", &self.inner.options.methods)
			.finish()
	}
}

fn json_type(value: &serde_json::Value) -> &'static str {
	match value {
		serde_json::Value::Null => "null",
		serde_json::Value::Bool(_) => "a boolean",
		serde_json::Value::Number(_) => "a number",
		serde_json::Value::String(_) => "a string",
		serde_json::Value::Array(_) => "an array",
		serde_json::Value::Object(_) => "a mapping",
	}
}
