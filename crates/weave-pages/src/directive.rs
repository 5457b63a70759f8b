//! Directives and their handlers
//!
//! A directive attribute has the form `v-<name>` or `v-<name>:<argument>`.
//! [`Directive::parse`] turns the attribute name into a [`Directive`];
//! [`Directive::bind`] performs the first render and wires the watchers and
//! listeners that keep the node in sync afterwards.

use std::fmt;
use std::rc::Rc;

use weave_dom::{Event, HostDocument, listener};
use weave_reactive::expression::{get_content_value, get_value, placeholders, set_value};
use weave_reactive::{ReactiveError, ReactiveResult, Value, Watcher};

use crate::error::{BindError, BindResult};
use crate::updater;
use crate::view_model::ViewModel;

/// Attribute prefix that marks a directive.
pub const DIRECTIVE_PREFIX: &str = "v-";

/// A parsed directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
	/// `v-text`: text content follows the expression.
	Text,
	/// `v-html`: markup content follows the expression.
	Html,
	/// `v-model`: two-way binding of an input's value.
	Model,
	/// `v-bind:<attr>`: an attribute follows the expression.
	Bind(String),
	/// `v-on:<event>`: the event calls a method.
	On(String),
}

impl Directive {
	/// Parses an attribute name.
	///
	/// Returns `Ok(None)` for attributes without the `v-` prefix. The argument
	/// is everything after the first `:`.
	pub fn parse(attribute: &str) -> BindResult<Option<Self>> {
		let Some(body) = attribute.strip_prefix(DIRECTIVE_PREFIX) else {
			return Ok(None);
		};
		let (name, argument) = match body.split_once(':') {
			Some((name, argument)) => (name, Some(argument)),
			None => (body, None),
		};
		let argument = |name: &str| {
			argument
				.filter(|argument| !argument.is_empty())
				.map(str::to_owned)
				.ok_or_else(|| BindError::MissingDirectiveArgument(name.to_owned()))
		};
		let directive = match name {
			"text" => Self::Text,
			"html" => Self::Html,
			"model" => Self::Model,
			"bind" => Self::Bind(argument(name)?),
			"on" => Self::On(argument(name)?),
			_ => return Err(BindError::UnknownDirective(body.to_owned())),
		};
		Ok(Some(directive))
	}

	/// The directive name without prefix or argument.
	pub fn name(&self) -> &'static str {
		match self {
			Self::Text => "text",
			Self::Html => "html",
			Self::Model => "model",
			Self::Bind(_) => "bind",
			Self::On(_) => "on",
		}
	}

	/// Binds `node` to `expression`.
	pub fn bind<D: HostDocument>(
		&self,
		vm: &ViewModel<D>,
		node: &D::Node,
		expression: &str,
	) -> BindResult<()> {
		tracing::debug!(directive = %self, expression, node = ?node, "binding directive");
		match self {
			Self::Text => bind_text(vm, node, expression),
			Self::Html => {
				bind_value(vm, node, expression, |document, node, value| {
					updater::html(document, node, value)
				})
			}
			Self::Model => bind_model(vm, node, expression),
			Self::Bind(attribute) => {
				let attribute = attribute.clone();
				bind_value(vm, node, expression, move |document, node, value| {
					updater::bind(document, node, &attribute, value)
				})
			}
			Self::On(event_type) => bind_on(vm, node, event_type, expression),
		}
	}
}

impl fmt::Display for Directive {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bind(argument) | Self::On(argument) => {
				write!(f, "{DIRECTIVE_PREFIX}{}:{argument}", self.name())
			}
			_ => write!(f, "{DIRECTIVE_PREFIX}{}", self.name()),
		}
	}
}

/// Writes to a node the document has released are dropped.
fn rerender<D, F>(document: &D, node: &D::Node, render: F) -> ReactiveResult<()>
where
	D: HostDocument,
	F: FnOnce() -> weave_dom::DomResult<()>,
{
	if document.kind(node).is_none() {
		tracing::trace!(node = ?node, "bound node released; skipping render");
		return Ok(());
	}
	render().map_err(ReactiveError::callback)
}

/// Renders `expression` onto `node` now and whenever it changes.
fn bind_value<D, F>(vm: &ViewModel<D>, node: &D::Node, expression: &str, render: F) -> BindResult<()>
where
	D: HostDocument,
	F: Fn(&D, &D::Node, &Value) -> weave_dom::DomResult<()> + 'static,
{
	let render = Rc::new(render);
	let document = vm.document().clone();
	let target = node.clone();
	let on_change = render.clone();
	Watcher::new(vm.data(), expression, move |value| {
		rerender(&document, &target, || on_change(&document, &target, value))
	})?;
	let value = get_value(vm.data(), expression)?;
	render(vm.document(), node, &value)?;
	Ok(())
}

/// `v-text` and `{{ }}` text nodes.
///
/// A template with placeholders gets one watcher per placeholder; each of them
/// re-renders the whole template.
pub(crate) fn bind_text<D: HostDocument>(
	vm: &ViewModel<D>,
	node: &D::Node,
	expression: &str,
) -> BindResult<()> {
	let expressions = placeholders(expression);
	if expressions.is_empty() {
		return bind_value(vm, node, expression, |document, node, value| {
			updater::text(document, node, value)
		});
	}

	let template: Rc<str> = Rc::from(expression);
	for placeholder in expressions {
		let document = vm.document().clone();
		let target = node.clone();
		let root = vm.data().clone();
		let template = template.clone();
		Watcher::new(vm.data(), placeholder, move |_| -> ReactiveResult<()> {
			let content = Value::from(get_content_value(&root, &template)?);
			rerender(&document, &target, || updater::text(&document, &target, &content))
		})?;
	}
	let content = Value::from(get_content_value(vm.data(), expression)?);
	updater::text(vm.document(), node, &content)?;
	Ok(())
}

/// `v-model`: value binding plus an `input` listener writing back.
///
/// The listener writes the event's value, which the document fills in from
/// the target when the event carries none.
fn bind_model<D: HostDocument>(vm: &ViewModel<D>, node: &D::Node, expression: &str) -> BindResult<()> {
	bind_value(vm, node, expression, |document, node, value| {
		updater::model(document, node, value)
	})?;

	let root = vm.data().clone();
	let path = expression.to_owned();
	vm.document().add_event_listener(
		node,
		"input",
		listener(move |event: &Event| {
			set_value(&root, &path, event.value().unwrap_or_default())?;
			Ok(())
		}),
	)?;
	Ok(())
}

/// `v-on:<event>`: subscribes the named method, if it exists.
///
/// The listener owns a handle to the view model, so the method keeps working
/// after the caller drops its own handle, for as long as the node is in the
/// document.
fn bind_on<D: HostDocument>(
	vm: &ViewModel<D>,
	node: &D::Node,
	event_type: &str,
	method_name: &str,
) -> BindResult<()> {
	let Some(method) = vm.methods().get(method_name) else {
		tracing::debug!(method = method_name, event_type, "no such method; event not bound");
		return Ok(());
	};
	let context = vm.clone();
	vm.document().add_event_listener(
		node,
		event_type,
		listener(move |event: &Event| {
			method(&context, event)?;
			Ok(())
		}),
	)?;
	Ok(())
}
