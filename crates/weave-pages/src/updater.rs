//! View updater
//!
//! Stateless writes of a rendered value onto a node. Each write converts the
//! value the way the matching browser property does. Text content drops null
//! and undefined. Markup and input values drop null only. Attributes
//! stringify everything.

use weave_dom::{DomResult, HostDocument};
use weave_reactive::Value;

fn null_to_empty(value: &Value) -> String {
	if value.is_null() {
		String::new()
	} else {
		value.to_string()
	}
}

/// Sets the text content of `node`.
pub fn text<D: HostDocument>(document: &D, node: &D::Node, value: &Value) -> DomResult<()> {
	let text = if value.is_nullish() {
		String::new()
	} else {
		value.to_string()
	};
	document.set_text_content(node, &text)
}

/// Sets the attribute `name` of `node`.
pub fn bind<D: HostDocument>(document: &D, node: &D::Node, name: &str, value: &Value) -> DomResult<()> {
	document.set_attribute(node, name, &value.to_string())
}

/// Replaces the markup content of `node`. The value is not sanitized.
pub fn html<D: HostDocument>(document: &D, node: &D::Node, value: &Value) -> DomResult<()> {
	document.set_inner_html(node, &null_to_empty(value))
}

/// Sets the value of an input-like `node`.
pub fn model<D: HostDocument>(document: &D, node: &D::Node, value: &Value) -> DomResult<()> {
	document.set_value(node, &null_to_empty(value))
}
