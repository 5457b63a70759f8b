//! The host document trait.

use core::fmt;

use crate::error::DomResult;
use crate::event::EventListener;

/// Kind of a document node, as far as the compiler cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
	/// The document itself.
	Document,
	/// An element with attributes and children.
	Element,
	/// A text node.
	Text,
	/// A comment.
	Comment,
}

/// A tree-structured document the binding engine can read and write.
///
/// Handles are cheap to clone; cloning a document yields another handle to the
/// same tree. Writes go through `&self`.
pub trait HostDocument: Clone + 'static {
	/// Node handle.
	type Node: Clone + fmt::Debug + 'static;

	/// First node matching `selector`, in document order.
	fn query_selector(&self, selector: &str) -> Option<Self::Node>;

	/// Current children of `node`, in order.
	fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

	/// Kind of `node`, or `None` if the handle is not part of this document.
	fn kind(&self, node: &Self::Node) -> Option<NodeKind>;

	/// Text content: the data of a text node, or the concatenated text of an
	/// element's descendants.
	fn text_content(&self, node: &Self::Node) -> String;

	/// Attributes of an element, in document order. Empty for other nodes.
	fn attributes(&self, node: &Self::Node) -> Vec<(String, String)>;

	/// Remove an attribute. Removing an absent attribute is not an error.
	fn remove_attribute(&self, node: &Self::Node, name: &str) -> DomResult<()>;

	/// Replace the text content of `node`. Replaced children are released.
	fn set_text_content(&self, node: &Self::Node, text: &str) -> DomResult<()>;

	/// Set an attribute on an element.
	fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> DomResult<()>;

	/// Replace the children of an element with parsed `markup`. No sanitization.
	/// Replaced children are released.
	fn set_inner_html(&self, node: &Self::Node, markup: &str) -> DomResult<()>;

	/// Set the value of an input-like element.
	fn set_value(&self, node: &Self::Node, value: &str) -> DomResult<()>;

	/// Subscribe `listener` to events of `event_type` on `node`.
	///
	/// Events reaching the listener carry the target's current value when the
	/// target has one, so a `v-model` listener can read it from the event.
	fn add_event_listener(
		&self,
		node: &Self::Node,
		event_type: &str,
		listener: EventListener,
	) -> DomResult<()>;
}
