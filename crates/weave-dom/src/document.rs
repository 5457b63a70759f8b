//! In-memory document
//!
//! [`Document`] stores nodes in an arena and hands out [`NodeId`]s. Nodes
//! detached with [`Document::append_child`] stay alive. Children replaced by a
//! text or markup write are released together with their listeners, and their
//! slots are reused; a handle to a released node is stale and every operation
//! on it fails with [`DomError::NodeNotFound`].
//!
//! ## Selectors
//!
//! [`HostDocument::query_selector`] understands a single simple selector:
//! `#id`, `.class` or a tag name. Anything else matches nothing.
//!
//! ## Example
//!
//! ```ignore
//! use weave_dom::{Document, HostDocument};
//!
//! let document = Document::parse(r#"<div id="app"><input value="a"></div>"#);
//! let app = document.query_selector("#app").unwrap();
//! let input = document.children(&app)[0];
//!
//! document.input(input, "b")?;
//! assert_eq!(document.value(input).as_deref(), Some("b"));
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::{DomError, DomResult};
use crate::event::{Event, EventListener};
use crate::host::{HostDocument, NodeKind};
use crate::html::{ParsedNode, html_escape, is_void, parse_fragment};

/// Handle to a node of a [`Document`].
///
/// The generation tells a reused slot apart from the node it used to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
	index: usize,
	generation: u32,
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.index)?;
		if self.generation > 0 {
			write!(f, "v{}", self.generation)?;
		}
		Ok(())
	}
}

#[derive(Debug)]
struct ElementData {
	tag: String,
	attributes: Vec<(String, String)>,
	value: Option<String>,
}

#[derive(Debug)]
enum NodeContent {
	Document,
	Element(ElementData),
	Text(String),
	Comment(String),
}

struct NodeData {
	parent: Option<NodeId>,
	children: Vec<NodeId>,
	content: NodeContent,
	listeners: HashMap<String, Vec<EventListener>>,
}

#[derive(Default)]
struct NodeSlot {
	generation: u32,
	data: Option<NodeData>,
}

#[derive(Default)]
struct DocumentInner {
	slots: Vec<NodeSlot>,
	free: Vec<usize>,
}

impl DocumentInner {
	fn node(&self, id: NodeId) -> DomResult<&NodeData> {
		self.slots
			.get(id.index)
			.filter(|slot| slot.generation == id.generation)
			.and_then(|slot| slot.data.as_ref())
			.ok_or(DomError::NodeNotFound(id))
	}

	fn node_mut(&mut self, id: NodeId) -> DomResult<&mut NodeData> {
		self.slots
			.get_mut(id.index)
			.filter(|slot| slot.generation == id.generation)
			.and_then(|slot| slot.data.as_mut())
			.ok_or(DomError::NodeNotFound(id))
	}

	fn live_nodes(&self) -> usize {
		self.slots.len() - self.free.len()
	}

	fn element_mut(&mut self, id: NodeId, operation: &'static str) -> DomResult<&mut ElementData> {
		match &mut self.node_mut(id)?.content {
			NodeContent::Element(element) => Ok(element),
			_ => Err(DomError::NotAnElement { node: id, operation }),
		}
	}

	fn alloc(&mut self, content: NodeContent) -> NodeId {
		let data = NodeData {
			parent: None,
			children: Vec::new(),
			content,
			listeners: HashMap::new(),
		};
		let index = match self.free.pop() {
			Some(index) => index,
			None => {
				self.slots.push(NodeSlot::default());
				self.slots.len() - 1
			}
		};
		let slot = &mut self.slots[index];
		slot.data = Some(data);
		NodeId {
			index,
			generation: slot.generation,
		}
	}

	/// Drops `id` and its subtree, listeners included.
	fn release(&mut self, id: NodeId) {
		let Ok(node) = self.node(id) else {
			return;
		};
		for child in node.children.clone() {
			self.release(child);
		}
		let slot = &mut self.slots[id.index];
		slot.data = None;
		slot.generation = slot.generation.wrapping_add(1);
		self.free.push(id.index);
	}

	fn detach(&mut self, child: NodeId) -> DomResult<()> {
		if let Some(parent) = self.node_mut(child)?.parent.take() {
			self.node_mut(parent)?.children.retain(|id| *id != child);
		}
		Ok(())
	}

	fn append(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
		match self.node(parent)?.content {
			NodeContent::Document | NodeContent::Element(_) => {}
			_ => {
				return Err(DomError::NotAnElement {
					node: parent,
					operation: "append a child",
				});
			}
		}
		self.node(child)?;
		self.detach(child)?;
		self.node_mut(child)?.parent = Some(parent);
		self.node_mut(parent)?.children.push(child);
		Ok(())
	}

	fn clear_children(&mut self, parent: NodeId) -> DomResult<()> {
		let children = std::mem::take(&mut self.node_mut(parent)?.children);
		for child in children {
			self.release(child);
		}
		Ok(())
	}

	fn insert_parsed(&mut self, parent: NodeId, nodes: Vec<ParsedNode>) -> DomResult<()> {
		for parsed in nodes {
			let id = match parsed {
				ParsedNode::Text(text) => self.alloc(NodeContent::Text(text)),
				ParsedNode::Comment(text) => self.alloc(NodeContent::Comment(text)),
				ParsedNode::Element {
					tag,
					attributes,
					children,
				} => {
					let id = self.alloc(NodeContent::Element(ElementData {
						tag,
						attributes,
						value: None,
					}));
					self.insert_parsed(id, children)?;
					id
				}
			};
			self.append(parent, id)?;
		}
		Ok(())
	}

	fn collect_text(&self, id: NodeId, out: &mut String) {
		let Ok(node) = self.node(id) else {
			return;
		};
		match &node.content {
			NodeContent::Text(text) => out.push_str(text),
			NodeContent::Comment(_) => {}
			NodeContent::Document | NodeContent::Element(_) => {
				for child in &node.children {
					self.collect_text(*child, out);
				}
			}
		}
	}

	fn serialize(&self, id: NodeId, out: &mut String) -> DomResult<()> {
		let node = self.node(id)?;
		match &node.content {
			NodeContent::Text(text) => out.push_str(&html_escape(text)),
			NodeContent::Comment(text) => {
				out.push_str("<!--");
				out.push_str(text);
				out.push_str("-->");
			}
			NodeContent::Document => self.serialize_children(id, out)?,
			NodeContent::Element(element) => {
				out.push('<');
				out.push_str(&element.tag);
				for (name, value) in &element.attributes {
					out.push(' ');
					out.push_str(name);
					out.push_str("=\"");
					out.push_str(&html_escape(value));
					out.push('"');
				}
				if is_void(&element.tag) {
					out.push_str(" />");
				} else {
					out.push('>');
					self.serialize_children(id, out)?;
					out.push_str("</");
					out.push_str(&element.tag);
					out.push('>');
				}
			}
		}
		Ok(())
	}

	fn serialize_children(&self, id: NodeId, out: &mut String) -> DomResult<()> {
		for child in &self.node(id)?.children {
			self.serialize(*child, out)?;
		}
		Ok(())
	}

	fn matches(&self, id: NodeId, selector: &str) -> bool {
		let Ok(NodeData {
			content: NodeContent::Element(element),
			..
		}) = self.node(id)
		else {
			return false;
		};
		let attribute = |name: &str| {
			element
				.attributes
				.iter()
				.find(|(key, _)| key == name)
				.map(|(_, value)| value.as_str())
		};
		if let Some(wanted) = selector.strip_prefix('#') {
			attribute("id") == Some(wanted)
		} else if let Some(class) = selector.strip_prefix('.') {
			attribute("class").is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
		} else {
			element.tag.eq_ignore_ascii_case(selector)
		}
	}

	fn find(&self, id: NodeId, selector: &str) -> Option<NodeId> {
		if self.matches(id, selector) {
			return Some(id);
		}
		self.node(id)
			.ok()?
			.children
			.iter()
			.find_map(|child| self.find(*child, selector))
	}
}

/// An in-memory HTML document.
///
/// Cloning creates a new handle to the **same** document.
#[derive(Clone)]
pub struct Document {
	inner: Rc<RefCell<DocumentInner>>,
}

impl Document {
	/// Creates an empty document.
	pub fn new() -> Self {
		let mut inner = DocumentInner::default();
		inner.alloc(NodeContent::Document);
		Self {
			inner: Rc::new(RefCell::new(inner)),
		}
	}

	/// Creates a document from an HTML fragment.
	pub fn parse(markup: &str) -> Self {
		let document = Self::new();
		let nodes = parse_fragment(markup);
		let root = document.root();
		// The root accepts children and every parsed id is fresh.
		if let Err(error) = document.inner.borrow_mut().insert_parsed(root, nodes) {
			tracing::warn!(error = %error, "failed to insert parsed markup");
		}
		document
	}

	/// The document node.
	pub fn root(&self) -> NodeId {
		NodeId {
			index: 0,
			generation: 0,
		}
	}

	/// Number of live nodes, the document node included.
	pub fn node_count(&self) -> usize {
		self.inner.borrow().live_nodes()
	}

	/// Creates a detached element.
	pub fn create_element(&self, tag: &str) -> NodeId {
		self.inner
			.borrow_mut()
			.alloc(NodeContent::Element(ElementData {
				tag: tag.to_ascii_lowercase(),
				attributes: Vec::new(),
				value: None,
			}))
	}

	/// Creates a detached text node.
	pub fn create_text(&self, text: &str) -> NodeId {
		self.inner
			.borrow_mut()
			.alloc(NodeContent::Text(text.to_owned()))
	}

	/// Appends `child` to `parent`, detaching it from its current parent first.
	pub fn append_child(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
		self.inner.borrow_mut().append(parent, child)
	}

	/// Parent of `node`, if attached.
	pub fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.inner.borrow().node(node).ok()?.parent
	}

	/// Tag name of an element.
	pub fn tag_name(&self, node: NodeId) -> Option<String> {
		match &self.inner.borrow().node(node).ok()?.content {
			NodeContent::Element(element) => Some(element.tag.clone()),
			_ => None,
		}
	}

	/// Value of an attribute.
	pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
		self.attributes(&node)
			.into_iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value)
	}

	/// Current value of an input-like element.
	///
	/// Falls back to the `value` attribute until a value has been set.
	pub fn value(&self, node: NodeId) -> Option<String> {
		let inner = self.inner.borrow();
		match &inner.node(node).ok()?.content {
			NodeContent::Element(element) => element.value.clone().or_else(|| {
				element
					.attributes
					.iter()
					.find(|(key, _)| key == "value")
					.map(|(_, value)| value.clone())
			}),
			_ => None,
		}
	}

	/// Serialized children of `node`.
	pub fn inner_html(&self, node: NodeId) -> DomResult<String> {
		let mut out = String::new();
		self.inner.borrow().serialize_children(node, &mut out)?;
		Ok(out)
	}

	/// Serialized `node`, including itself.
	pub fn outer_html(&self, node: NodeId) -> DomResult<String> {
		let mut out = String::new();
		self.inner.borrow().serialize(node, &mut out)?;
		Ok(out)
	}

	/// Serialized document.
	pub fn to_html(&self) -> String {
		let mut out = String::new();
		// The root always exists.
		let _ = self.inner.borrow().serialize_children(self.root(), &mut out);
		out
	}

	/// Number of listeners for `event_type` on `node`.
	pub fn listener_count(&self, node: NodeId, event_type: &str) -> usize {
		self.inner
			.borrow()
			.node(node)
			.ok()
			.and_then(|data| data.listeners.get(event_type))
			.map_or(0, Vec::len)
	}

	/// Calls every listener for the event's type on `node`, in subscription
	/// order.
	///
	/// An event without a value is delivered with the target's current value,
	/// if it has one. Stops at the first listener that fails.
	pub fn dispatch_event(&self, node: NodeId, event: &Event) -> DomResult<()> {
		let listeners = {
			let inner = self.inner.borrow();
			inner
				.node(node)?
				.listeners
				.get(event.event_type())
				.cloned()
				.unwrap_or_default()
		};
		let targeted;
		let event = match event.value() {
			Some(_) => event,
			None => match self.value(node) {
				Some(value) => {
					targeted = event.clone().with_value(value);
					&targeted
				}
				None => event,
			},
		};
		tracing::debug!(
			node = %node,
			event_type = event.event_type(),
			listeners = listeners.len(),
			"dispatching event"
		);
		for listener in listeners {
			listener(event).map_err(|source| DomError::Listener {
				event_type: event.event_type().to_owned(),
				source,
			})?;
		}
		Ok(())
	}

	/// Simulates user input: sets the element's value, then dispatches an
	/// `input` event carrying it.
	pub fn input(&self, node: NodeId, value: &str) -> DomResult<()> {
		self.set_value(&node, value)?;
		self.dispatch_event(node, &Event::input(value))
	}
}

impl Default for Document {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Document {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Document")
			.field("nodes", &self.inner.borrow().live_nodes())
			.finish()
	}
}

impl HostDocument for Document {
	type Node = NodeId;

	fn query_selector(&self, selector: &str) -> Option<NodeId> {
		let selector = selector.trim();
		if selector.is_empty() {
			return None;
		}
		self.inner.borrow().find(self.root(), selector)
	}

	fn children(&self, node: &NodeId) -> Vec<NodeId> {
		self.inner
			.borrow()
			.node(*node)
			.map(|data| data.children.clone())
			.unwrap_or_default()
	}

	fn kind(&self, node: &NodeId) -> Option<NodeKind> {
		let kind = match self.inner.borrow().node(*node).ok()?.content {
			NodeContent::Document => NodeKind::Document,
			NodeContent::Element(_) => NodeKind::Element,
			NodeContent::Text(_) => NodeKind::Text,
			NodeContent::Comment(_) => NodeKind::Comment,
		};
		Some(kind)
	}

	fn text_content(&self, node: &NodeId) -> String {
		let mut out = String::new();
		self.inner.borrow().collect_text(*node, &mut out);
		out
	}

	fn attributes(&self, node: &NodeId) -> Vec<(String, String)> {
		match self.inner.borrow().node(*node).map(|data| &data.content) {
			Ok(NodeContent::Element(element)) => element.attributes.clone(),
			_ => Vec::new(),
		}
	}

	fn remove_attribute(&self, node: &NodeId, name: &str) -> DomResult<()> {
		self.inner
			.borrow_mut()
			.element_mut(*node, "remove an attribute")?
			.attributes
			.retain(|(key, _)| key != name);
		Ok(())
	}

	fn set_text_content(&self, node: &NodeId, text: &str) -> DomResult<()> {
		let mut inner = self.inner.borrow_mut();
		if let NodeContent::Text(data) | NodeContent::Comment(data) = &mut inner.node_mut(*node)?.content {
			text.clone_into(data);
			return Ok(());
		}
		// A lone text child is rewritten in place.
		let children = inner.node(*node)?.children.clone();
		if let [child] = children[..] {
			if let (false, NodeContent::Text(data)) = (text.is_empty(), &mut inner.node_mut(child)?.content) {
				text.clone_into(data);
				return Ok(());
			}
		}
		inner.clear_children(*node)?;
		if !text.is_empty() {
			let child = inner.alloc(NodeContent::Text(text.to_owned()));
			inner.append(*node, child)?;
		}
		Ok(())
	}

	fn set_attribute(&self, node: &NodeId, name: &str, value: &str) -> DomResult<()> {
		let mut inner = self.inner.borrow_mut();
		let element = inner.element_mut(*node, "set an attribute")?;
		match element.attributes.iter_mut().find(|(key, _)| key == name) {
			Some((_, existing)) => value.clone_into(existing),
			None => element.attributes.push((name.to_owned(), value.to_owned())),
		}
		Ok(())
	}

	fn set_inner_html(&self, node: &NodeId, markup: &str) -> DomResult<()> {
		let nodes = parse_fragment(markup);
		let mut inner = self.inner.borrow_mut();
		inner.element_mut(*node, "set inner HTML")?;
		inner.clear_children(*node)?;
		inner.insert_parsed(*node, nodes)
	}

	fn set_value(&self, node: &NodeId, value: &str) -> DomResult<()> {
		self.inner.borrow_mut().element_mut(*node, "set a value")?.value = Some(value.to_owned());
		Ok(())
	}

	fn add_event_listener(
		&self,
		node: &NodeId,
		event_type: &str,
		listener: EventListener,
	) -> DomResult<()> {
		let mut inner = self.inner.borrow_mut();
		inner.element_mut(*node, "add an event listener")?;
		inner
			.node_mut(*node)?
			.listeners
			.entry(event_type.to_owned())
			.or_default()
			.push(listener);
		tracing::trace!(node = %node, event_type, "listener added");
		Ok(())
	}
}
