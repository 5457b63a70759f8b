//! Integration tests for the host document seam
//!
//! These tests drive [`Document`] only through [`HostDocument`], the way the
//! binding engine does.

use rstest::rstest;
use std::cell::RefCell;
use std::rc::Rc;
use weave_dom::{Document, Event, HostDocument, NodeKind, listener};

/// Preorder walk that collects element attributes, as a compiler would.
fn collect_attributes<D: HostDocument>(document: &D, node: &D::Node, out: &mut Vec<String>) {
	for child in document.children(node) {
		if document.kind(&child) == Some(NodeKind::Element) {
			for (name, value) in document.attributes(&child) {
				out.push(format!("{name}={value}"));
			}
			collect_attributes(document, &child, out);
		}
	}
}

#[rstest]
fn test_generic_walk_sees_attributes_in_document_order() {
	let document = Document::parse(
		r#"<div id="app"><p v-text="a">x</p><span v-bind:title="t"><i v-html="h"></i></span></div>"#,
	);
	let app = document.query_selector("#app").unwrap();

	let mut seen = Vec::new();
	collect_attributes(&document, &app, &mut seen);

	assert_eq!(seen, vec!["v-text=a", "v-bind:title=t", "v-html=h"]);
}

#[rstest]
fn test_removing_attributes_during_walk() {
	let document = Document::parse(r#"<div id="app"><p v-text="a" class="c">x</p></div>"#);
	let p = document.query_selector("p").unwrap();

	for (name, _) in document.attributes(&p) {
		if name.starts_with("v-") {
			document.remove_attribute(&p, &name).unwrap();
		}
	}

	assert_eq!(
		document.outer_html(document.query_selector("#app").unwrap()).unwrap(),
		r#"<div id="app"><p class="c">x</p></div>"#
	);
}

#[rstest]
fn test_children_snapshot_is_stable_while_rewriting() {
	let document = Document::parse(r#"<div id="app"><p>a</p><p>b</p></div>"#);
	let app = document.query_selector("#app").unwrap();

	let children = document.children(&app);
	document.set_inner_html(&children[0], "<em>new</em>").unwrap();

	assert_eq!(document.children(&app), children);
	assert_eq!(document.text_content(&app), "newb");
}

#[rstest]
fn test_input_event_reaches_listener_with_value() {
	let document = Document::parse(r#"<input id="name">"#);
	let input = document.query_selector("#name").unwrap();
	let received = Rc::new(RefCell::new(None));
	let received_clone = received.clone();
	document
		.add_event_listener(
			&input,
			"input",
			listener(move |event: &Event| {
				*received_clone.borrow_mut() = event.value().map(str::to_owned);
				Ok(())
			}),
		)
		.unwrap();

	document.input(input, "typed").unwrap();

	assert_eq!(received.borrow().as_deref(), Some("typed"));
}

#[rstest]
fn test_events_of_other_types_are_ignored() {
	let document = Document::parse(r#"<button id="b">go</button>"#);
	let button = document.query_selector("#b").unwrap();
	let clicks = Rc::new(RefCell::new(0));
	let clicks_clone = clicks.clone();
	document
		.add_event_listener(
			&button,
			"click",
			listener(move |_| {
				*clicks_clone.borrow_mut() += 1;
				Ok(())
			}),
		)
		.unwrap();

	document.dispatch_event(button, &Event::new("mouseover")).unwrap();
	document.dispatch_event(button, &Event::new("click")).unwrap();

	assert_eq!(*clicks.borrow(), 1);
}
