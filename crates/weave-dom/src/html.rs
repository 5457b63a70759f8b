//! HTML fragment parsing and serialization helpers.

use std::borrow::Cow;

use scraper::{ElementRef, Html, Node};

/// A parsed node, detached from any document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParsedNode {
	Element {
		tag: String,
		attributes: Vec<(String, String)>,
		children: Vec<ParsedNode>,
	},
	Text(String),
	Comment(String),
}

/// Parse an HTML fragment into detached nodes.
///
/// Parsing never fails; malformed markup is recovered the way browsers do.
pub(crate) fn parse_fragment(markup: &str) -> Vec<ParsedNode> {
	let fragment = Html::parse_fragment(markup);
	convert_children(fragment.root_element())
}

fn convert_children(element: ElementRef<'_>) -> Vec<ParsedNode> {
	element
		.children()
		.filter_map(|child| match child.value() {
			Node::Text(text) => Some(ParsedNode::Text(String::from(&**text))),
			Node::Comment(comment) => Some(ParsedNode::Comment(String::from(&**comment))),
			Node::Element(el) => Some(ParsedNode::Element {
				tag: el.name().to_owned(),
				attributes: el
					.attrs()
					.map(|(name, value)| (name.to_owned(), value.to_owned()))
					.collect(),
				children: ElementRef::wrap(child)
					.map(convert_children)
					.unwrap_or_default(),
			}),
			_ => None,
		})
		.collect()
}

/// Escapes HTML special characters in a string.
///
/// Returns a borrowed reference if no escaping is needed.
pub(crate) fn html_escape(s: &str) -> Cow<'_, str> {
	if s.contains(['&', '<', '>', '"', '\'']) {
		let mut escaped = String::with_capacity(s.len() + 8);
		for c in s.chars() {
			match c {
				'&' => escaped.push_str("&amp;"),
				'<' => escaped.push_str("&lt;"),
				'>' => escaped.push_str("&gt;"),
				'"' => escaped.push_str("&quot;"),
				'\'' => escaped.push_str("&#x27;"),
				_ => escaped.push(c),
			}
		}
		Cow::Owned(escaped)
	} else {
		Cow::Borrowed(s)
	}
}

/// Elements serialized without children or a closing tag.
pub(crate) fn is_void(tag: &str) -> bool {
	matches!(
		tag,
		"area"
			| "base" | "br"
			| "col" | "embed"
			| "hr" | "img"
			| "input" | "link"
			| "meta" | "source"
			| "track" | "wbr"
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_parse_keeps_attribute_order() {
		let nodes = parse_fragment(r#"<p v-text="a" id="x" class="y">hi</p>"#);
		assert_eq!(
			nodes,
			vec![ParsedNode::Element {
				tag: "p".to_owned(),
				attributes: vec![
					("v-text".to_owned(), "a".to_owned()),
					("id".to_owned(), "x".to_owned()),
					("class".to_owned(), "y".to_owned()),
				],
				children: vec![ParsedNode::Text("hi".to_owned())],
			}]
		);
	}

	#[rstest]
	fn test_parse_text_and_comment() {
		let nodes = parse_fragment("a<!-- c -->b");
		assert_eq!(
			nodes,
			vec![
				ParsedNode::Text("a".to_owned()),
				ParsedNode::Comment(" c ".to_owned()),
				ParsedNode::Text("b".to_owned()),
			]
		);
	}

	#[rstest]
	fn test_parse_keeps_placeholder_text() {
		let nodes = parse_fragment("Hello {{ user.name }}");
		assert_eq!(nodes, vec![ParsedNode::Text("Hello {{ user.name }}".to_owned())]);
	}

	#[rstest]
	#[case("plain", "plain")]
	#[case("<b>", "&lt;b&gt;")]
	#[case("a & \"b\"", "a &amp; &quot;b&quot;")]
	fn test_html_escape(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(html_escape(input), expected);
	}

	#[rstest]
	fn test_void_elements() {
		assert!(is_void("input"));
		assert!(is_void("br"));
		assert!(!is_void("div"));
	}
}
