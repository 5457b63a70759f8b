//! Expression evaluation against a data root.
//!
//! Expressions are dotted paths (`user.profile.name`) resolved segment by
//! segment from the root mapping. Text templates embed expressions in `{{ }}`
//! placeholders; [`get_content_value`] renders a whole template.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ReactiveError, ReactiveResult};
use crate::observer::ReactiveObject;
use crate::value::Value;

static PLACEHOLDER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\{\{(.+?)\}\}").expect("placeholder pattern is valid"));

fn path(expression: &str) -> ReactiveResult<&str> {
	let path = expression.trim();
	if path.is_empty() {
		return Err(ReactiveError::EmptyExpression);
	}
	Ok(path)
}

/// Resolve `expression` against `root`.
///
/// Every segment is read through its slot, so evaluating inside a collection
/// pass subscribes the target to each slot on the path. An absent last key
/// resolves to [`Value::Undefined`].
///
/// # Errors
///
/// [`ReactiveError::MissingKey`] if an intermediate segment is absent or any
/// segment is empty, [`ReactiveError::NotAMapping`] if a segment is looked up
/// on a non-mapping. Sequences are not indexed.
pub fn get_value(root: &ReactiveObject, expression: &str) -> ReactiveResult<Value> {
	let path = path(expression)?;
	let mut segments = path.split('.').peekable();
	let mut current = Value::Object(root.clone());
	while let Some(segment) = segments.next() {
		let Value::Object(object) = &current else {
			return Err(ReactiveError::not_a_mapping(path, segment));
		};
		if segment.is_empty() {
			return Err(ReactiveError::missing_key(path, segment));
		}
		current = match object.get(segment) {
			Some(next) => next,
			None if segments.peek().is_none() => Value::Undefined,
			None => return Err(ReactiveError::missing_key(path, segment)),
		};
	}
	Ok(current)
}

/// Assign `value` at `expression`.
///
/// Every segment but the last must already resolve to a mapping. The last one
/// is written with [`ReactiveObject::set`], which notifies its subscribers.
pub fn set_value(root: &ReactiveObject, expression: &str, value: impl Into<Value>) -> ReactiveResult<()> {
	let path = path(expression)?;
	let (parent, key) = match path.rsplit_once('.') {
		Some((parent_path, key)) => match get_value(root, parent_path)? {
			Value::Undefined => {
				let missing = parent_path.rsplit('.').next().unwrap_or(parent_path);
				return Err(ReactiveError::missing_key(path, missing));
			}
			parent => (parent, key),
		},
		None => (Value::Object(root.clone()), path),
	};
	if key.is_empty() {
		return Err(ReactiveError::missing_key(path, key));
	}
	match parent {
		Value::Object(object) => object.set(key, value),
		_ => Err(ReactiveError::not_a_mapping(path, key)),
	}
}

/// Returns true if `text` contains at least one `{{ expression }}` placeholder.
pub fn has_placeholder(text: &str) -> bool {
	PLACEHOLDER.is_match(text)
}

/// Inner expressions of every placeholder in `template`, in order, trimmed.
pub fn placeholders(template: &str) -> Vec<&str> {
	PLACEHOLDER
		.captures_iter(template)
		.filter_map(|captures| captures.get(1))
		.map(|inner| inner.as_str().trim())
		.collect()
}

/// Render `template`, replacing each placeholder with its stringified value.
///
/// Literal text around placeholders is kept as is.
pub fn get_content_value(root: &ReactiveObject, template: &str) -> ReactiveResult<String> {
	let mut rendered = String::with_capacity(template.len());
	let mut last = 0;
	for captures in PLACEHOLDER.captures_iter(template) {
		let whole = captures.get_match();
		let inner = captures.get(1).map_or("", |inner| inner.as_str());
		rendered.push_str(&template[last..whole.start()]);
		rendered.push_str(&get_value(root, inner)?.to_string());
		last = whole.end();
	}
	rendered.push_str(&template[last..]);
	Ok(rendered)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::observer::observe;
	use rstest::rstest;
	use serde_json::json;

	fn root() -> ReactiveObject {
		observe(json!({
			"message": "hi",
			"user": { "name": "A", "age": 1, "address": { "city": "Kyoto" } }
		}))
		.as_object()
		.unwrap()
		.clone()
	}

	#[rstest]
	#[case("message", "hi")]
	#[case("user.name", "A")]
	#[case(" user.age ", "1")]
	#[case("user.address.city", "Kyoto")]
	fn test_get_value(#[case] expression: &str, #[case] expected: &str) {
		assert_eq!(get_value(&root(), expression).unwrap().to_string(), expected);
	}

	#[rstest]
	fn test_get_value_missing_intermediate() {
		let err = get_value(&root(), "account.id").unwrap_err();
		assert!(matches!(
			err,
			ReactiveError::MissingKey { ref segment, .. } if segment == "account"
		));
	}

	#[rstest]
	fn test_get_value_missing_last_key_is_undefined() {
		let value = get_value(&root(), "user.nickname").unwrap();

		assert_eq!(value, Value::Undefined);
		assert_eq!(get_value(&root(), "absent").unwrap(), Value::Undefined);
	}

	#[rstest]
	#[case("user..name")]
	#[case("user.")]
	fn test_get_value_empty_segment(#[case] expression: &str) {
		assert!(matches!(
			get_value(&root(), expression),
			Err(ReactiveError::MissingKey { .. })
		));
	}

	#[rstest]
	fn test_get_value_does_not_index_sequences() {
		let data = observe(json!({ "items": ["a", "b"] })).as_object().unwrap().clone();

		let err = get_value(&data, "items.0").unwrap_err();

		assert!(matches!(err, ReactiveError::NotAMapping { ref segment, .. } if segment == "0"));
	}

	#[rstest]
	fn test_get_value_through_scalar() {
		let err = get_value(&root(), "message.length").unwrap_err();
		assert!(matches!(err, ReactiveError::NotAMapping { .. }));
	}

	#[rstest]
	#[case("")]
	#[case("   ")]
	fn test_empty_expression(#[case] expression: &str) {
		assert!(matches!(
			get_value(&root(), expression),
			Err(ReactiveError::EmptyExpression)
		));
	}

	#[rstest]
	fn test_set_value_nested() {
		let data = root();

		set_value(&data, "user.address.city", "Osaka").unwrap();

		assert_eq!(get_value(&data, "user.address.city").unwrap(), Value::from("Osaka"));
	}

	#[rstest]
	fn test_set_value_requires_intermediates() {
		let data = root();
		assert!(matches!(
			set_value(&data, "account.id", 1),
			Err(ReactiveError::MissingKey { ref segment, .. }) if segment == "account"
		));
		assert!(matches!(
			set_value(&data, "message.length", 1),
			Err(ReactiveError::NotAMapping { .. })
		));
		assert!(set_value(&data, "user.", 1).is_err());
	}

	#[rstest]
	fn test_get_content_value_keeps_literals() {
		let rendered = get_content_value(&root(), "Hello {{user.name}}, you are {{ user.age }}!").unwrap();
		assert_eq!(rendered, "Hello A, you are 1!");
	}

	#[rstest]
	fn test_get_content_value_renders_undefined() {
		let rendered = get_content_value(&root(), "[{{ user.nickname }}]").unwrap();
		assert_eq!(rendered, "[undefined]");
	}

	#[rstest]
	fn test_get_content_value_without_placeholders() {
		assert_eq!(get_content_value(&root(), "plain text").unwrap(), "plain text");
	}

	#[rstest]
	fn test_placeholders() {
		assert_eq!(placeholders("{{a}} and {{ b.c }}{{d}}"), vec!["a", "b.c", "d"]);
		assert!(has_placeholder("x {{y}} z"));
		assert!(!has_placeholder("x {y} z"));
		assert!(!has_placeholder("{{}}"));
	}
}
