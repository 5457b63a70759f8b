//! Values held by reactive slots.
//!
//! [`Value`] mirrors `serde_json::Value`, except that mappings are
//! [`ReactiveObject`]s. Sequences stay plain: they are stored and compared, but
//! mutating them in place is not observed.
//!
//! Equality follows strict-inequality semantics: scalars compare by value,
//! mappings by identity. Display is plain string conversion: `null`,
//! `undefined`, numbers without a trailing `.0`. Hosts may map absent values
//! differently when writing them into a node; see the view updater.

use core::fmt;

use serde_json::Number;

use crate::observer::{ReactiveObject, observe};

/// A value stored in a reactive slot.
#[derive(Debug, Clone, Default)]
pub enum Value {
	/// Null.
	#[default]
	Null,
	/// No value: what a path resolves to when its last key is absent.
	Undefined,
	/// A boolean.
	Bool(bool),
	/// A number.
	Number(Number),
	/// A string.
	String(String),
	/// A sequence. Not intercepted.
	Array(Vec<serde_json::Value>),
	/// A reactive mapping.
	Object(ReactiveObject),
}

impl Value {
	/// Returns the reactive mapping, if this value is one.
	pub fn as_object(&self) -> Option<&ReactiveObject> {
		match self {
			Self::Object(object) => Some(object),
			_ => None,
		}
	}

	/// Returns true if this value is a reactive mapping.
	pub fn is_object(&self) -> bool {
		matches!(self, Self::Object(_))
	}

	/// Returns true if this value is null.
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	/// Returns true if this value is [`Value::Undefined`].
	pub fn is_undefined(&self) -> bool {
		matches!(self, Self::Undefined)
	}

	/// Returns true for null and undefined.
	pub fn is_nullish(&self) -> bool {
		matches!(self, Self::Null | Self::Undefined)
	}

	/// Returns the string, if this value is one.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(s) => Some(s),
			_ => None,
		}
	}

	/// Returns the boolean, if this value is one.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(b) => Some(*b),
			_ => None,
		}
	}

	/// Returns the number as `i64`, if it is an integer that fits.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::Number(n) => n.as_i64(),
			_ => None,
		}
	}

	/// Returns the number as `f64`.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::Number(n) => n.as_f64(),
			_ => None,
		}
	}

	/// Plain JSON snapshot of this value, read without tracking.
	///
	/// JSON has no undefined; it becomes null.
	pub fn to_json(&self) -> serde_json::Value {
		match self {
			Self::Null | Self::Undefined => serde_json::Value::Null,
			Self::Bool(b) => serde_json::Value::Bool(*b),
			Self::Number(n) => serde_json::Value::Number(n.clone()),
			Self::String(s) => serde_json::Value::String(s.clone()),
			Self::Array(items) => serde_json::Value::Array(items.clone()),
			Self::Object(object) => object.to_json(),
		}
	}
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
	if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
		return x == y;
	}
	if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
		return x == y;
	}
	match (a.as_f64(), b.as_f64()) {
		(Some(x), Some(y)) => x == y,
		_ => false,
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Null, Self::Null) | (Self::Undefined, Self::Undefined) => true,
			(Self::Bool(a), Self::Bool(b)) => a == b,
			(Self::Number(a), Self::Number(b)) => numbers_equal(a, b),
			(Self::String(a), Self::String(b)) => a == b,
			(Self::Array(a), Self::Array(b)) => a == b,
			(Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
			_ => false,
		}
	}
}

fn fmt_number(n: &Number, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	match n.as_f64() {
		Some(x) if n.is_f64() && x.is_finite() && x.fract() == 0.0 && x.abs() < 1e21 => {
			write!(f, "{x:.0}")
		}
		_ => write!(f, "{n}"),
	}
}

fn fmt_json_item(value: &serde_json::Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	match value {
		serde_json::Value::Null => Ok(()),
		serde_json::Value::Bool(b) => write!(f, "{b}"),
		serde_json::Value::Number(n) => fmt_number(n, f),
		serde_json::Value::String(s) => f.write_str(s),
		serde_json::Value::Array(items) => fmt_items(items, f),
		serde_json::Value::Object(_) => f.write_str("[object Object]"),
	}
}

fn fmt_items(items: &[serde_json::Value], f: &mut fmt::Formatter<'_>) -> fmt::Result {
	for (index, item) in items.iter().enumerate() {
		if index > 0 {
			f.write_str(",")?;
		}
		fmt_json_item(item, f)?;
	}
	Ok(())
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Null => f.write_str("null"),
			Self::Undefined => f.write_str("undefined"),
			Self::Bool(b) => write!(f, "{b}"),
			Self::Number(n) => fmt_number(n, f),
			Self::String(s) => f.write_str(s),
			Self::Array(items) => fmt_items(items, f),
			Self::Object(_) => f.write_str("[object Object]"),
		}
	}
}

impl From<serde_json::Value> for Value {
	fn from(value: serde_json::Value) -> Self {
		observe(value)
	}
}

impl From<ReactiveObject> for Value {
	fn from(object: ReactiveObject) -> Self {
		Self::Object(object)
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Self::String(s.to_owned())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Self::String(s)
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Self::Bool(b)
	}
}

impl From<i32> for Value {
	fn from(n: i32) -> Self {
		Self::Number(n.into())
	}
}

impl From<i64> for Value {
	fn from(n: i64) -> Self {
		Self::Number(n.into())
	}
}

impl From<u64> for Value {
	fn from(n: u64) -> Self {
		Self::Number(n.into())
	}
}

impl From<f64> for Value {
	fn from(n: f64) -> Self {
		Number::from_f64(n).map_or(Self::Null, Self::Number)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(json!(null), "null")]
	#[case(json!(true), "true")]
	#[case(json!(1), "1")]
	#[case(json!(-3), "-3")]
	#[case(json!(2.0), "2")]
	#[case(json!(1.5), "1.5")]
	#[case(json!("text"), "text")]
	#[case(json!([1, "a", null, [2, 3]]), "1,a,,2,3")]
	#[case(json!({ "a": 1 }), "[object Object]")]
	fn test_display(#[case] input: serde_json::Value, #[case] expected: &str) {
		assert_eq!(Value::from(input).to_string(), expected);
	}

	#[rstest]
	fn test_scalar_equality_by_value() {
		assert_eq!(Value::from("a"), Value::from("a"));
		assert_eq!(Value::from(1), Value::from(1.0));
		assert_ne!(Value::from(1), Value::from("1"));
		assert_ne!(Value::Null, Value::from(false));
		assert_ne!(Value::Null, Value::Undefined);
		assert_eq!(Value::Undefined, Value::Undefined);
	}

	#[rstest]
	fn test_object_equality_by_identity() {
		let first = Value::from(json!({ "a": 1 }));
		let second = Value::from(json!({ "a": 1 }));

		assert_ne!(first, second);
		assert_eq!(first, first.clone());
	}

	#[rstest]
	fn test_undefined() {
		assert_eq!(Value::Undefined.to_string(), "undefined");
		assert!(Value::Undefined.is_nullish());
		assert!(Value::Null.is_nullish());
		assert!(!Value::from("").is_nullish());
		assert_eq!(Value::Undefined.to_json(), json!(null));
	}

	#[rstest]
	fn test_to_json_round_trip() {
		let input = json!({ "user": { "name": "A", "tags": ["x"] }, "n": 2 });
		assert_eq!(Value::from(input.clone()).to_json(), input);
	}
}
