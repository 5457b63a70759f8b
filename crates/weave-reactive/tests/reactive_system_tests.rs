//! Integration tests for the reactive core
//!
//! These tests verify:
//! 1. Watchers fire once per changing write and never on equal writes
//! 2. Newly assigned mappings are reactive; old subscribers are orphaned
//! 3. Duplicate registration is kept and observable
//! 4. Cyclic writes are bounded instead of exhausting the stack

use proptest::prelude::*;
use rstest::rstest;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use weave_reactive::expression::{get_content_value, set_value};
use weave_reactive::{ReactiveError, ReactiveObject, Value, Watcher, observe, with_runtime};

fn root(data: serde_json::Value) -> ReactiveObject {
	observe(data).as_object().unwrap().clone()
}

fn counting_watcher(data: &ReactiveObject, expression: &str) -> (Watcher, Rc<RefCell<Vec<Value>>>) {
	let log = Rc::new(RefCell::new(Vec::new()));
	let log_clone = log.clone();
	let watcher = Watcher::new(data, expression, move |value| {
		log_clone.borrow_mut().push(value.clone());
		Ok(())
	})
	.unwrap();
	(watcher, log)
}

#[rstest]
fn test_roundtrip_fires_once_per_write() {
	let data = root(json!({ "k": "v" }));
	let (_watcher, log) = counting_watcher(&data, "k");

	data.set("k", "v2").unwrap();
	assert_eq!(data.get("k"), Some(Value::from("v2")));
	assert_eq!(*log.borrow(), vec![Value::from("v2")]);

	data.set("k", "v3").unwrap();
	assert_eq!(*log.borrow(), vec![Value::from("v2"), Value::from("v3")]);
}

#[rstest]
#[case(json!(1), Value::from(1))]
#[case(json!(1.0), Value::from(1))]
#[case(json!("same"), Value::from("same"))]
#[case(json!(true), Value::from(true))]
fn test_equal_write_is_suppressed(#[case] initial: serde_json::Value, #[case] rewrite: Value) {
	let data = root(json!({ "k": initial }));
	let (watcher, log) = counting_watcher(&data, "k");

	data.set("k", rewrite).unwrap();

	assert!(log.borrow().is_empty());
	assert_eq!(watcher.evaluations(), 2);
}

#[rstest]
fn test_new_mapping_is_reactive() {
	let data = root(json!({ "user": { "name": "A" } }));
	let (_old_watcher, old_log) = counting_watcher(&data, "user.name");

	data.set("user", json!({ "name": "B" })).unwrap();
	let (_new_watcher, new_log) = counting_watcher(&data, "user.name");

	set_value(&data, "user.name", "C").unwrap();

	// The old watcher saw the replacement, not the write into the new mapping.
	assert_eq!(*old_log.borrow(), vec![Value::from("B")]);
	assert_eq!(*new_log.borrow(), vec![Value::from("C")]);
}

#[rstest]
fn test_sibling_write_does_not_fire() {
	let data = root(json!({ "user": { "name": "A", "age": 1 } }));
	let (_watcher, log) = counting_watcher(&data, "user.name");

	set_value(&data, "user.age", 2).unwrap();

	assert!(log.borrow().is_empty());
}

#[rstest]
fn test_duplicate_registration_updates_twice() {
	let data = root(json!({ "count": 0 }));
	let (watcher, log) = counting_watcher(&data, "count");

	// A second read of the same slot inside one collection pass.
	watcher.collect(|| data.get("count"));
	assert_eq!(data.slot("count").unwrap().dep().len(), 2);
	let before = watcher.evaluations();

	data.set("count", 1).unwrap();

	// Two update() calls; only the first sees a change.
	assert_eq!(watcher.evaluations(), before + 2);
	assert_eq!(*log.borrow(), vec![Value::from(1)]);
}

#[rstest]
fn test_reading_path_twice_registers_twice() {
	let data = root(json!({ "a": { "b": 1 } }));
	let (watcher, _log) = counting_watcher(&data, "a.b");

	watcher.collect(|| weave_reactive::get_value(&data, "a.b")).unwrap();

	let a = data.get("a").unwrap();
	assert_eq!(data.slot("a").unwrap().dep().len(), 2);
	assert_eq!(a.as_object().unwrap().slot("b").unwrap().dep().len(), 2);
}

#[rstest]
fn test_cyclic_write_is_bounded() {
	let data = root(json!({ "n": 0 }));
	let data_clone = data.clone();
	let _watcher = Watcher::new(&data, "n", move |value| {
		let next = value.as_i64().unwrap_or(0) + 1;
		data_clone.set("n", next)
	})
	.unwrap();

	let result = data.set("n", 1);

	assert!(matches!(result, Err(ReactiveError::NotifyDepthExceeded { .. })));
	assert_eq!(with_runtime(|rt| rt.notify_depth()), 0);
}

#[rstest]
fn test_nested_write_reenters_before_returning() {
	let data = root(json!({ "source": 0, "mirror": 0 }));
	let data_clone = data.clone();
	let _forward = Watcher::new(&data, "source", move |value| {
		data_clone.set("mirror", value.clone())
	})
	.unwrap();
	let (_mirror_watcher, mirror_log) = counting_watcher(&data, "mirror");

	data.set("source", 5).unwrap();

	// The mirror watcher ran inside the outer set() call.
	assert_eq!(*mirror_log.borrow(), vec![Value::from(5)]);
}

proptest! {
	#[test]
	fn prop_literal_text_is_untouched(text in "[^{}]*") {
		let data = root(json!({}));
		prop_assert_eq!(get_content_value(&data, &text).unwrap(), text);
	}

	#[test]
	fn prop_placeholders_render_values(name in "[a-zA-Z0-9 ]{0,16}", age in 0i64..200) {
		let data = root(json!({ "user": { "name": name.clone(), "age": age } }));
		let rendered = get_content_value(&data, "Hello {{user.name}}, you are {{user.age}}").unwrap();
		prop_assert_eq!(rendered, format!("Hello {name}, you are {age}"));
	}
}
