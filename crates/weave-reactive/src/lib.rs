//! # Weave Reactive
//!
//! The reactive core of weave: it turns plain data into an observed tree of
//! property slots, tracks which watchers read which slot, and re-runs those
//! watchers when a slot is written.
//!
//! ## Architecture
//!
//! 1. **Observer**: [`observe`] converts a `serde_json::Value` into a [`Value`]
//!    whose mappings are [`ReactiveObject`]s. Every key of a reactive mapping is a
//!    [`Slot`] carrying its current value and a [`Dep`].
//! 2. **Dependency Tracking**: while a [`Watcher`] evaluates its expression for the
//!    first time it is the runtime's collection target, and every slot read during
//!    that evaluation appends it to the slot's [`Dep`].
//! 3. **Notification**: writing a slot notifies its [`Dep`], which calls
//!    [`Watcher::update`] on every subscriber in registration order, synchronously.
//!
//! ## Example
//!
//! ```ignore
//! use weave_reactive::{Watcher, observe};
//! use serde_json::json;
//!
//! let data = observe(json!({ "user": { "name": "A" } }));
//! let root = data.as_object().unwrap();
//!
//! let _watcher = Watcher::new(root, "user.name", |value| {
//!     println!("name is now {value}");
//!     Ok(())
//! })?;
//!
//! weave_reactive::expression::set_value(root, "user.name", "B")?; // prints "name is now B"
//! ```

pub mod dep;
pub mod error;
pub mod expression;
pub mod observer;
pub mod runtime;
pub mod value;
pub mod watcher;

pub use dep::Dep;
pub use error::{ReactiveError, ReactiveResult};
pub use expression::{get_content_value, get_value, set_value};
pub use observer::{ReactiveObject, Slot, observe};
pub use runtime::{Runtime, with_runtime};
pub use value::Value;
pub use watcher::Watcher;
