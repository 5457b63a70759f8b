//! # Weave
//!
//! A minimal reactive data-binding engine.
//!
//! Weave links a plain data mapping to a template fragment. Directives in the
//! template (`{{ }}` interpolation, `v-text`, `v-html`, `v-bind:<attr>`,
//! `v-model`, `v-on:<event>`) stay synchronized with the data, and input
//! events write back into it.
//!
//! ## Crates
//!
//! - [`reactive`]: observer, dependency sets, watchers and the expression
//!   evaluator
//! - [`dom`]: the host document seam and an in-memory document
//! - [`pages`]: the directive compiler and the view model facade
//!
//! ## Feature Flags
//!
//! The reactive core is always available. With default features off, the
//! facade exposes only [`reactive`].
//!
//! - `dom` - In-memory host document
//! - `pages` (default) - Directive compiler and view model; enables `dom`
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use weave::prelude::*;
//! use serde_json::json;
//!
//! let document = Document::parse(r#"<div id="app"><input v-model="name"><p>Hello {{ name }}</p></div>"#);
//! let vm = ViewModel::new(&document, Options::new("#app").data(json!({ "name": "A" })))?;
//!
//! let input = document.query_selector("input").unwrap();
//! document.input(input, "B")?;
//! assert_eq!(vm.get("name")?, Value::from("B"));
//! ```

pub use weave_reactive as reactive;

#[cfg(feature = "dom")]
pub use weave_dom as dom;

#[cfg(feature = "pages")]
pub use weave_pages as pages;

pub use weave_reactive::{ReactiveError, ReactiveObject, ReactiveResult, Value, Watcher, observe};

#[cfg(feature = "dom")]
pub use weave_dom::{Document, DomError, DomResult, Event, HostDocument, NodeId, NodeKind};

#[cfg(feature = "pages")]
pub use weave_pages::{BindError, BindResult, Directive, Options, ViewModel};

/// Commonly used types.
pub mod prelude {
	pub use crate::{ReactiveError, ReactiveObject, Value, Watcher, observe};

	#[cfg(feature = "dom")]
	pub use crate::{Document, Event, HostDocument, NodeKind};

	#[cfg(feature = "pages")]
	pub use crate::{BindError, BindResult, Options, ViewModel};
}
