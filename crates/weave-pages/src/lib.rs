//! # Weave Pages
//!
//! Binds reactive data to a template.
//!
//! A [`ViewModel`] takes [`Options`] (a root selector, a data mapping and
//! named methods), makes the data reactive and compiles the template below the
//! root once. Compilation turns every directive into one or more
//! [`Watcher`](weave_reactive::Watcher)s whose callbacks write through the
//! [`updater`].
//!
//! ## Directives
//!
//! | attribute | effect |
//! |---|---|
//! | `v-text="expr"` | text content follows `expr` |
//! | `v-html="expr"` | markup content follows `expr`, unsanitized |
//! | `v-model="expr"` | input value follows `expr`; `input` events write back |
//! | `v-bind:attr="expr"` | attribute `attr` follows `expr` |
//! | `v-on:event="method"` | `event` calls the named method |
//!
//! Text nodes containing `{{ expr }}` placeholders are rendered and kept up to
//! date as well.
//!
//! ## Example
//!
//! ```ignore
//! use weave_pages::{Options, ViewModel};
//! use weave_dom::{Document, Event};
//! use serde_json::json;
//!
//! let document = Document::parse(r#"<div id="app"><p>{{ count }}</p><button v-on:click="inc">+</button></div>"#);
//! let options = Options::new("#app")
//!     .data(json!({ "count": 0 }))
//!     .method("inc", |vm, _event| {
//!         let count = vm.get("count")?.as_i64().unwrap_or(0);
//!         vm.set("count", count + 1)
//!     });
//!
//! let vm = ViewModel::new(&document, options)?;
//! ```

pub mod compiler;
pub mod directive;
pub mod error;
pub mod options;
pub mod updater;
pub mod view_model;

pub use compiler::Compiler;
pub use directive::Directive;
pub use error::{BindError, BindResult};
pub use options::{Method, Methods, Options};
pub use view_model::ViewModel;
