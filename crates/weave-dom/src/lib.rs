//! # Weave DOM
//!
//! The host document seam of weave.
//!
//! The binding engine never owns a document. It talks to one through
//! [`HostDocument`], which only exposes what the directive compiler needs: child
//! enumeration, node kinds, text content, attribute enumeration and removal,
//! the four view writes (text, attribute, markup, value) and event
//! subscription.
//!
//! [`Document`] is an in-memory implementation: an arena of nodes parsed from
//! HTML fragments, with simple selector lookup, HTML serialization and
//! synthetic event dispatch.
//!
//! ## Example
//!
//! ```ignore
//! use weave_dom::{Document, Event, HostDocument, listener};
//!
//! let document = Document::parse(r#"<div id="app"><button>go</button></div>"#);
//! let app = document.query_selector("#app").unwrap();
//! let button = document.children(&app)[0];
//!
//! document.add_event_listener(&button, "click", listener(|_event| Ok(())))?;
//! document.dispatch_event(button, &Event::new("click"))?;
//! ```

pub mod document;
pub mod error;
pub mod event;
pub mod host;
mod html;

pub use document::{Document, NodeId};
pub use error::{DomError, DomResult};
pub use event::{Event, EventListener, ListenerResult, listener};
pub use host::{HostDocument, NodeKind};
