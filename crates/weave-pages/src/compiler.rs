//! Directive compiler
//!
//! One depth-first pass over the descendants of the template root. Elements
//! have their `v-` attributes bound and removed; text nodes containing `{{ }}`
//! placeholders are bound as text. Each node's children are read after the
//! node is processed, so markup inserted by `v-html` is compiled as well.

use weave_dom::{HostDocument, NodeKind};
use weave_reactive::expression::has_placeholder;

use crate::directive::{Directive, bind_text};
use crate::error::BindResult;
use crate::view_model::ViewModel;

/// Compiles a template against a view model.
pub struct Compiler<D: HostDocument> {
	vm: ViewModel<D>,
}

impl<D: HostDocument> Compiler<D> {
	/// Creates a compiler binding to `vm`.
	pub fn new(vm: ViewModel<D>) -> Self {
		Self { vm }
	}

	/// Compiles the descendants of `root`. The root itself is not compiled.
	///
	/// Stops at the first failing directive.
	pub fn compile(&self, root: &D::Node) -> BindResult<()> {
		for child in self.vm.document().children(root) {
			match self.vm.document().kind(&child) {
				Some(NodeKind::Element) => self.compile_element(&child)?,
				Some(NodeKind::Text) => self.compile_text(&child)?,
				_ => {}
			}
			self.compile(&child)?;
		}
		Ok(())
	}

	fn compile_element(&self, node: &D::Node) -> BindResult<()> {
		let document = self.vm.document();
		for (name, value) in document.attributes(node) {
			let Some(directive) = Directive::parse(&name)? else {
				continue;
			};
			directive.bind(&self.vm, node, &value)?;
			document.remove_attribute(node, &name)?;
		}
		Ok(())
	}

	fn compile_text(&self, node: &D::Node) -> BindResult<()> {
		let text = self.vm.document().text_content(node);
		if has_placeholder(&text) {
			bind_text(&self.vm, node, &text)?;
		}
		Ok(())
	}
}
