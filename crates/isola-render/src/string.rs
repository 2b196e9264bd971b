//! Rendering components to strings.

use std::sync::LazyLock;

use regex::Regex;

use crate::chunk::{RenderChunk, RenderDestination, RenderInstruction};
use crate::component::ComponentValue;
use crate::context::RenderContext;
use crate::dispatch::render_component;
use crate::error::RenderResult;
use crate::props::Props;
use crate::slots::ComponentSlots;

static DOCTYPE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)<!doctype html").expect("valid doctype pattern"));

/// Page being rendered by [`render_component_to_string`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRoute {
	/// Source file of the page component, attached to diagnostics.
	pub component: Option<String>,
}

impl PageRoute {
	pub fn new(component: impl Into<String>) -> Self {
		Self {
			component: Some(component.into()),
		}
	}
}

/// Collects chunks into a string, prefixing the doctype for pages.
struct StringDestination<'a> {
	ctx: &'a RenderContext,
	out: String,
	/// Doctype and head, written before the first chunk unless it has a doctype.
	prelude: Option<String>,
}

impl RenderDestination for StringDestination<'_> {
	fn write(&mut self, chunk: RenderChunk) {
		if let Some(prelude) = self.prelude.take() {
			let has_doctype = match &chunk {
				RenderChunk::Markup(html) => DOCTYPE.is_match(html),
				RenderChunk::Bytes(bytes) => DOCTYPE.is_match(&String::from_utf8_lossy(bytes)),
				_ => false,
			};
			if !has_doctype {
				self.out.push_str(&prelude);
			}
		}
		if matches!(chunk, RenderChunk::Response(_)) {
			return;
		}
		self.out.push_str(&self.ctx.chunk_to_string(&chunk));
	}
}

/// Renders a component and collects its output into a string.
///
/// With a `page`, the output of a non-partial render starts with
/// `<!DOCTYPE html>` unless the component writes its own doctype. Framework
/// page components flagged for head rendering also get the head content.
/// Instructions are resolved through the context's script collector and
/// response chunks are dropped.
///
/// # Errors
///
/// Any error from [`render_component`] or from rendering the instance.
/// Diagnostics without a location get the page's component file attached.
pub async fn render_component_to_string(
	ctx: &RenderContext,
	display_name: &str,
	component: ComponentValue,
	props: Props,
	slots: ComponentSlots,
	page: Option<&PageRoute>,
) -> RenderResult<String> {
	let options = ctx.options();
	let prelude = match page {
		Some(_) if !options.partial => {
			let mut prelude = String::from("<!DOCTYPE html>");
			if !options.compress_html {
				prelude.push('\n');
			}
			if component.needs_head_rendering() {
				prelude.push_str(&ctx.instruction_to_string(&RenderInstruction::MaybeHead));
			}
			Some(prelude)
		}
		_ => None,
	};

	let mut destination = StringDestination {
		ctx,
		out: String::new(),
		prelude,
	};

	let result = async {
		let instance = render_component(ctx, display_name, component, props, slots).await?;
		instance.render(&mut destination).await
	}
	.await;

	match result {
		Ok(()) => Ok(destination.out),
		Err(mut err) => {
			if let Some(file) = page.and_then(|p| p.component.as_deref()) {
				err.attach_location(file);
			}
			Err(err)
		}
	}
}
