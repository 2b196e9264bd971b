//! Render context.
//!
//! A [`RenderContext`] holds everything a page render needs: options, the
//! renderer registry, build-time renderer hints, the directive extractor, the
//! slot renderer, the module resolver and the page's script collection state.
//!
//! # Thread Safety
//!
//! The context is cheap to clone and can be moved into spawned tasks. One
//! context corresponds to one page render.

use std::fmt;
use std::sync::Arc;

use crate::chunk::{RenderChunk, RenderInstruction};
use crate::collector::ScriptCollector;
use crate::directive::{ClientDirectiveExtractor, DirectiveExtractor};
use crate::options::RenderOptions;
use crate::renderer::{RendererHints, RendererRegistry};
use crate::slots::{DefaultSlotRenderer, SlotRenderer};

/// Resolves module specifiers to URLs the client can load.
pub trait ModuleResolver: Send + Sync {
	fn resolve(&self, specifier: &str) -> String;
}

/// Resolver returning specifiers unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityResolver;

impl ModuleResolver for IdentityResolver {
	fn resolve(&self, specifier: &str) -> String {
		specifier.to_string()
	}
}

impl<F> ModuleResolver for F
where
	F: Fn(&str) -> String + Send + Sync,
{
	fn resolve(&self, specifier: &str) -> String {
		self(specifier)
	}
}

struct ContextInner {
	options: RenderOptions,
	registry: RendererRegistry,
	hints: RendererHints,
	directives: Arc<dyn DirectiveExtractor>,
	slots: Arc<dyn SlotRenderer>,
	resolver: Arc<dyn ModuleResolver>,
	scripts: ScriptCollector,
}

/// Shared state of a page render.
#[derive(Clone)]
pub struct RenderContext {
	inner: Arc<ContextInner>,
}

impl RenderContext {
	/// Creates a context builder.
	pub fn builder() -> RenderContextBuilder {
		RenderContextBuilder::new()
	}

	pub fn options(&self) -> &RenderOptions {
		&self.inner.options
	}

	pub fn registry(&self) -> &RendererRegistry {
		&self.inner.registry
	}

	pub fn hints(&self) -> &RendererHints {
		&self.inner.hints
	}

	pub fn directive_extractor(&self) -> &dyn DirectiveExtractor {
		self.inner.directives.as_ref()
	}

	pub fn slot_renderer(&self) -> &dyn SlotRenderer {
		self.inner.slots.as_ref()
	}

	pub fn resolver(&self) -> &dyn ModuleResolver {
		self.inner.resolver.as_ref()
	}

	pub fn scripts(&self) -> &ScriptCollector {
		&self.inner.scripts
	}

	/// Converts an instruction into markup, recording emitted scripts.
	pub fn instruction_to_string(&self, instruction: &RenderInstruction) -> String {
		self.inner.scripts.stringify(&self.inner.options, instruction)
	}

	/// Converts a chunk into markup. Responses convert to an empty string.
	pub fn chunk_to_string(&self, chunk: &RenderChunk) -> String {
		match chunk {
			RenderChunk::Markup(html) => html.clone(),
			RenderChunk::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
			RenderChunk::Instruction(instruction) => self.instruction_to_string(instruction),
			RenderChunk::Response(_) => String::new(),
		}
	}
}

impl Default for RenderContext {
	fn default() -> Self {
		Self::builder().build()
	}
}

impl fmt::Debug for RenderContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RenderContext")
			.field("options", &self.inner.options)
			.field("registry", &self.inner.registry)
			.field("hints", &self.inner.hints)
			.finish_non_exhaustive()
	}
}

/// Builder for [`RenderContext`].
pub struct RenderContextBuilder {
	options: RenderOptions,
	registry: RendererRegistry,
	hints: RendererHints,
	directives: Arc<dyn DirectiveExtractor>,
	slots: Arc<dyn SlotRenderer>,
	resolver: Arc<dyn ModuleResolver>,
}

impl RenderContextBuilder {
	pub fn new() -> Self {
		Self {
			options: RenderOptions::default(),
			registry: RendererRegistry::default(),
			hints: RendererHints::default(),
			directives: Arc::new(ClientDirectiveExtractor),
			slots: Arc::new(DefaultSlotRenderer),
			resolver: Arc::new(IdentityResolver),
		}
	}

	pub fn options(mut self, options: RenderOptions) -> Self {
		self.options = options;
		self
	}

	pub fn registry(mut self, registry: RendererRegistry) -> Self {
		self.registry = registry;
		self
	}

	pub fn hints(mut self, hints: RendererHints) -> Self {
		self.hints = hints;
		self
	}

	/// Replaces the directive extractor.
	pub fn directive_extractor(mut self, extractor: impl DirectiveExtractor + 'static) -> Self {
		self.directives = Arc::new(extractor);
		self
	}

	/// Replaces the slot renderer.
	pub fn slot_renderer(mut self, renderer: impl SlotRenderer + 'static) -> Self {
		self.slots = Arc::new(renderer);
		self
	}

	/// Replaces the module resolver.
	pub fn resolver(mut self, resolver: impl ModuleResolver + 'static) -> Self {
		self.resolver = Arc::new(resolver);
		self
	}

	pub fn build(self) -> RenderContext {
		RenderContext {
			inner: Arc::new(ContextInner {
				options: self.options,
				registry: self.registry,
				hints: self.hints,
				directives: self.directives,
				slots: self.slots,
				resolver: self.resolver,
				scripts: ScriptCollector::new(),
			}),
		}
	}
}

impl Default for RenderContextBuilder {
	fn default() -> Self {
		Self::new()
	}
}
