//! UI framework renderers.
//!
//! A [`Renderer`] adapts one UI framework: it decides whether it can render a
//! component, renders it to static markup and describes how the client
//! hydrates it. Renderers are tried in registration order.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::component::{ComponentId, ComponentRef};
use crate::directive::{ClientDirective, HydrationMetadata};
use crate::error::{BoxError, RenderError, RenderResult};
use crate::props::Props;
use crate::slots::RenderedSlots;

/// Renderer for components authored in the host template language.
///
/// It is never offered as a probable renderer and its output is written as-is.
pub const PASS_THROUGH_RENDERER: &str = "astro:jsx";

/// Renderer allowed to hydrate without a client entrypoint.
pub const ENTRYPOINT_EXEMPT_RENDERER: &str = "@astrojs/lit";

/// Static markup produced by a renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticMarkup {
	pub html: String,
	/// Extra attributes for the island element.
	pub attrs: Option<Vec<(String, String)>>,
}

impl StaticMarkup {
	pub fn new(html: impl Into<String>) -> Self {
		Self {
			html: html.into(),
			attrs: None,
		}
	}

	pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attrs
			.get_or_insert_with(Vec::new)
			.push((name.into(), value.into()));
		self
	}
}

/// Metadata passed to [`Renderer::render_to_static_markup`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderMetadata {
	pub display_name: String,
	/// Always `true`; renderers may emit static slot markers.
	pub static_slot: bool,
	pub hydrate: Option<ClientDirective>,
	pub hydrate_args: Option<Value>,
	pub component_export: Option<String>,
	pub component_url: Option<String>,
}

impl RenderMetadata {
	pub fn new(display_name: impl Into<String>) -> Self {
		Self {
			display_name: display_name.into(),
			static_slot: true,
			hydrate: None,
			hydrate_args: None,
			component_export: None,
			component_url: None,
		}
	}

	/// Copies the hydration settings into the metadata.
	pub fn with_hydration(mut self, hydration: &HydrationMetadata) -> Self {
		self.hydrate = Some(hydration.directive.clone());
		self.hydrate_args = Some(hydration.value.clone());
		self.component_export = Some(hydration.component_export.clone());
		self.component_url = Some(hydration.component_url.clone());
		self
	}

	pub fn is_client_only(&self) -> bool {
		self.hydrate.as_ref().is_some_and(ClientDirective::is_only)
	}
}

/// Adapter for a UI framework.
#[async_trait]
pub trait Renderer: Send + Sync {
	/// Unique renderer name, e.g. `@astrojs/react`.
	fn name(&self) -> &str;

	/// Returns `true` if this renderer can render `component`.
	async fn check(
		&self,
		component: ComponentRef<'_>,
		props: &Props,
		children: &RenderedSlots,
	) -> Result<bool, BoxError>;

	/// Renders `component` to static HTML.
	async fn render_to_static_markup(
		&self,
		component: ComponentRef<'_>,
		props: &Props,
		children: &RenderedSlots,
		metadata: &RenderMetadata,
	) -> Result<StaticMarkup, BoxError>;

	/// Module the client loads to hydrate islands rendered by this renderer.
	fn client_entrypoint(&self) -> Option<&str> {
		None
	}

	/// Whether rendered markup marks non-hydrated slots with
	/// `astro-static-slot` instead of `astro-slot`.
	fn supports_static_slot_markers(&self) -> bool {
		false
	}

	/// Inline script required once per page before islands hydrate.
	fn hydration_script(&self) -> Option<String> {
		None
	}
}

/// Ordered collection of renderers.
#[derive(Clone, Default)]
pub struct RendererRegistry {
	renderers: Vec<Arc<dyn Renderer>>,
}

impl RendererRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a renderer.
	///
	/// # Errors
	///
	/// Returns [`RenderError::DuplicateRenderer`] if the name is taken.
	pub fn register(&mut self, renderer: Arc<dyn Renderer>) -> RenderResult<()> {
		if self.get(renderer.name()).is_some() {
			return Err(RenderError::DuplicateRenderer(renderer.name().to_string()));
		}
		tracing::debug!(renderer = renderer.name(), "registered renderer");
		self.renderers.push(renderer);
		Ok(())
	}

	/// Builder form of [`register`](Self::register).
	pub fn with(mut self, renderer: impl Renderer + 'static) -> RenderResult<Self> {
		self.register(Arc::new(renderer))?;
		Ok(self)
	}

	pub fn get(&self, name: &str) -> Option<&Arc<dyn Renderer>> {
		self.renderers.iter().find(|r| r.name() == name)
	}

	pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Renderer>> {
		self.renderers.iter()
	}

	/// Renderers other than the pass-through renderer.
	pub fn valid_renderers(&self) -> Vec<&Arc<dyn Renderer>> {
		self.renderers
			.iter()
			.filter(|r| r.name() != PASS_THROUGH_RENDERER)
			.collect()
	}

	pub fn names(&self) -> Vec<&str> {
		self.renderers.iter().map(|r| r.name()).collect()
	}

	pub fn len(&self) -> usize {
		self.renderers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.renderers.is_empty()
	}
}

impl fmt::Debug for RendererRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RendererRegistry")
			.field("renderers", &self.names())
			.finish()
	}
}

/// Renderer names recorded for components at build time.
///
/// A component with an entry is rendered by that renderer without running any
/// capability check.
#[derive(Debug, Clone, Default)]
pub struct RendererHints {
	tags: HashMap<ComponentId, String>,
}

impl RendererHints {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records `renderer` for `component`.
	pub fn tag(&mut self, component: impl Into<ComponentId>, renderer: impl Into<String>) {
		self.tags.insert(component.into(), renderer.into());
	}

	/// Builder form of [`tag`](Self::tag).
	pub fn with(mut self, component: impl Into<ComponentId>, renderer: impl Into<String>) -> Self {
		self.tag(component, renderer);
		self
	}

	pub fn renderer_for(&self, component: &ComponentId) -> Option<&str> {
		self.tags.get(component).map(String::as_str)
	}
}
