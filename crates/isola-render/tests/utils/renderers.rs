//! Configurable renderer used across integration tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use isola_render::prelude::*;

type RenderFn = Arc<dyn Fn(&Props, &RenderedSlots) -> String + Send + Sync>;

/// What [`MockRenderer::check`] answers.
#[derive(Clone)]
pub enum Claim {
	/// Claims every component.
	All,
	/// Claims nothing.
	Nothing,
	/// Claims framework components with this id.
	Component(&'static str),
	/// Fails with this message.
	Error(&'static str),
}

/// Renderer whose behavior is set per test.
#[derive(Clone)]
pub struct MockRenderer {
	name: String,
	claim: Claim,
	render: RenderFn,
	render_error: Option<&'static str>,
	entrypoint: Option<String>,
	static_markers: bool,
	hydration_script: Option<String>,
	attrs: Vec<(String, String)>,
	checks: Arc<AtomicUsize>,
	renders: Arc<AtomicUsize>,
}

impl MockRenderer {
	pub fn new(name: &str) -> Self {
		Self {
			name: name.to_string(),
			claim: Claim::Nothing,
			render: Arc::new(|_: &Props, _: &RenderedSlots| String::new()),
			render_error: None,
			entrypoint: None,
			static_markers: false,
			hydration_script: None,
			attrs: Vec::new(),
			checks: Arc::new(AtomicUsize::new(0)),
			renders: Arc::new(AtomicUsize::new(0)),
		}
	}

	pub fn claims(mut self, claim: Claim) -> Self {
		self.claim = claim;
		self
	}

	pub fn html(mut self, html: &'static str) -> Self {
		self.render = Arc::new(move |_: &Props, _: &RenderedSlots| html.to_string());
		self
	}

	pub fn renders<F>(mut self, render: F) -> Self
	where
		F: Fn(&Props, &RenderedSlots) -> String + Send + Sync + 'static,
	{
		self.render = Arc::new(render);
		self
	}

	pub fn render_error(mut self, message: &'static str) -> Self {
		self.render_error = Some(message);
		self
	}

	pub fn entrypoint(mut self, url: &str) -> Self {
		self.entrypoint = Some(url.to_string());
		self
	}

	pub fn static_markers(mut self) -> Self {
		self.static_markers = true;
		self
	}

	pub fn hydration_script(mut self, script: &str) -> Self {
		self.hydration_script = Some(script.to_string());
		self
	}

	pub fn attr(mut self, name: &str, value: &str) -> Self {
		self.attrs.push((name.to_string(), value.to_string()));
		self
	}

	/// Counter of `check` calls, shared with clones.
	pub fn check_counter(&self) -> Arc<AtomicUsize> {
		Arc::clone(&self.checks)
	}

	/// Counter of `render_to_static_markup` calls, shared with clones.
	pub fn render_counter(&self) -> Arc<AtomicUsize> {
		Arc::clone(&self.renders)
	}
}

#[async_trait]
impl Renderer for MockRenderer {
	fn name(&self) -> &str {
		&self.name
	}

	async fn check(
		&self,
		component: ComponentRef<'_>,
		_props: &Props,
		_children: &RenderedSlots,
	) -> Result<bool, BoxError> {
		self.checks.fetch_add(1, Ordering::SeqCst);
		match &self.claim {
			Claim::All => Ok(true),
			Claim::Nothing => Ok(false),
			Claim::Component(id) => {
				Ok(component.framework().is_some_and(|c| c.id().as_str() == *id))
			}
			Claim::Error(message) => Err((*message).into()),
		}
	}

	async fn render_to_static_markup(
		&self,
		_component: ComponentRef<'_>,
		props: &Props,
		children: &RenderedSlots,
		_metadata: &RenderMetadata,
	) -> Result<StaticMarkup, BoxError> {
		self.renders.fetch_add(1, Ordering::SeqCst);
		if let Some(message) = self.render_error {
			return Err(message.into());
		}
		let mut markup = StaticMarkup::new((self.render)(props, children));
		for (name, value) in &self.attrs {
			markup = markup.with_attr(name.as_str(), value.as_str());
		}
		Ok(markup)
	}

	fn client_entrypoint(&self) -> Option<&str> {
		self.entrypoint.as_deref()
	}

	fn supports_static_slot_markers(&self) -> bool {
		self.static_markers
	}

	fn hydration_script(&self) -> Option<String> {
		self.hydration_script.clone()
	}
}
