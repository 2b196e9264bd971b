//! Renderer resolution.
//!
//! Picks the renderer for a framework component or custom element tag:
//!
//! 1. A build-time hint naming a registered renderer wins outright.
//! 2. Otherwise renderers are asked in registration order and the first one
//!    whose check passes wins.
//! 3. `client:only` components are never checked. The renderer comes from
//!    the directive argument, the only installed renderer or the component's
//!    file extension.
//!
//! When nothing claims a component the outcome depends on what it is, see
//! [`Resolution`].

use std::sync::Arc;

use tracing::{debug, warn};

use crate::component::ComponentRef;
use crate::error::{Diagnostic, RenderError, RenderResult};
use crate::props::Props;
use crate::renderer::{
	ENTRYPOINT_EXEMPT_RENDERER, RenderMetadata, Renderer, RendererHints, RendererRegistry,
};
use crate::slots::RenderedSlots;

/// Framework names accepted as `client:only` arguments.
const CLIENT_ONLY_VALUES: &[&str] = &["solid-js", "react", "preact", "vue", "svelte", "lit"];

/// Returns the canonical name for a `client:only` argument.
fn renderer_alias(name: &str) -> &str {
	match name {
		"solid" => "solid-js",
		other => other,
	}
}

/// Returns the extension of `url`, if it has one.
pub fn component_extension(url: Option<&str>) -> Option<&str> {
	let file = url?.rsplit('/').next()?;
	let (_, ext) = file.rsplit_once('.')?;
	Some(ext)
}

/// Names of the renderers likely to handle a component, based on its URL.
///
/// # Examples
///
/// ```
/// use isola_render::resolve::guess_renderers;
///
/// assert_eq!(guess_renderers(Some("/src/Counter.svelte")), vec!["@astrojs/svelte"]);
/// assert_eq!(guess_renderers(None).len(), 6);
/// ```
pub fn guess_renderers(component_url: Option<&str>) -> Vec<&'static str> {
	match component_extension(component_url) {
		Some("svelte") => vec!["@astrojs/svelte"],
		Some("vue") => vec!["@astrojs/vue"],
		Some("jsx") | Some("tsx") => vec![
			"@astrojs/react",
			"@astrojs/preact",
			"@astrojs/solid-js",
			"@astrojs/vue (jsx)",
		],
		_ => vec![
			"@astrojs/react",
			"@astrojs/preact",
			"@astrojs/solid-js",
			"@astrojs/vue",
			"@astrojs/svelte",
			"@astrojs/lit",
		],
	}
}

/// Input to [`resolve_renderer`].
#[derive(Debug, Clone, Copy)]
pub struct ResolveRequest<'a> {
	pub component: ComponentRef<'a>,
	pub props: &'a Props,
	pub children: &'a RenderedSlots,
	pub metadata: &'a RenderMetadata,
}

/// Outcome of renderer resolution.
#[derive(Clone)]
pub enum Resolution {
	/// A renderer claimed the component.
	Claimed(Arc<dyn Renderer>),
	/// Unclaimed custom element constructor, serialized as a plain element.
	NativeElement,
	/// The single probable renderer, used although its check failed so that
	/// its own error surfaces.
	Forced(Arc<dyn Renderer>),
	/// Unclaimed tag string, serialized as a plain element.
	Unclaimed,
}

impl Resolution {
	/// Returns the renderer that will render the component, if any.
	pub fn renderer(&self) -> Option<&Arc<dyn Renderer>> {
		match self {
			Self::Claimed(r) | Self::Forced(r) => Some(r),
			Self::NativeElement | Self::Unclaimed => None,
		}
	}
}

impl std::fmt::Debug for Resolution {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Claimed(r) => f.debug_tuple("Claimed").field(&r.name()).finish(),
			Self::NativeElement => f.write_str("NativeElement"),
			Self::Forced(r) => f.debug_tuple("Forced").field(&r.name()).finish(),
			Self::Unclaimed => f.write_str("Unclaimed"),
		}
	}
}

/// Resolves the renderer for a component.
///
/// # Errors
///
/// - the first capability-check error, when no renderer claimed the component
/// - [`DiagnosticCode::NoClientOnlyHint`](crate::error::DiagnosticCode::NoClientOnlyHint)
///   for unresolved `client:only` components
/// - [`DiagnosticCode::NoMatchingRenderer`](crate::error::DiagnosticCode::NoMatchingRenderer)
///   and [`DiagnosticCode::AmbiguousRenderer`](crate::error::DiagnosticCode::AmbiguousRenderer)
///   for unclaimed framework components
pub async fn resolve_renderer(
	registry: &RendererRegistry,
	hints: &RendererHints,
	request: ResolveRequest<'_>,
) -> RenderResult<Resolution> {
	let metadata = request.metadata;
	let component_url = metadata.component_url.as_deref();
	let probable = guess_renderers(component_url);
	let valid = registry.valid_renderers();

	let renderer = if metadata.is_client_only() {
		resolve_client_only(registry, &valid, metadata)
	} else {
		let claimed = match hinted_renderer(registry, hints, request.component) {
			Some(renderer) => Some(renderer),
			None => check_renderers(registry, &request).await?,
		};
		if claimed.is_none()
			&& let Some(element) = request.component.framework().and_then(|c| c.native_element())
		{
			debug!(
				component = %metadata.display_name,
				element = %element.element_name(),
				"no renderer claimed native element, serializing directly"
			);
			return Ok(Resolution::NativeElement);
		}
		claimed
	};

	if let Some(renderer) = renderer {
		debug!(
			component = %metadata.display_name,
			renderer = renderer.name(),
			"resolved renderer"
		);
		return Ok(Resolution::Claimed(renderer));
	}

	if metadata.is_client_only() {
		return Err(Diagnostic::no_client_only_hint(&metadata.display_name, &probable).into());
	}

	if request.component.is_tag() {
		debug!(component = %metadata.display_name, "no renderer claimed tag, using element fallback");
		return Ok(Resolution::Unclaimed);
	}

	let matching: Vec<&Arc<dyn Renderer>> = valid
		.iter()
		.copied()
		.filter(|r| probable.iter().any(|name| *name == r.name()))
		.collect();
	match matching.as_slice() {
		[] => Err(Diagnostic::no_matching_renderer(
			&metadata.display_name,
			component_extension(component_url),
			valid.len(),
			&probable,
		)
		.into()),
		[only] => {
			debug!(
				component = %metadata.display_name,
				renderer = only.name(),
				"no renderer claimed component, rendering through the only probable renderer"
			);
			Ok(Resolution::Forced(Arc::clone(*only)))
		}
		_ => Err(Diagnostic::ambiguous_renderer(&metadata.display_name, &probable).into()),
	}
}

fn hinted_renderer(
	registry: &RendererRegistry,
	hints: &RendererHints,
	component: ComponentRef<'_>,
) -> Option<Arc<dyn Renderer>> {
	let component = component.framework()?;
	let name = hints.renderer_for(component.id())?;
	match registry.get(name) {
		Some(renderer) => {
			debug!(component = %component.id(), renderer = name, "renderer hint hit");
			Some(Arc::clone(renderer))
		}
		None => {
			debug!(component = %component.id(), renderer = name, "hinted renderer is not registered");
			None
		}
	}
}

async fn check_renderers(
	registry: &RendererRegistry,
	request: &ResolveRequest<'_>,
) -> RenderResult<Option<Arc<dyn Renderer>>> {
	let mut first_error: Option<RenderError> = None;
	for renderer in registry.iter() {
		match renderer
			.check(request.component, request.props, request.children)
			.await
		{
			Ok(true) => return Ok(Some(Arc::clone(renderer))),
			Ok(false) => {}
			Err(err) => {
				warn!(
					renderer = renderer.name(),
					error = %err,
					"renderer check failed"
				);
				if first_error.is_none() {
					first_error = Some(RenderError::component(Some(renderer.name()), err));
				}
			}
		}
	}
	match first_error {
		Some(err) => Err(err),
		None => Ok(None),
	}
}

fn find_client_only(valid: &[&Arc<dyn Renderer>], name: &str) -> Option<Arc<dyn Renderer>> {
	let prefixed = format!("@astrojs/{name}");
	valid
		.iter()
		.find(|r| r.name() == prefixed || r.name() == name)
		.map(|r| Arc::clone(*r))
}

fn resolve_client_only(
	registry: &RendererRegistry,
	valid: &[&Arc<dyn Renderer>],
	metadata: &RenderMetadata,
) -> Option<Arc<dyn Renderer>> {
	if let Some(arg) = metadata.hydrate_args.as_ref().and_then(|v| v.as_str()) {
		let name = renderer_alias(arg);
		if CLIENT_ONLY_VALUES.iter().any(|value| *value == name)
			&& let Some(renderer) = find_client_only(valid, name)
		{
			return Some(renderer);
		}
	}

	if let [only] = valid {
		return Some(Arc::clone(*only));
	}

	let ext = component_extension(metadata.component_url.as_deref())?;
	let found = find_client_only(valid, ext);
	if found.is_none() {
		debug!(
			component = %metadata.display_name,
			extension = ext,
			renderers = ?registry.names(),
			"no renderer matches client:only component extension"
		);
	}
	found
}

/// Rejects hydrated components whose renderer has no client entrypoint.
pub fn validate_client_entrypoint(
	renderer: &dyn Renderer,
	metadata: &RenderMetadata,
) -> RenderResult<()> {
	let Some(directive) = &metadata.hydrate else {
		return Ok(());
	};
	if renderer.client_entrypoint().is_none() && renderer.name() != ENTRYPOINT_EXEMPT_RENDERER {
		return Err(Diagnostic::no_client_entrypoint(
			&metadata.display_name,
			directive.as_str(),
			renderer.name(),
		)
		.into());
	}
	Ok(())
}
