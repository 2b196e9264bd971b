//! Hydration islands.
//!
//! A hydrated component is wrapped in an `astro-island` element that tells the
//! client runtime which module to load, which renderer hydrates it and with
//! which props. Slots the renderer did not place in its markup are shipped as
//! inert `<template>` elements so the client can still mount them.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::context::RenderContext;
use crate::directive::HydrationMetadata;
use crate::error::{Diagnostic, RenderResult};
use crate::html::{escape_html, render_element};
use crate::props::{Props, serialize_props};
use crate::renderer::{RenderMetadata, Renderer};
use crate::slots::{DEFAULT_SLOT, RenderedSlots};

/// Tag name of the island element.
pub const ISLAND_TAG: &str = "astro-island";

/// Marker appended after hosted children.
pub const ISLAND_END_MARKER: &str = "<!--astro:end-->";

static STATIC_SLOT_MARKER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"</?astro-static-slot\b[^>]*>").expect("valid marker pattern"));
static SLOT_MARKER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"</?astro-slot\b[^>]*>").expect("valid marker pattern"));

const BASE62: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Hashes `text` to a short base62 string.
///
/// The first 128 bits of the SHA-256 digest are rendered in base62.
///
/// # Examples
///
/// ```
/// use isola_render::island::short_hash;
///
/// assert_eq!(short_hash("a"), short_hash("a"));
/// assert_ne!(short_hash("a"), short_hash("b"));
/// ```
pub fn short_hash(text: &str) -> String {
	let digest = Sha256::digest(text.as_bytes());
	let mut head = [0u8; 16];
	head.copy_from_slice(&digest[..16]);
	let mut n = u128::from_be_bytes(head);

	let mut out = Vec::with_capacity(22);
	loop {
		out.push(BASE62[(n % 62) as usize]);
		n /= 62;
		if n == 0 {
			break;
		}
	}
	out.reverse();
	out.into_iter().map(char::from).collect()
}

/// Computes the identity of an island.
///
/// Identical export, URL, static markup and serialized props always give the
/// same identity, so repeated islands share a `uid`.
pub fn island_identity(
	component_export: &str,
	component_url: &str,
	html: &str,
	serialized_props: &str,
) -> String {
	short_hash(&format!(
		"<!--{component_export}:{component_url}-->\n{html}\n{serialized_props}"
	))
}

/// The `astro-island` element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IslandElement {
	/// Attributes, already escaped.
	pub props: Props,
	/// Hosted markup.
	pub children: String,
}

impl IslandElement {
	/// Serializes the element.
	pub fn to_html(&self) -> String {
		render_element(ISLAND_TAG, &self.props, &self.children, false)
	}

	fn set(&mut self, name: &str, value: impl Into<String>) {
		self.props
			.insert(name.to_string(), Value::String(value.into()));
	}
}

/// Input to [`generate_hydrate_script`].
#[derive(Clone, Copy)]
pub struct HydrateScriptOptions<'a> {
	pub renderer: &'a dyn Renderer,
	/// Island identity, see [`island_identity`].
	pub uid: &'a str,
	/// Props without directives.
	pub props: &'a Props,
	/// Extra attributes returned by the renderer.
	pub attrs: Option<&'a [(String, String)]>,
}

/// Builds the island element for a hydrated component.
///
/// Attributes, in order: `uid`, renderer attributes, `component-url`, then
/// `component-export`, `renderer-url` and `props` when the renderer has a
/// client entrypoint, `ssr`, `client`, `before-hydration-url` when configured
/// and `opts`.
///
/// # Errors
///
/// Returns [`DiagnosticCode::NoMatchingImport`](crate::error::DiagnosticCode::NoMatchingImport)
/// when the component has no export name.
pub fn generate_hydrate_script(
	ctx: &RenderContext,
	options: HydrateScriptOptions<'_>,
	metadata: &RenderMetadata,
	hydration: &HydrationMetadata,
) -> RenderResult<IslandElement> {
	if hydration.component_export.is_empty() {
		return Err(Diagnostic::no_matching_import(&metadata.display_name).into());
	}

	let resolver = ctx.resolver();
	let mut island = IslandElement::default();
	island.set("uid", options.uid);
	for (name, value) in options.attrs.unwrap_or_default() {
		island.set(name, escape_html(value));
	}
	island.set("component-url", resolver.resolve(&hydration.component_url));

	if let Some(entrypoint) = options.renderer.client_entrypoint() {
		island.set("component-export", hydration.component_export.as_str());
		island.set("renderer-url", resolver.resolve(entrypoint));
		island.set("props", escape_html(&serialize_props(options.props)));
	}

	island.set("ssr", "");
	island.set("client", hydration.directive.as_str());

	if let Some(url) = ctx.options().before_hydration_url.as_deref()
		&& !url.is_empty()
	{
		island.set("before-hydration-url", resolver.resolve(url));
	}

	let opts = serde_json::json!({
		"name": metadata.display_name,
		"value": directive_value(&hydration.value),
	});
	island.set("opts", escape_html(&opts.to_string()));

	Ok(island)
}

/// Directive argument as shipped in `opts`; falsy values become `""`.
fn directive_value(value: &Value) -> Value {
	let falsy = match value {
		Value::Null => true,
		Value::Bool(b) => !b,
		Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
		Value::String(s) => s.is_empty(),
		Value::Array(_) | Value::Object(_) => false,
	};
	if falsy {
		Value::String(String::new())
	} else {
		value.clone()
	}
}

/// Tag name renderers use to mark where a slot was placed.
pub fn slot_marker(supports_static_slot_markers: bool, hydrating: bool) -> &'static str {
	if supports_static_slot_markers && !hydrating {
		"astro-static-slot"
	} else {
		"astro-slot"
	}
}

/// Returns the slots whose marker does not appear in `html`.
///
/// Every slot is unrendered when `html` is empty.
pub fn unrendered_slots<'a>(html: &str, children: &'a RenderedSlots, marker: &str) -> Vec<&'a str> {
	children
		.iter()
		.map(|(name, _)| name)
		.filter(|name| {
			if html.is_empty() {
				return true;
			}
			let expected = if *name == DEFAULT_SLOT {
				format!("<{marker}>")
			} else {
				format!("<{marker} name=\"{name}\">")
			};
			!html.contains(&expected)
		})
		.collect()
}

/// Wraps unrendered slots in inert templates.
pub fn slot_templates(unrendered: &[&str], children: &RenderedSlots) -> String {
	unrendered
		.iter()
		.map(|name| {
			let content = children.get(name).map(String::as_str).unwrap_or_default();
			if *name == DEFAULT_SLOT {
				format!("<template data-astro-template>{content}</template>")
			} else {
				format!("<template data-astro-template=\"{name}\">{content}</template>")
			}
		})
		.collect()
}

/// Strips slot marker tags from non-hydrated markup.
///
/// Removes `astro-static-slot` tags when the renderer emits them and
/// `astro-slot` tags otherwise.
pub fn remove_slot_markers(html: &str, supports_static_slot_markers: bool) -> String {
	let pattern = if supports_static_slot_markers {
		&*STATIC_SLOT_MARKER
	} else {
		&*SLOT_MARKER
	};
	pattern.replace_all(html, "").into_owned()
}
