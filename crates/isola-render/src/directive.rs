//! Hydration directives.
//!
//! Components opt into client-side hydration through `client:*` props. The
//! [`DirectiveExtractor`] separates those from the ordinary props passed to
//! renderers.

use std::fmt;

use serde_json::Value;

use crate::error::{Diagnostic, RenderResult};
use crate::props::Props;

/// Directives recognised when no other set is configured.
pub const DEFAULT_CLIENT_DIRECTIVES: &[&str] = &["idle", "load", "media", "only", "visible"];

/// When a component hydrates on the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClientDirective {
	/// Hydrate immediately on page load.
	Load,
	/// Hydrate once the main thread is idle.
	Idle,
	/// Hydrate when the element enters the viewport.
	Visible,
	/// Hydrate when a media query matches.
	Media,
	/// Skip server rendering and render on the client only.
	Only,
	/// A directive registered by an integration.
	Custom(String),
}

impl ClientDirective {
	/// Parses a directive name without the `client:` prefix.
	pub fn parse(name: &str) -> Self {
		match name {
			"load" => Self::Load,
			"idle" => Self::Idle,
			"visible" => Self::Visible,
			"media" => Self::Media,
			"only" => Self::Only,
			other => Self::Custom(other.to_string()),
		}
	}

	/// Returns the directive name without the `client:` prefix.
	pub fn as_str(&self) -> &str {
		match self {
			Self::Load => "load",
			Self::Idle => "idle",
			Self::Visible => "visible",
			Self::Media => "media",
			Self::Only => "only",
			Self::Custom(name) => name,
		}
	}

	pub fn is_only(&self) -> bool {
		matches!(self, Self::Only)
	}
}

impl fmt::Display for ClientDirective {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Hydration settings extracted from a component's props.
#[derive(Debug, Clone, PartialEq)]
pub struct HydrationMetadata {
	/// Hydration strategy.
	pub directive: ClientDirective,
	/// Directive argument (`true` for bare directives).
	pub value: Value,
	/// Module URL of the component, from `client:component-path`.
	pub component_url: String,
	/// Export name of the component, from `client:component-export`.
	pub component_export: String,
}

impl HydrationMetadata {
	/// Creates metadata for `directive` with a bare `true` argument.
	pub fn new(directive: ClientDirective) -> Self {
		Self {
			directive,
			value: Value::Bool(true),
			component_url: String::new(),
			component_export: String::new(),
		}
	}

	/// Returns the directive argument when it is a string.
	pub fn value_str(&self) -> Option<&str> {
		self.value.as_str()
	}
}

/// Output of [`DirectiveExtractor::extract`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractedProps {
	/// Present when a `client:*` directive was found.
	pub hydration: Option<HydrationMetadata>,
	/// Set by the `server:root` prop.
	pub is_page: bool,
	/// Props with every directive removed.
	pub props: Props,
}

/// Splits hydration directives from ordinary props.
pub trait DirectiveExtractor: Send + Sync {
	/// Extracts directives from `props`.
	///
	/// `client_directives` is the set of recognised directive names without
	/// the `client:` prefix.
	fn extract(&self, props: &Props, client_directives: &[String]) -> RenderResult<ExtractedProps>;
}

/// Default [`DirectiveExtractor`].
///
/// | prop | effect |
/// |------|--------|
/// | `server:root` | marks the component as a page |
/// | `client:component-path` | component URL |
/// | `client:component-export` | export name |
/// | `client:component-hydration`, `client:display-name` | ignored |
/// | `client:<name>` | hydration directive |
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientDirectiveExtractor;

impl DirectiveExtractor for ClientDirectiveExtractor {
	fn extract(&self, props: &Props, client_directives: &[String]) -> RenderResult<ExtractedProps> {
		let mut extracted = ExtractedProps::default();
		let mut directive: Option<(ClientDirective, Value)> = None;
		let mut component_url = String::new();
		let mut component_export = String::new();

		for (key, value) in props {
			if let Some(server) = key.strip_prefix("server:") {
				if server == "root" {
					extracted.is_page = true;
				}
				continue;
			}

			let Some(name) = key.strip_prefix("client:") else {
				extracted.props.insert(key.clone(), value.clone());
				continue;
			};

			match name {
				"component-path" => component_url = value_as_string(value),
				"component-export" => component_export = value_as_string(value),
				"component-hydration" | "display-name" => {}
				_ => {
					if !client_directives.iter().any(|d| d == name) {
						return Err(
							Diagnostic::invalid_client_directive(name, client_directives).into(),
						);
					}
					if name == "media" && !value.is_string() {
						return Err(Diagnostic::missing_media_query().into());
					}
					directive = Some((ClientDirective::parse(name), value.clone()));
				}
			}
		}

		extracted.hydration = directive.map(|(directive, value)| HydrationMetadata {
			directive,
			value,
			component_url,
			component_export,
		});
		Ok(extracted)
	}
}

fn value_as_string(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		Value::Null => String::new(),
		other => other.to_string(),
	}
}
