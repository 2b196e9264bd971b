//! Render options.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::directive::DEFAULT_CLIENT_DIRECTIVES;
use crate::error::RenderResult;

/// Options for rendering a page.
///
/// Options can be built in code or loaded from TOML:
///
/// ```
/// use isola_render::RenderOptions;
///
/// let options = RenderOptions::from_toml_str(r#"
/// compress_html = true
/// before_hydration_url = "/_isola/before-hydration.js"
///
/// [directive_scripts]
/// load = "(self.Astro ||= {}).load = (get) => get().then((h) => h());"
/// "#).unwrap();
///
/// assert!(options.compress_html);
/// assert!(options.is_client_directive("load"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
	/// Omit the newline after the doctype.
	pub compress_html: bool,
	/// Render a page fragment: no doctype and no head content.
	pub partial: bool,
	/// Script defining the `astro-island` element.
	pub island_runtime_script: String,
	/// Inline script per directive name, emitted once per page.
	pub directive_scripts: BTreeMap<String, String>,
	/// Module imported before any island hydrates.
	pub before_hydration_url: Option<String>,
	/// Head markup emitted for pages that cannot render their own head.
	pub head: String,
	/// Recognised directive names, without the `client:` prefix.
	pub client_directives: Vec<String>,
}

impl Default for RenderOptions {
	fn default() -> Self {
		Self {
			compress_html: false,
			partial: false,
			island_runtime_script: String::new(),
			directive_scripts: BTreeMap::new(),
			before_hydration_url: None,
			head: String::new(),
			client_directives: DEFAULT_CLIENT_DIRECTIVES
				.iter()
				.map(|d| d.to_string())
				.collect(),
		}
	}
}

impl RenderOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses options from TOML. Missing keys take their default value.
	pub fn from_toml_str(source: &str) -> RenderResult<Self> {
		let mut options: Self = toml::from_str(source)?;
		options.register_scripted_directives();
		Ok(options)
	}

	/// Enables HTML compression.
	pub fn compress_html(mut self, enable: bool) -> Self {
		self.compress_html = enable;
		self
	}

	/// Renders a page fragment.
	pub fn partial(mut self, enable: bool) -> Self {
		self.partial = enable;
		self
	}

	/// Sets the island runtime script.
	pub fn island_runtime(mut self, script: impl Into<String>) -> Self {
		self.island_runtime_script = script.into();
		self
	}

	/// Registers a directive and its inline script.
	///
	/// Unknown names become recognised custom directives.
	pub fn directive(mut self, name: impl Into<String>, script: impl Into<String>) -> Self {
		self.directive_scripts.insert(name.into(), script.into());
		self.register_scripted_directives();
		self
	}

	/// Sets the before-hydration module URL.
	pub fn before_hydration(mut self, url: impl Into<String>) -> Self {
		self.before_hydration_url = Some(url.into());
		self
	}

	/// Sets the head markup.
	pub fn head(mut self, markup: impl Into<String>) -> Self {
		self.head = markup.into();
		self
	}

	/// Returns `true` if `name` is a recognised directive.
	pub fn is_client_directive(&self, name: &str) -> bool {
		self.client_directives.iter().any(|d| d == name)
	}

	pub fn directive_script(&self, name: &str) -> Option<&str> {
		self.directive_scripts.get(name).map(String::as_str)
	}

	fn register_scripted_directives(&mut self) {
		for name in self.directive_scripts.keys() {
			if !self.client_directives.contains(name) {
				self.client_directives.push(name.clone());
			}
		}
		self.client_directives.sort();
	}
}
