//! Rendering error types.
//!
//! Configuration and resolution problems are reported as [`Diagnostic`]s
//! carrying a message, a hint and an optional source location. Errors raised
//! by renderers are passed through untouched as [`RenderError::Component`].

use std::fmt;

use thiserror::Error;

/// Boxed error returned by renderer implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Identifies the kind of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DiagnosticCode {
	/// The component value is null or undefined.
	MissingComponent,
	/// A `client:*` directive that is not registered.
	InvalidClientDirective,
	/// `client:media` without a query string.
	MissingMediaQuery,
	/// A hydrated component whose renderer has no client entrypoint.
	NoClientEntrypoint,
	/// A `client:only` component no renderer could be chosen for.
	NoClientOnlyHint,
	/// No renderer is able to render the component.
	NoMatchingRenderer,
	/// Several probable renderers exist but none claimed the component.
	AmbiguousRenderer,
	/// A hydrated component without an export name.
	NoMatchingImport,
}

impl fmt::Display for DiagnosticCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(self, f)
	}
}

/// A user-facing error with a hint and an optional location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
	/// Kind of problem.
	pub code: DiagnosticCode,
	/// Main message.
	pub message: String,
	/// Suggestion for fixing the problem.
	pub hint: Option<String>,
	/// File the problem was reported for.
	pub location: Option<String>,
}

impl Diagnostic {
	/// Creates a diagnostic without hint or location.
	pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
		Self {
			code,
			message: message.into(),
			hint: None,
			location: None,
		}
	}

	/// Sets the hint.
	pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
		self.hint = Some(hint.into());
		self
	}

	/// Sets the location.
	pub fn with_location(mut self, location: impl Into<String>) -> Self {
		self.location = Some(location.into());
		self
	}

	pub(crate) fn missing_component(display_name: &str) -> Self {
		Self::new(
			DiagnosticCode::MissingComponent,
			format!("Unable to render `{display_name}` because it is undefined!"),
		)
		.with_hint("Did you forget to import the component or is it possible there is a typo?")
	}

	pub(crate) fn invalid_client_directive(directive: &str, supported: &[String]) -> Self {
		let supported = supported
			.iter()
			.map(|d| format!("client:{d}"))
			.collect::<Vec<_>>()
			.join(", ");
		Self::new(
			DiagnosticCode::InvalidClientDirective,
			format!(
				"Invalid hydration directive \"client:{directive}\". Supported hydration methods: {supported}"
			),
		)
	}

	pub(crate) fn missing_media_query() -> Self {
		Self::new(
			DiagnosticCode::MissingMediaQuery,
			"Media query not provided for `client:media` directive.",
		)
		.with_hint(
			"A media query similar to `client:media=\"(max-width: 600px)\"` must be provided.",
		)
	}

	pub(crate) fn no_client_entrypoint(display_name: &str, directive: &str, renderer: &str) -> Self {
		Self::new(
			DiagnosticCode::NoClientEntrypoint,
			format!(
				"`{display_name}` component has a `client:{directive}` directive, but no client entrypoint was provided by `{renderer}`."
			),
		)
		.with_hint("Renderers used for hydrated components must declare a client entrypoint.")
	}

	pub(crate) fn no_client_only_hint(display_name: &str, probable: &[&str]) -> Self {
		let names = probable
			.iter()
			.map(|name| name.trim_start_matches("@astrojs/"))
			.collect::<Vec<_>>()
			.join("|");
		Self::new(
			DiagnosticCode::NoClientOnlyHint,
			format!(
				"Unable to render `{display_name}`. When using the `client:only` hydration strategy, a hint is needed to pick the correct renderer."
			),
		)
		.with_hint(format!("Did you mean to pass `client:only=\"{names}\"`?"))
	}

	pub(crate) fn no_matching_renderer(
		display_name: &str,
		extension: Option<&str>,
		valid_renderers: usize,
		probable: &[&str],
	) -> Self {
		let plural = valid_renderers > 1;
		let detail = if valid_renderers > 0 {
			format!(
				"There {} {valid_renderers} renderer{} configured in your project, but {} able to server-side render `{display_name}`.",
				if plural { "are" } else { "is" },
				if plural { "s" } else { "" },
				if plural { "none were" } else { "it was not" },
			)
		} else {
			match extension {
				Some(ext) => {
					format!("No valid renderer was found for the `.{ext}` file extension.")
				}
				None => "No valid renderer was found for this file extension.".to_string(),
			}
		};
		Self::new(
			DiagnosticCode::NoMatchingRenderer,
			format!("Unable to render `{display_name}`.\n\n{detail}"),
		)
		.with_hint(format!(
			"Did you mean to enable the {} integration?",
			format_list(probable)
		))
	}

	pub(crate) fn ambiguous_renderer(display_name: &str, probable: &[&str]) -> Self {
		let names = probable
			.iter()
			.map(|name| format!("`{name}`"))
			.collect::<Vec<_>>()
			.join(", ");
		Self::new(
			DiagnosticCode::AmbiguousRenderer,
			format!(
				"Unable to render `{display_name}`!\n\n\
				This component likely uses {names},\n\
				but none of the installed renderers were able to claim it.\n\n\
				Make sure that it:\n  \
				1. Does not unconditionally access browser-specific globals like `window` or `document`.\n     \
				If this is unavoidable, use the `client:only` hydration directive.\n  \
				2. Does not conditionally return `null` or `undefined` when rendered on the server."
			),
		)
		.with_hint(
			"If you're still stuck, render the component with `client:only` to skip server rendering.",
		)
	}

	pub(crate) fn no_matching_import(display_name: &str) -> Self {
		Self::new(
			DiagnosticCode::NoMatchingImport,
			format!(
				"Could not render `{display_name}`. No matching import has been found for `{display_name}`."
			),
		)
		.with_hint("Please make sure the component is properly imported.")
	}
}

impl fmt::Display for Diagnostic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.message)?;
		if let Some(hint) = &self.hint {
			write!(f, "\n\nHint: {hint}")?;
		}
		if let Some(location) = &self.location {
			write!(f, "\n  --> {location}")?;
		}
		Ok(())
	}
}

/// Joins names as `a, b or c`.
fn format_list(values: &[&str]) -> String {
	match values {
		[] => String::new(),
		[only] => (*only).to_string(),
		[init @ .., last] => format!("{} or {last}", init.join(", ")),
	}
}

/// Errors produced while rendering components.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RenderError {
	/// Configuration or resolution problem.
	#[error("{0}")]
	Diagnostic(Box<Diagnostic>),

	/// Error raised by a renderer or component, passed through unchanged.
	#[error("{source}")]
	Component {
		/// Renderer that raised the error, when known.
		renderer: Option<String>,
		/// Original error.
		#[source]
		source: BoxError,
	},

	/// Renderer registered twice.
	#[error("renderer already registered: {0}")]
	DuplicateRenderer(String),

	/// Invalid render options.
	#[error("invalid render options: {0}")]
	Config(String),

	/// A background render task panicked or was cancelled.
	#[error("render task failed: {0}")]
	Task(String),
}

impl RenderError {
	/// Wraps an upstream error, tagging it with the renderer name.
	pub fn component(renderer: Option<&str>, source: impl Into<BoxError>) -> Self {
		Self::Component {
			renderer: renderer.map(str::to_string),
			source: source.into(),
		}
	}

	/// Returns the diagnostic payload, if any.
	pub fn diagnostic(&self) -> Option<&Diagnostic> {
		match self {
			Self::Diagnostic(d) => Some(d),
			_ => None,
		}
	}

	/// Returns the diagnostic code, if any.
	pub fn code(&self) -> Option<DiagnosticCode> {
		self.diagnostic().map(|d| d.code)
	}

	/// Returns the renderer an upstream error came from.
	pub fn renderer(&self) -> Option<&str> {
		match self {
			Self::Component { renderer, .. } => renderer.as_deref(),
			_ => None,
		}
	}

	/// Attaches `location` to a diagnostic that has none yet.
	///
	/// Returns `true` if the location was attached.
	pub fn attach_location(&mut self, location: &str) -> bool {
		match self {
			Self::Diagnostic(d) if d.location.is_none() => {
				d.location = Some(location.to_string());
				true
			}
			_ => false,
		}
	}
}

impl From<Diagnostic> for RenderError {
	fn from(diagnostic: Diagnostic) -> Self {
		Self::Diagnostic(Box::new(diagnostic))
	}
}

impl From<toml::de::Error> for RenderError {
	fn from(err: toml::de::Error) -> Self {
		Self::Config(err.to_string())
	}
}
