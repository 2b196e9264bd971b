//! HTML serialization helpers.
//!
//! Escaping, attribute spreading and element serialization used by the
//! custom-element fallback and the island bootstrap element.
//!
//! Escaped characters in text content:
//! - `&` → `&amp;`
//! - `<` → `&lt;`
//! - `>` → `&gt;`
//! - `"` → `&quot;`
//! - `'` → `&#39;`
//!
//! Attribute values only escape `&` (`&#38;`) and `"` (`&#34;`).

use serde_json::Value;

use crate::props::{Props, clsx};

/// Elements that never have a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
	"meta", "param", "source", "track", "wbr",
];

/// Attributes rendered bare when set to `true`.
pub const BOOLEAN_ATTRIBUTES: &[&str] = &[
	"allowfullscreen",
	"async",
	"autofocus",
	"autoplay",
	"checked",
	"controls",
	"default",
	"defer",
	"disabled",
	"disablepictureinpicture",
	"disableremoteplayback",
	"formnovalidate",
	"hidden",
	"inert",
	"loop",
	"nomodule",
	"novalidate",
	"open",
	"playsinline",
	"readonly",
	"required",
	"reversed",
	"scoped",
	"seamless",
	"selected",
	"itemscope",
];

/// Enumerated attributes where `false` is a meaningful value.
const ENUMERATED_ATTRIBUTES: &[&str] = &[
	"contenteditable",
	"draggable",
	"spellcheck",
	"value",
	"autoreverse",
	"externalresourcesrequired",
	"focusable",
	"preservealpha",
];

/// Template directives that only make sense at compile time.
const STATIC_DIRECTIVES: &[&str] = &["set:html", "set:text"];

/// Attributes stripped by [`render_element`].
const ELEMENT_INTERNAL_PROPS: &[&str] = &["lang", "data-astro-id", "define:vars"];

/// Escapes HTML special characters in text content.
///
/// # Examples
///
/// ```
/// use isola_render::html::escape_html;
///
/// assert_eq!(escape_html("<b>\"hi\" & 'bye'</b>"),
///            "&lt;b&gt;&quot;hi&quot; &amp; &#39;bye&#39;&lt;/b&gt;");
/// ```
pub fn escape_html(s: &str) -> String {
	let mut out = String::with_capacity(s.len());
	for c in s.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			_ => out.push(c),
		}
	}
	out
}

/// Escapes a value for use inside a double-quoted attribute.
pub fn to_attribute_string(value: &str, should_escape: bool) -> String {
	if should_escape {
		value.replace('&', "&#38;").replace('"', "&#34;")
	} else {
		value.to_string()
	}
}

/// Returns `true` if `tag` is a void element (case-insensitive).
pub fn is_void_element(tag: &str) -> bool {
	VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

fn is_boolean_attribute(key: &str) -> bool {
	BOOLEAN_ATTRIBUTES.iter().any(|a| a.eq_ignore_ascii_case(key))
}

fn is_enumerated_attribute(key: &str) -> bool {
	ENUMERATED_ATTRIBUTES
		.iter()
		.any(|a| a.eq_ignore_ascii_case(key))
}

/// Strips everything from the first unsafe character on.
///
/// Tag names come from user input, so anything after whitespace or one of
/// `& < > ' "` is dropped to keep attributes from being injected.
///
/// # Examples
///
/// ```
/// use isola_render::html::sanitize_element_name;
///
/// assert_eq!(sanitize_element_name("my-tag"), "my-tag");
/// assert_eq!(sanitize_element_name("my-tag onclick=\"x\""), "my-tag");
/// assert_eq!(sanitize_element_name("  x-el<script>"), "x-el");
/// ```
pub fn sanitize_element_name(tag: &str) -> String {
	let is_unsafe = |c: char| c.is_whitespace() || matches!(c, '&' | '<' | '>' | '\'' | '"');
	if !tag.contains(is_unsafe) {
		return tag.to_string();
	}
	let trimmed = tag.trim();
	trimmed
		.split(is_unsafe)
		.next()
		.unwrap_or_default()
		.trim()
		.to_string()
}

/// Converts a prop value to the string the browser would see.
pub(crate) fn value_to_string(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::Bool(b) => b.to_string(),
		Value::Number(n) => n.to_string(),
		Value::String(s) => s.clone(),
		Value::Array(items) => items
			.iter()
			.map(value_to_string)
			.collect::<Vec<_>>()
			.join(","),
		Value::Object(_) => "[object Object]".to_string(),
	}
}

fn kebab(key: &str) -> String {
	if key.to_lowercase() == key {
		return key.to_string();
	}
	let mut out = String::with_capacity(key.len() + 4);
	for c in key.chars() {
		if c.is_ascii_uppercase() {
			out.push('-');
			out.push(c.to_ascii_lowercase());
		} else {
			out.push(c);
		}
	}
	out
}

/// Serializes a style object into a `style` attribute value.
pub fn to_style_string(style: &serde_json::Map<String, Value>) -> String {
	style
		.iter()
		.filter(|(_, v)| match v {
			Value::String(s) => !s.trim().is_empty(),
			Value::Number(_) => true,
			_ => false,
		})
		.map(|(k, v)| {
			let value = value_to_string(v);
			if k.starts_with("--") {
				format!("{k}:{value}")
			} else {
				format!("{}:{value}", kebab(k))
			}
		})
		.collect::<Vec<_>>()
		.join(";")
}

fn is_http_url(value: &str) -> bool {
	value.starts_with("http://") || value.starts_with("https://")
}

/// Renders a single attribute, including its leading space.
///
/// Returns an empty string when the attribute must be omitted.
pub fn add_attribute(value: &Value, key: &str, should_escape: bool) -> String {
	match value {
		Value::Null => return String::new(),
		Value::Bool(false) => {
			if is_enumerated_attribute(key) {
				return format!(" {key}=\"false\"");
			}
			return String::new();
		}
		_ => {}
	}

	if STATIC_DIRECTIVES.contains(&key) {
		tracing::warn!(
			attribute = key,
			"template directive cannot be applied dynamically, skipping"
		);
		return String::new();
	}

	if key == "class:list" {
		let list = to_attribute_string(&clsx([value]), should_escape);
		if list.is_empty() {
			return String::new();
		}
		return format!(" class=\"{list}\"");
	}

	if key == "style"
		&& let Value::Object(style) = value
	{
		return format!(
			" {key}=\"{}\"",
			to_attribute_string(&to_style_string(style), should_escape)
		);
	}

	if key == "className" {
		return format!(
			" class=\"{}\"",
			to_attribute_string(&value_to_string(value), should_escape)
		);
	}

	if let Value::String(s) = value
		&& s.contains('&')
		&& is_http_url(s)
	{
		return format!(" {key}=\"{}\"", to_attribute_string(s, false));
	}

	if matches!(value, Value::Bool(true)) && (key.starts_with("data-") || is_boolean_attribute(key))
	{
		return format!(" {key}");
	}

	format!(
		" {key}=\"{}\"",
		to_attribute_string(&value_to_string(value), should_escape)
	)
}

/// Renders every prop as an attribute, in insertion order.
pub fn spread_attributes(props: &Props, should_escape: bool) -> String {
	props
		.iter()
		.map(|(key, value)| add_attribute(value, key, should_escape))
		.collect()
}

/// Serializes an element with already-rendered children.
///
/// `lang`, `data-astro-id` and `define:vars` are treated as internal and never
/// rendered.
pub fn render_element(name: &str, props: &Props, children: &str, should_escape: bool) -> String {
	let attrs: String = props
		.iter()
		.filter(|(key, _)| !ELEMENT_INTERNAL_PROPS.contains(&key.as_str()))
		.map(|(key, value)| add_attribute(value, key, should_escape))
		.collect();
	format!("<{name}{attrs}>{children}</{name}>")
}
