//! Component props.
//!
//! Props are an insertion-ordered JSON object. This module provides the
//! `class:list` normalisation applied before dispatch and the tagged encoding
//! used to ship props to the client.

use serde_json::{Map, Value};

/// Insertion-ordered component props.
pub type Props = Map<String, Value>;

/// Tag for plain values and objects in the serialized encoding.
const PROP_TYPE_VALUE: u8 = 0;
/// Tag for arrays in the serialized encoding.
const PROP_TYPE_JSON: u8 = 1;

fn collect_classes(value: &Value, out: &mut Vec<String>) {
	match value {
		Value::String(s) if !s.is_empty() => out.push(s.clone()),
		Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => out.push(n.to_string()),
		Value::Array(items) => {
			for item in items {
				collect_classes(item, out);
			}
		}
		Value::Object(map) => {
			for (class, enabled) in map {
				if is_truthy(enabled) {
					out.push(class.clone());
				}
			}
		}
		_ => {}
	}
}

fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(b) => *b,
		Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
		Value::String(s) => !s.is_empty(),
		Value::Array(_) | Value::Object(_) => true,
	}
}

/// Flattens class values into a space-separated class string.
///
/// Strings and non-zero numbers are kept, arrays are flattened recursively and
/// object keys are kept when their value is truthy.
///
/// # Examples
///
/// ```
/// use isola_render::props::clsx;
/// use serde_json::json;
///
/// let classes = clsx([&json!("a"), &json!(["b", {"c": true, "d": false}])]);
/// assert_eq!(classes, "a b c");
/// ```
pub fn clsx<'a>(values: impl IntoIterator<Item = &'a Value>) -> String {
	let mut classes = Vec::new();
	for value in values {
		collect_classes(value, &mut classes);
	}
	classes.join(" ")
}

/// Merges `class:list` into `class`.
///
/// Props without `class:list` are returned unchanged. When the merged class
/// string is empty, `class` is removed.
pub fn normalize_props(mut props: Props) -> Props {
	let Some(list) = props.shift_remove("class:list") else {
		return props;
	};
	let current = props.get("class").cloned().unwrap_or(Value::Null);
	let merged = clsx([&current, &list]);
	if merged.is_empty() {
		props.shift_remove("class");
	} else {
		props.insert("class".to_string(), Value::String(merged));
	}
	props
}

fn convert_to_serialized_form(value: &Value) -> Value {
	match value {
		Value::Array(items) => Value::Array(vec![
			Value::from(PROP_TYPE_JSON),
			Value::Array(items.iter().map(convert_to_serialized_form).collect()),
		]),
		Value::Object(map) => Value::Array(vec![
			Value::from(PROP_TYPE_VALUE),
			Value::Object(serialize_object(map)),
		]),
		other => Value::Array(vec![Value::from(PROP_TYPE_VALUE), other.clone()]),
	}
}

fn serialize_object(map: &Map<String, Value>) -> Map<String, Value> {
	map.iter()
		.map(|(key, value)| (key.clone(), convert_to_serialized_form(value)))
		.collect()
}

/// Serializes props into the tagged encoding read by the client runtime.
///
/// Every value becomes a `[tag, payload]` pair: `[0, value]` for scalars,
/// `[0, {..}]` for objects with encoded members and `[1, [..]]` for arrays
/// with encoded items.
///
/// # Examples
///
/// ```
/// use isola_render::props::serialize_props;
/// use serde_json::json;
///
/// let props = json!({"count": 1, "tags": ["a"]});
/// let encoded = serialize_props(props.as_object().unwrap());
/// assert_eq!(encoded, r#"{"count":[0,1],"tags":[1,[[0,"a"]]]}"#);
/// ```
pub fn serialize_props(props: &Props) -> String {
	Value::Object(serialize_object(props)).to_string()
}
