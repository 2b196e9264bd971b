//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod renderers;
pub mod templates;

use isola_render::prelude::*;
use serde_json::Value;

/// Converts a JSON object literal into props.
pub fn props(value: Value) -> Props {
	match value {
		Value::Object(map) => map,
		other => panic!("props must be a JSON object, got {other}"),
	}
}

/// Concatenates the markup chunks of a render.
pub fn markup(chunks: &[RenderChunk]) -> String {
	chunks.iter().filter_map(RenderChunk::as_markup).collect()
}

/// Renders a component into a chunk vector.
pub async fn render_chunks(
	ctx: &RenderContext,
	display_name: &str,
	component: ComponentValue,
	props: Props,
	slots: ComponentSlots,
) -> RenderResult<Vec<RenderChunk>> {
	let instance = render_component(ctx, display_name, component, props, slots).await?;
	let mut chunks = Vec::new();
	instance.render(&mut chunks).await?;
	Ok(chunks)
}

/// Builds a context over `renderers`, in order.
pub fn context_with(renderers: Vec<renderers::MockRenderer>) -> RenderContext {
	let mut registry = RendererRegistry::new();
	for renderer in renderers {
		registry
			.register(std::sync::Arc::new(renderer))
			.expect("renderer names are unique");
	}
	RenderContext::builder().registry(registry).build()
}
