//! Integration tests for component dispatch
//!
//! These tests cover each component kind end to end:
//! 1. Fragments and HTML-producing components
//! 2. Template components rendered in the background
//! 3. Custom element tags without a renderer
//! 4. String rendering of pages

mod utils;

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use isola_render::prelude::*;
use rstest::*;
use serde_json::json;
use utils::renderers::{Claim, MockRenderer};
use utils::templates::{EventLog, ScriptedTemplate, Step, child};
use utils::{markup, props, render_chunks};

#[fixture]
fn ctx() -> RenderContext {
	RenderContext::default()
}

// ============================================================================
// Fragments
// ============================================================================

#[rstest]
#[tokio::test]
async fn test_fragment_renders_default_slot_only(ctx: RenderContext) {
	let slots = ComponentSlots::new()
		.with("default", "<p>hi</p>")
		.with("other", "<p>ignored</p>");

	let chunks = render_chunks(&ctx, "Fragment", ComponentValue::Fragment, Props::new(), slots)
		.await
		.unwrap();

	assert_eq!(markup(&chunks), "<p>hi</p>");
}

#[rstest]
#[tokio::test]
async fn test_fragment_without_default_slot_writes_nothing(ctx: RenderContext) {
	let chunks = render_chunks(
		&ctx,
		"Fragment",
		ComponentValue::Fragment,
		props(json!({"class": "x"})),
		ComponentSlots::new(),
	)
	.await
	.unwrap();

	assert!(chunks.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_fragment_forwards_slot_instructions(ctx: RenderContext) {
	let slot = SlotContent::Chunks(vec![
		RenderChunk::Instruction(RenderInstruction::MaybeHead),
		"<main/>".into(),
	]);
	let chunks = render_chunks(
		&ctx,
		"Fragment",
		ComponentValue::Fragment,
		Props::new(),
		ComponentSlots::new().with("default", slot),
	)
	.await
	.unwrap();

	assert!(matches!(
		chunks.first(),
		Some(RenderChunk::Instruction(RenderInstruction::MaybeHead))
	));
	assert_eq!(markup(&chunks), "<main/>");
}

// ============================================================================
// HTML components
// ============================================================================

#[rstest]
#[tokio::test]
async fn test_html_component_receives_rendered_slots(ctx: RenderContext) {
	let component = ComponentValue::html(|slots: &RenderedSlots| {
		format!(
			"<article>{}|{}</article>",
			slots.get("default").map(String::as_str).unwrap_or_default(),
			slots.get("aside").map(String::as_str).unwrap_or_default()
		)
	});
	let slots = ComponentSlots::new()
		.with("default", "<p>body</p>")
		.with(
			"aside",
			SlotContent::thunk(|| async {
				Ok::<_, RenderError>(vec![RenderChunk::Bytes(Bytes::from_static(b"<nav/>"))])
			}),
		);

	let chunks = render_chunks(&ctx, "Article", component, Props::new(), slots)
		.await
		.unwrap();

	assert_eq!(chunks.len(), 1);
	assert_eq!(markup(&chunks), "<article><p>body</p>|<nav/></article>");
}

#[rstest]
#[tokio::test]
async fn test_html_component_prefixes_stringified_slot_instructions() {
	let ctx = RenderContext::builder()
		.options(RenderOptions::new().head("<link rel=\"icon\">"))
		.build();
	let slot = SlotContent::Chunks(vec![
		RenderChunk::Instruction(RenderInstruction::Head),
		"<p/>".into(),
	]);

	let chunks = render_chunks(
		&ctx,
		"Layout",
		ComponentValue::html(|slots: &RenderedSlots| {
			slots.get("default").cloned().unwrap_or_default()
		}),
		Props::new(),
		ComponentSlots::new().with("default", slot),
	)
	.await
	.unwrap();

	assert_eq!(markup(&chunks), "<link rel=\"icon\"><p/>");
}

// ============================================================================
// Pending values
// ============================================================================

#[rstest]
#[tokio::test]
async fn test_pending_value_is_awaited_before_dispatch(ctx: RenderContext) {
	let component = ComponentValue::pending(async {
		tokio::time::sleep(Duration::from_millis(5)).await;
		Ok::<_, RenderError>(ComponentValue::Fragment)
	});

	let chunks = render_chunks(
		&ctx,
		"Lazy",
		component,
		Props::new(),
		ComponentSlots::new().with("default", "loaded"),
	)
	.await
	.unwrap();

	assert_eq!(markup(&chunks), "loaded");
}

// ============================================================================
// Template components
// ============================================================================

#[rstest]
#[tokio::test]
async fn test_template_renders_props_and_slots(ctx: RenderContext) {
	let template = ScriptedTemplate::new(vec![
		Step::Write("<h1>"),
		Step::Prop("title"),
		Step::Write("</h1>"),
		Step::Slot("default"),
	]);

	let chunks = render_chunks(
		&ctx,
		"Page",
		template.component(),
		props(json!({"title": "Home"})),
		ComponentSlots::new().with("default", "<p>welcome</p>"),
	)
	.await
	.unwrap();

	assert_eq!(markup(&chunks), "<h1>\"Home\"</h1><p>welcome</p>");
}

#[rstest]
#[tokio::test]
async fn test_template_receives_normalized_class(ctx: RenderContext) {
	let template = ScriptedTemplate::new(vec![Step::Prop("class"), Step::Prop("class:list")]);

	let chunks = render_chunks(
		&ctx,
		"Styled",
		template.component(),
		props(json!({"class": "a", "class:list": ["b", {"c": true}]})),
		ComponentSlots::new(),
	)
	.await
	.unwrap();

	assert_eq!(markup(&chunks), "\"a b c\"");
}

#[rstest]
#[tokio::test]
async fn test_sibling_templates_render_concurrently_in_document_order(ctx: RenderContext) {
	let log = EventLog::default();
	let slow = ScriptedTemplate::new(vec![
		Step::Sleep(50),
		Step::Log("slow"),
		Step::Write("<slow/>"),
	])
	.with_log(Arc::clone(&log));
	let fast = ScriptedTemplate::new(vec![Step::Log("fast"), Step::Write("<fast/>")])
		.with_log(Arc::clone(&log));
	let parent = ScriptedTemplate::new(vec![
		Step::Write("<body>"),
		Step::Children(vec![child(slow), child(fast)]),
		Step::Write("</body>"),
	]);

	let chunks = render_chunks(&ctx, "Parent", parent.component(), Props::new(), ComponentSlots::new())
		.await
		.unwrap();

	assert_eq!(markup(&chunks), "<body><slow/><fast/></body>");
	assert_eq!(*log.lock(), vec!["fast".to_string(), "slow".to_string()]);
}

#[rstest]
#[tokio::test]
async fn test_template_output_before_render_is_buffered(ctx: RenderContext) {
	let log = EventLog::default();
	let template = ScriptedTemplate::new(vec![Step::Write("early"), Step::Log("wrote")])
		.with_log(Arc::clone(&log));

	let instance = render_component(&ctx, "Eager", template.component(), Props::new(), ComponentSlots::new())
		.await
		.unwrap();
	tokio::time::sleep(Duration::from_millis(20)).await;
	assert_eq!(*log.lock(), vec!["wrote".to_string()]);

	let mut chunks = Vec::new();
	instance.render(&mut chunks).await.unwrap();
	assert_eq!(markup(&chunks), "early");
}

#[rstest]
#[tokio::test]
async fn test_template_error_propagates_after_partial_output(ctx: RenderContext) {
	let template = ScriptedTemplate::new(vec![Step::Write("<div>"), Step::Fail("template exploded")]);

	let instance = render_component(&ctx, "Broken", template.component(), Props::new(), ComponentSlots::new())
		.await
		.unwrap();
	let mut chunks = Vec::new();
	let err = instance.render(&mut chunks).await.unwrap_err();

	assert_eq!(err.to_string(), "template exploded");
	assert_eq!(markup(&chunks), "<div>");
}

// ============================================================================
// Missing components and tag fallback
// ============================================================================

#[rstest]
#[tokio::test]
async fn test_missing_component_is_a_configuration_error(ctx: RenderContext) {
	let err = render_chunks(
		&ctx,
		"Counter",
		ComponentValue::Missing,
		props(json!({"count": 1})),
		ComponentSlots::new(),
	)
	.await
	.unwrap_err();

	assert_eq!(err.code(), Some(DiagnosticCode::MissingComponent));
	assert!(err.to_string().contains("Counter"));
}

#[rstest]
#[case("my-tag", "<my-tag class=\"x\"></my-tag>")]
#[case("img", "<img class=\"x\"/>")]
#[case("INPUT", "<INPUT class=\"x\"/>")]
#[tokio::test]
async fn test_tag_string_fallback(ctx: RenderContext, #[case] tag: &str, #[case] expected: &str) {
	let chunks = render_chunks(
		&ctx,
		tag,
		ComponentValue::tag(tag),
		props(json!({"class": "x"})),
		ComponentSlots::new(),
	)
	.await
	.unwrap();

	assert_eq!(markup(&chunks), expected);
}

#[rstest]
#[tokio::test]
async fn test_tag_string_fallback_concatenates_all_slots(ctx: RenderContext) {
	let chunks = render_chunks(
		&ctx,
		"x-card",
		ComponentValue::tag("x-card"),
		props(json!({"title": "a \"quoted\" title", "hidden": true})),
		ComponentSlots::new()
			.with("default", "<p>body</p>")
			.with("footer", "<small>f</small>"),
	)
	.await
	.unwrap();

	assert_eq!(
		markup(&chunks),
		"<x-card title=\"a &#34;quoted&#34; title\" hidden><p>body</p><small>f</small></x-card>"
	);
}

#[rstest]
#[tokio::test]
async fn test_tag_string_is_sanitized(ctx: RenderContext) {
	let chunks = render_chunks(
		&ctx,
		"evil",
		ComponentValue::tag("x-el onload=alert(1)"),
		Props::new(),
		ComponentSlots::new(),
	)
	.await
	.unwrap();

	assert_eq!(markup(&chunks), "<x-el></x-el>");
}

#[rstest]
#[tokio::test]
async fn test_tag_claimed_by_renderer_uses_renderer_markup() {
	let ctx = utils::context_with(vec![
		MockRenderer::new("@astrojs/lit")
			.claims(Claim::All)
			.html("<x-el><template shadowroot=\"open\"></template></x-el>"),
	]);

	let chunks = render_chunks(&ctx, "x-el", ComponentValue::tag("x-el"), Props::new(), ComponentSlots::new())
		.await
		.unwrap();

	assert_eq!(
		markup(&chunks),
		"<x-el><template shadowroot=\"open\"></template></x-el>"
	);
}

// ============================================================================
// String rendering
// ============================================================================

#[rstest]
#[tokio::test]
async fn test_string_render_prefixes_doctype_for_pages(ctx: RenderContext) {
	let html = render_component_to_string(
		&ctx,
		"Page",
		ComponentValue::Fragment,
		Props::new(),
		ComponentSlots::new().with("default", "<html><body/></html>"),
		Some(&PageRoute::new("src/pages/index.astro")),
	)
	.await
	.unwrap();

	assert_eq!(html, "<!DOCTYPE html>\n<html><body/></html>");
}

#[rstest]
#[case(RenderOptions::new().compress_html(true), "<!DOCTYPE html><html/>")]
#[case(RenderOptions::new().partial(true), "<html/>")]
#[tokio::test]
async fn test_string_render_doctype_options(#[case] options: RenderOptions, #[case] expected: &str) {
	let ctx = RenderContext::builder().options(options).build();

	let html = render_component_to_string(
		&ctx,
		"Page",
		ComponentValue::Fragment,
		Props::new(),
		ComponentSlots::new().with("default", "<html/>"),
		Some(&PageRoute::default()),
	)
	.await
	.unwrap();

	assert_eq!(html, expected);
}

#[rstest]
#[tokio::test]
async fn test_string_render_keeps_existing_doctype(ctx: RenderContext) {
	let html = render_component_to_string(
		&ctx,
		"Page",
		ComponentValue::Fragment,
		Props::new(),
		ComponentSlots::new().with("default", "<!doctype HTML><html/>"),
		Some(&PageRoute::default()),
	)
	.await
	.unwrap();

	assert_eq!(html, "<!doctype HTML><html/>");
}

#[rstest]
#[tokio::test]
async fn test_string_render_without_page_has_no_doctype(ctx: RenderContext) {
	let html = render_component_to_string(
		&ctx,
		"Widget",
		ComponentValue::Fragment,
		Props::new(),
		ComponentSlots::new().with("default", "<div/>"),
		None,
	)
	.await
	.unwrap();

	assert_eq!(html, "<div/>");
}

#[rstest]
#[tokio::test]
async fn test_string_render_injects_head_for_framework_pages() {
	let ctx = RenderContext::builder()
		.options(RenderOptions::new().head("<title>t</title>"))
		.registry(
			RendererRegistry::new()
				.with(MockRenderer::new("@astrojs/react").claims(Claim::All).html("<html/>"))
				.unwrap(),
		)
		.build();
	let page = FrameworkComponent::new("ReactPage", ()).with_head_rendering();

	let html = render_component_to_string(
		&ctx,
		"ReactPage",
		ComponentValue::Framework(page),
		props(json!({"server:root": true})),
		ComponentSlots::new(),
		Some(&PageRoute::default()),
	)
	.await
	.unwrap();

	assert_eq!(html, "<!DOCTYPE html>\n<title>t</title><html/>");
	assert!(ctx.scripts().has_rendered_head());
}

#[rstest]
#[tokio::test]
async fn test_string_render_drops_response_chunks(ctx: RenderContext) {
	let response = Arc::new(http::Response::new(Bytes::from_static(b"redirect")));
	let html = render_component_to_string(
		&ctx,
		"Widget",
		ComponentValue::Fragment,
		Props::new(),
		ComponentSlots::new().with(
			"default",
			SlotContent::Chunks(vec!["a".into(), RenderChunk::Response(response), "b".into()]),
		),
		None,
	)
	.await
	.unwrap();

	assert_eq!(html, "ab");
}

#[rstest]
#[tokio::test]
async fn test_string_render_attaches_page_location(ctx: RenderContext) {
	let err = render_component_to_string(
		&ctx,
		"Missing",
		ComponentValue::Missing,
		Props::new(),
		ComponentSlots::new(),
		Some(&PageRoute::new("src/pages/about.astro")),
	)
	.await
	.unwrap_err();

	let diagnostic = err.diagnostic().unwrap();
	assert_eq!(diagnostic.location.as_deref(), Some("src/pages/about.astro"));
}

#[rstest]
#[tokio::test]
async fn test_string_render_nested_templates(ctx: RenderContext) {
	let inner = ScriptedTemplate::new(vec![Step::Sleep(10), Step::Write("<inner/>")]);
	let outer = ScriptedTemplate::new(vec![
		Step::Write("<html>"),
		Step::Children(vec![child(inner.clone()), child(inner)]),
		Step::Write("</html>"),
	]);

	let html = render_component_to_string(
		&ctx,
		"Page",
		outer.component(),
		Props::new(),
		ComponentSlots::new(),
		Some(&PageRoute::default()),
	)
	.await
	.unwrap();

	assert_eq!(html, "<!DOCTYPE html>\n<html><inner/><inner/></html>");
}
