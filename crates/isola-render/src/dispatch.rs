//! Component dispatch.
//!
//! [`render_component`] classifies a component value and returns a
//! [`RenderInstance`] that writes the component's output when rendered.
//!
//! | kind | output |
//! |------|--------|
//! | fragment | the `default` slot |
//! | html component | slot instructions and the returned markup |
//! | template | output of the instance, rendered in the background |
//! | framework component, tag | renderer output, possibly inside an island |

use tracing::debug;

use crate::buffer::BufferedRender;
use crate::chunk::{RenderChunk, RenderDestination, RenderInstruction};
use crate::component::{
	ComponentFactory, ComponentRef, ComponentValue, FrameworkComponent, HtmlComponent,
	NativeElement, ResolvedComponent,
};
use crate::context::RenderContext;
use crate::error::{Diagnostic, RenderError, RenderResult};
use crate::html::{is_void_element, render_element, sanitize_element_name, spread_attributes};
use crate::island::{
	HydrateScriptOptions, ISLAND_END_MARKER, generate_hydrate_script, island_identity,
	remove_slot_markers, slot_marker, slot_templates, unrendered_slots,
};
use crate::props::{Props, normalize_props, serialize_props};
use crate::renderer::{PASS_THROUGH_RENDERER, RenderMetadata, StaticMarkup};
use crate::resolve::{
	ResolveRequest, Resolution, component_extension, guess_renderers, resolve_renderer,
	validate_client_entrypoint,
};
use crate::slots::{ComponentSlots, DEFAULT_SLOT, RenderedSlots, SlotsOutput};

/// Rendered or in-flight output of a component.
///
/// Consumed by [`render`](Self::render).
#[derive(Debug)]
pub struct RenderInstance {
	output: InstanceOutput,
}

#[derive(Debug)]
enum InstanceOutput {
	Chunks(Vec<RenderChunk>),
	Buffered(BufferedRender),
}

impl RenderInstance {
	fn chunks(chunks: Vec<RenderChunk>) -> Self {
		Self {
			output: InstanceOutput::Chunks(chunks),
		}
	}

	fn empty() -> Self {
		Self::chunks(Vec::new())
	}

	/// Writes the component's output to `destination`.
	pub async fn render(self, destination: &mut dyn RenderDestination) -> RenderResult<()> {
		match self.output {
			InstanceOutput::Chunks(chunks) => {
				for chunk in chunks {
					destination.write(chunk);
				}
				Ok(())
			}
			InstanceOutput::Buffered(buffered) => buffered.flush_into(destination).await,
		}
	}
}

/// Prepares `component` for rendering.
///
/// Template components start rendering in the background before this
/// returns. All other kinds are rendered up front.
///
/// # Errors
///
/// Resolution and configuration problems, renderer errors and rejections of
/// pending component values.
///
/// # Panics
///
/// Rendering a template component outside a Tokio runtime panics.
pub async fn render_component(
	ctx: &RenderContext,
	display_name: &str,
	component: ComponentValue,
	props: Props,
	slots: ComponentSlots,
) -> RenderResult<RenderInstance> {
	let component = component.resolve().await?;
	debug!(component = display_name, kind = ?component.kind(), "dispatching component");

	match component {
		ResolvedComponent::Fragment => render_fragment(ctx, &slots).await,
		ResolvedComponent::Html(html) => {
			render_html_component(ctx, html.as_ref(), &slots).await
		}
		ResolvedComponent::Template(factory) => Ok(render_template_component(
			ctx,
			display_name,
			factory.as_ref(),
			normalize_props(props),
			slots,
		)),
		ResolvedComponent::Framework(component) => {
			render_framework_component(
				ctx,
				display_name,
				FrameworkTarget::Framework(&component),
				normalize_props(props),
				&slots,
			)
			.await
		}
		ResolvedComponent::Tag(tag) => {
			render_framework_component(
				ctx,
				display_name,
				FrameworkTarget::Tag(&tag),
				normalize_props(props),
				&slots,
			)
			.await
		}
		ResolvedComponent::Missing => {
			render_framework_component(
				ctx,
				display_name,
				FrameworkTarget::Missing,
				normalize_props(props),
				&slots,
			)
			.await
		}
	}
}

async fn render_fragment(ctx: &RenderContext, slots: &ComponentSlots) -> RenderResult<RenderInstance> {
	let Some(default) = slots.get(DEFAULT_SLOT) else {
		return Ok(RenderInstance::empty());
	};
	let rendered = ctx.slot_renderer().render_slot(ctx, default).await?;

	let mut chunks: Vec<RenderChunk> = rendered
		.instructions
		.into_iter()
		.map(RenderChunk::Instruction)
		.collect();
	chunks.push(RenderChunk::Markup(rendered.html));
	Ok(RenderInstance::chunks(chunks))
}

async fn render_html_component(
	ctx: &RenderContext,
	component: &dyn HtmlComponent,
	slots: &ComponentSlots,
) -> RenderResult<RenderInstance> {
	let SlotsOutput {
		children,
		slot_instructions,
	} = ctx.slot_renderer().render_slots(ctx, slots).await?;

	let mut html: String = slot_instructions
		.iter()
		.map(|instruction| ctx.instruction_to_string(instruction))
		.collect();
	html.push_str(&component.render(&children));
	Ok(RenderInstance::chunks(vec![RenderChunk::Markup(html)]))
}

fn render_template_component(
	ctx: &RenderContext,
	display_name: &str,
	factory: &dyn ComponentFactory,
	props: Props,
	slots: ComponentSlots,
) -> RenderInstance {
	let instance = factory.instantiate(ctx, display_name, props, slots);
	let buffered = BufferedRender::spawn(|mut writer| async move {
		instance.render(&mut writer).await
	});
	RenderInstance {
		output: InstanceOutput::Buffered(buffered),
	}
}

/// Component resolved through the renderer registry.
#[derive(Debug, Clone, Copy)]
enum FrameworkTarget<'a> {
	Framework(&'a FrameworkComponent),
	Tag(&'a str),
	Missing,
}

impl<'a> FrameworkTarget<'a> {
	fn component_ref(&self) -> ComponentRef<'a> {
		match *self {
			Self::Framework(c) => ComponentRef::Framework(c),
			Self::Tag(tag) => ComponentRef::Tag(tag),
			Self::Missing => ComponentRef::Missing,
		}
	}
}

async fn render_framework_component(
	ctx: &RenderContext,
	display_name: &str,
	component: FrameworkTarget<'_>,
	props: Props,
	slots: &ComponentSlots,
) -> RenderResult<RenderInstance> {
	if matches!(component, FrameworkTarget::Missing) && !props.contains_key("client:only") {
		return Err(Diagnostic::missing_component(display_name).into());
	}

	let extracted = ctx
		.directive_extractor()
		.extract(&props, &ctx.options().client_directives)?;
	let mut metadata = RenderMetadata::new(display_name);
	if let Some(hydration) = &extracted.hydration {
		metadata = metadata.with_hydration(hydration);
	}

	let SlotsOutput {
		children,
		slot_instructions,
	} = ctx.slot_renderer().render_slots(ctx, slots).await?;

	let resolution = resolve_renderer(
		ctx.registry(),
		ctx.hints(),
		ResolveRequest {
			component: component.component_ref(),
			props: &extracted.props,
			children: &children,
			metadata: &metadata,
		},
	)
	.await?;

	if let (Resolution::NativeElement, FrameworkTarget::Framework(c)) = (&resolution, component)
		&& let Some(element) = c.native_element()
	{
		let html = render_native_element(element, &extracted.props, &children);
		return Ok(RenderInstance::chunks(vec![RenderChunk::Markup(html)]));
	}

	let renderer = resolution.renderer();
	let mut markup = StaticMarkup::default();
	if let Some(renderer) = renderer {
		if metadata.is_client_only() {
			markup.html = children.get("fallback").cloned().unwrap_or_default();
		} else {
			markup = renderer
				.render_to_static_markup(component.component_ref(), &extracted.props, &children, &metadata)
				.await
				.map_err(|err| RenderError::component(Some(renderer.name()), err))?;
		}
		validate_client_entrypoint(renderer.as_ref(), &metadata)?;
	}

	let StaticMarkup { mut html, attrs } = markup;
	if html.is_empty()
		&& let FrameworkTarget::Tag(tag) = component
	{
		html = render_tag_element(tag, &extracted.props, &children);
	}

	let mut chunks: Vec<RenderChunk> = slot_instructions
		.into_iter()
		.map(RenderChunk::Instruction)
		.collect();

	let Some(hydration) = extracted.hydration else {
		let pass_through = renderer.is_some_and(|r| r.name() == PASS_THROUGH_RENDERER);
		if extracted.is_page || pass_through {
			chunks.push(RenderChunk::Markup(html));
		} else if !html.is_empty() {
			let supports_static = renderer.is_none_or(|r| r.supports_static_slot_markers());
			chunks.push(RenderChunk::Markup(remove_slot_markers(&html, supports_static)));
		}
		return Ok(RenderInstance::chunks(chunks));
	};

	let Some(renderer) = renderer else {
		let url = Some(hydration.component_url.as_str());
		return Err(Diagnostic::no_matching_renderer(
			display_name,
			component_extension(url),
			ctx.registry().valid_renderers().len(),
			&guess_renderers(url),
		)
		.into());
	};

	let uid = island_identity(
		&hydration.component_export,
		&hydration.component_url,
		&html,
		&serialize_props(&extracted.props),
	);
	let mut island = generate_hydrate_script(
		ctx,
		HydrateScriptOptions {
			renderer: renderer.as_ref(),
			uid: &uid,
			props: &extracted.props,
			attrs: attrs.as_deref(),
		},
		&metadata,
		&hydration,
	)?;

	let marker = slot_marker(
		renderer.supports_static_slot_markers(),
		metadata.hydrate.is_some(),
	);
	let unrendered = unrendered_slots(&html, &children, marker);
	island.children = format!("{html}{}", slot_templates(&unrendered, &children));
	if !island.children.is_empty() {
		island
			.props
			.insert("await-children".to_string(), serde_json::Value::String(String::new()));
		island.children.push_str(ISLAND_END_MARKER);
	}

	let client_only = hydration.directive.is_only();
	chunks.push(RenderChunk::Instruction(RenderInstruction::Directive(
		hydration,
	)));
	if !client_only && let Some(script) = renderer.hydration_script() {
		chunks.push(RenderChunk::Instruction(
			RenderInstruction::RendererHydrationScript {
				renderer_name: renderer.name().to_string(),
				script,
			},
		));
	}
	chunks.push(RenderChunk::Markup(island.to_html()));
	debug!(component = display_name, uid = %uid, "rendered island");
	Ok(RenderInstance::chunks(chunks))
}

/// Serializes an unclaimed custom element constructor.
fn render_native_element(element: &NativeElement, props: &Props, children: &RenderedSlots) -> String {
	let name = element.element_name();
	let default = children.get(DEFAULT_SLOT).map(String::as_str).unwrap_or_default();
	render_element(&name, props, default, true)
}

/// Serializes an unclaimed tag string.
fn render_tag_element(tag: &str, props: &Props, children: &RenderedSlots) -> String {
	let tag = sanitize_element_name(tag);
	let attrs = spread_attributes(props, true);
	let content: String = children.values().map(String::as_str).collect();
	if content.is_empty() && is_void_element(&tag) {
		format!("<{tag}{attrs}/>")
	} else {
		format!("<{tag}{attrs}>{content}</{tag}>")
	}
}
