//! Isola Render - server-side component rendering
//!
//! This crate turns component values into HTML chunks. It handles slot
//! composition, picks a renderer among the installed UI-framework
//! integrations and wraps hydrated components in `astro-island` elements
//! that the client runtime boots.
//!
//! # Features
//!
//! - **Component dispatch**: fragments, HTML-producing functions, compiled
//!   templates, framework components and custom element tags
//! - **Renderer resolution**: build-time hints, capability checks in
//!   registration order and detailed diagnostics when nothing matches
//! - **Islands**: stable island identities, slot reconciliation and
//!   per-page script deduplication
//! - **Streaming**: nested templates render concurrently in the background
//!   while output keeps document order
//!
//! # Quick Start
//!
//! ```ignore
//! use isola_render::prelude::*;
//! use std::sync::Arc;
//!
//! let mut registry = RendererRegistry::new();
//! registry.register(Arc::new(MyReactRenderer::new()))?;
//!
//! let ctx = RenderContext::builder()
//!     .options(RenderOptions::new().island_runtime(ISLAND_RUNTIME))
//!     .registry(registry)
//!     .build();
//!
//! let html = render_component_to_string(
//!     &ctx,
//!     "Counter",
//!     ComponentValue::Framework(counter),
//!     props,
//!     ComponentSlots::new().with("default", "<p>Count</p>"),
//!     None,
//! )
//! .await?;
//! ```
//!
//! # Runtime
//!
//! Template components render on spawned Tokio tasks, so rendering must run
//! inside a Tokio runtime.

pub mod buffer;
pub mod chunk;
pub mod collector;
pub mod component;
pub mod context;
pub mod directive;
pub mod dispatch;
pub mod error;
pub mod html;
pub mod island;
pub mod options;
pub mod props;
pub mod renderer;
pub mod resolve;
pub mod slots;
pub mod string;

pub use chunk::{RenderChunk, RenderDestination, RenderInstruction};
pub use component::{ComponentValue, FrameworkComponent};
pub use context::{RenderContext, RenderContextBuilder};
pub use dispatch::{RenderInstance, render_component};
pub use error::{Diagnostic, DiagnosticCode, RenderError, RenderResult};
pub use options::RenderOptions;
pub use string::{PageRoute, render_component_to_string};

/// Re-export commonly used types.
pub mod prelude {
	pub use crate::chunk::{RenderChunk, RenderDestination, RenderInstruction};
	pub use crate::component::{
		ComponentFactory, ComponentId, ComponentInstance, ComponentRef, ComponentValue,
		FrameworkComponent, HtmlComponent, NativeElement,
	};
	pub use crate::context::{IdentityResolver, ModuleResolver, RenderContext, RenderContextBuilder};
	pub use crate::directive::{
		ClientDirective, ClientDirectiveExtractor, DirectiveExtractor, ExtractedProps,
		HydrationMetadata,
	};
	pub use crate::dispatch::{RenderInstance, render_component};
	pub use crate::error::{BoxError, Diagnostic, DiagnosticCode, RenderError, RenderResult};
	pub use crate::options::RenderOptions;
	pub use crate::props::Props;
	pub use crate::renderer::{
		RenderMetadata, Renderer, RendererHints, RendererRegistry, StaticMarkup,
	};
	pub use crate::slots::{
		ComponentSlots, DefaultSlotRenderer, RenderedSlots, SlotContent, SlotRenderer,
	};
	pub use crate::string::{PageRoute, render_component_to_string};

	pub use async_trait::async_trait;
}
