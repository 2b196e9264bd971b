//! # Isola
//!
//! Server-side component rendering for island-based web frameworks.
//!
//! Isola renders pages made of components written for different UI
//! frameworks. Each component is rendered to static HTML on the server by the
//! renderer that claims it. Components with a `client:*` directive are wrapped
//! in hydration islands so the browser only boots the interactive parts of the
//! page.
//!
//! ## Feature Flags
//!
//! - `render` (default) - Component dispatch, renderer resolution and islands
//!
//! ## Example
//!
//! ```rust,ignore
//! use isola::render::prelude::*;
//!
//! let ctx = RenderContext::builder()
//!     .options(RenderOptions::from_toml_str(include_str!("render.toml"))?)
//!     .registry(RendererRegistry::new().with(ReactRenderer::default())?)
//!     .build();
//!
//! let html = render_component_to_string(
//!     &ctx,
//!     "Index",
//!     index_page(),
//!     Props::new(),
//!     ComponentSlots::new(),
//!     Some(&PageRoute::new("src/pages/index.astro")),
//! )
//! .await?;
//! ```

#[cfg(feature = "render")]
pub mod render;
