//! Component rendering
//!
//! This module provides access to isola-render:
//!
//! - **Dispatch**: fragments, HTML components, templates, framework
//!   components and custom element tags
//! - **Resolution**: build-time hints and renderer capability checks
//! - **Islands**: `astro-island` wrappers with stable identities

// Re-export all isola-render functionality
pub use isola_render::*;
