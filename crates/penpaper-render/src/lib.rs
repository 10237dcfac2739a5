//! Penpaper Render Library
//!
//! Renderer abstraction and implementations for penpaper.
//! The default implementation uses Vello for GPU-accelerated rendering and
//! Parley for text layout.

mod renderer;

#[cfg(feature = "vello-renderer")]
mod layout;
#[cfg(feature = "vello-renderer")]
mod metrics;
#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};

#[cfg(feature = "vello-renderer")]
pub use metrics::ParleyMetrics;
#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;
