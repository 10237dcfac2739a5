//! Renderer trait abstraction.

use kurbo::{Affine, Size};
use peniko::Color;
use penpaper_core::Paper;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The paper to render.
    pub paper: &'a Paper,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context at scale 1.
    pub fn new(paper: &'a Paper, viewport_size: Size) -> Self {
        Self {
            paper,
            viewport_size,
            scale_factor: 1.0,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Transform from paper pixels to viewport pixels.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.scale_factor)
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Build the scene for a frame by replaying the paper.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.paper.background().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use penpaper_core::{PaperConfig, Rgba};

    #[test]
    fn test_context_defaults() {
        let (paper, _) = Paper::headless(PaperConfig::default());
        let ctx = RenderContext::new(&paper, Size::new(854.0, 480.0));
        assert_eq!(ctx.scale_factor, 1.0);
        assert_eq!(ctx.transform(), Affine::IDENTITY);
    }

    #[test]
    fn test_context_scale() {
        let (paper, _) = Paper::headless(PaperConfig::default());
        let ctx = RenderContext::new(&paper, Size::new(1708.0, 960.0)).with_scale_factor(2.0);
        assert_eq!(ctx.transform() * kurbo::Point::new(10.0, 5.0), kurbo::Point::new(20.0, 10.0));
    }

    #[test]
    fn test_background_follows_paper() {
        struct Nothing;
        impl Renderer for Nothing {
            fn build_scene(&mut self, _ctx: &RenderContext) {}
        }

        let (paper, _) = Paper::headless(PaperConfig::default().with_background(Rgba::BLUE));
        let ctx = RenderContext::new(&paper, Size::new(10.0, 10.0));
        assert_eq!(Nothing.background_color(&ctx), Color::from(Rgba::BLUE));
    }
}
