//! Vello-based renderer implementation.

use crate::layout::single_line;
use crate::renderer::{RenderContext, Renderer};
use kurbo::{Affine, Cap, Ellipse, Line, Point, Rect, Size, Stroke};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, LayoutContext};
use peniko::{Brush, Color, Fill};
use penpaper_core::{LineStroke, OvalStroke, PaintTarget, Primitive, Rgba, TextStamp};
use vello::Scene;

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Font context for text rendering (cached across frames).
    font_cx: FontContext,
    /// Layout context for text rendering.
    layout_cx: LayoutContext<Brush>,
    /// Paper to viewport transform of the frame being built.
    transform: Affine,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
            transform: Affine::IDENTITY,
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    fn render_line(&mut self, line: &LineStroke) {
        let stroke = Stroke::new(line.width).with_caps(Cap::Round);
        self.scene.stroke(
            &stroke,
            self.transform,
            Color::from(line.color),
            None,
            &Line::new(line.from, line.to),
        );
    }

    fn render_oval(&mut self, oval: &OvalStroke) {
        let stroke = Stroke::new(oval.width);
        self.scene.stroke(
            &stroke,
            self.transform,
            Color::from(oval.color),
            None,
            &Ellipse::from_rect(oval.bounds),
        );
    }

    /// Render a text stamp with its baseline starting at the origin, rotated
    /// about it.
    fn render_text(&mut self, stamp: &TextStamp) {
        if stamp.text.is_empty() {
            return;
        }
        let brush = Brush::Solid(Color::from(stamp.color));
        let layout = single_line(
            &mut self.font_cx,
            &mut self.layout_cx,
            &stamp.text,
            stamp.style,
            stamp.size,
            brush.clone(),
        );

        // Parley layouts have y=0 at the top of the first line
        let baseline = layout
            .lines()
            .next()
            .map(|line| line.metrics().baseline)
            .unwrap_or_default();
        let text_transform = self.transform
            * Affine::translate(stamp.origin.to_vec2())
            * Affine::rotate(stamp.angle);

        let mut glyph_count = 0;
        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline() - baseline;
                let run = glyph_run.run();
                let font = run.font();
                let font_size = run.font_size();
                let synthesis = run.synthesis();
                let glyph_xform = synthesis
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        glyph_count += 1;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(font)
                        .brush(&brush)
                        .hint(true)
                        .transform(text_transform)
                        .glyph_transform(glyph_xform)
                        .font_size(font_size)
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }

        // No font found: mark where the text would be
        if glyph_count == 0 {
            log::warn!("No glyphs for {:?}, drawing a placeholder", stamp.text);
            let height = stamp.size * 1.2;
            let width = stamp.text.chars().count() as f64 * stamp.size * 0.6;
            let rect = Rect::new(0.0, -stamp.size, width.max(4.0), height - stamp.size);
            self.scene.stroke(
                &Stroke::new(1.0),
                text_transform,
                Color::from(stamp.color),
                None,
                &rect,
            );
        }
    }
}

impl PaintTarget for VelloRenderer {
    fn fill_background(&mut self, color: Rgba, size: Size) {
        let rect = Rect::from_origin_size(Point::ZERO, size);
        self.scene
            .fill(Fill::NonZero, self.transform, Color::from(color), None, &rect);
    }

    fn paint(&mut self, primitive: &Primitive) {
        match primitive {
            Primitive::Line(line) => self.render_line(line),
            Primitive::Oval(oval) => self.render_oval(oval),
            Primitive::Text(stamp) => self.render_text(stamp),
        }
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();
        self.transform = ctx.transform();
        ctx.paper.replay(self);
    }
}
