//! The pen: a turtle-style cursor drawing onto one paper.

use crate::error::{PaperError, PaperResult};
use crate::heading::{normalize_degrees, quantize, to_degrees, to_radians};
use crate::paper::{Paper, PaperInner};
use crate::primitive::{LineStroke, OvalStroke, TextStamp};
use crate::text::{DEFAULT_FONT_SIZE, FontStyle};
use crate::Rgba;
use kurbo::{Point, Rect};
use std::fmt;
use std::sync::Weak;

/// A cursor with a position, a heading and a drawing state.
///
/// Positions are in paper pixels with y growing downwards. Headings are in
/// degrees: 0 = right, 90 = down, 180 = left, 270 = up. Position and heading
/// are kept rounded to three decimals so long walks do not drift.
///
/// A pen starts at the top-left corner, facing right, lifted.
#[derive(Debug, Clone)]
pub struct Pen {
    paper: Weak<PaperInner>,
    x: f64,
    y: f64,
    heading: f64,
    down: bool,
    color: Rgba,
    stroke_width: u32,
}

impl Pen {
    pub const DEFAULT_STROKE_WIDTH: u32 = 2;

    /// Create a pen drawing on `paper`.
    pub fn new(paper: &Paper) -> PaperResult<Self> {
        if !paper.is_open() {
            return Err(paper.closed_error());
        }
        Ok(Self {
            paper: paper.downgrade(),
            x: 0.0,
            y: 0.0,
            heading: 0.0,
            down: false,
            color: Rgba::BLACK,
            stroke_width: Self::DEFAULT_STROKE_WIDTH,
        })
    }

    /// The paper this pen draws on, if it is still open.
    pub fn paper(&self) -> PaperResult<Paper> {
        let paper = self
            .paper
            .upgrade()
            .map(Paper::from_inner)
            .ok_or_else(|| PaperError::Closed("dropped paper".to_string()))?;
        if paper.is_open() {
            Ok(paper)
        } else {
            Err(paper.closed_error())
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Heading in degrees, in `[0, 360)`.
    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Point the pen at an absolute heading; returns the stored value.
    pub fn set_heading(&mut self, degrees: f64) -> f64 {
        self.heading = normalize_degrees(degrees);
        self.heading
    }

    /// Turn clockwise by `degrees` (negative turns counter-clockwise).
    pub fn turn_by(&mut self, degrees: f64) -> f64 {
        self.set_heading(self.heading + degrees)
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    /// Color for everything drawn from now on.
    pub fn set_color(&mut self, color: impl Into<Rgba>) -> Rgba {
        self.color = color.into();
        self.color
    }

    /// Width of lines and circles (not text).
    pub fn stroke_width(&self) -> u32 {
        self.stroke_width
    }

    /// Set the stroke width, at least 1; returns the stored value.
    pub fn set_stroke_width(&mut self, width: u32) -> u32 {
        self.stroke_width = width.max(1);
        self.stroke_width
    }

    pub fn is_down(&self) -> bool {
        self.down
    }

    /// Start drawing on the following moves.
    pub fn down(&mut self) {
        self.down = true;
    }

    /// Stop drawing; the pen still moves.
    pub fn up(&mut self) {
        self.down = false;
    }

    fn set_position(&mut self, x: f64, y: f64) {
        self.x = quantize(x);
        self.y = quantize(y);
    }

    /// Face the point `(x, y)` without moving.
    ///
    /// Turning towards the pen's own position keeps the heading.
    pub fn turn_to(&mut self, x: f64, y: f64) {
        if x == self.x && y == self.y {
            return;
        }
        if y == self.y {
            self.set_heading(if x > self.x { 0.0 } else { 180.0 });
            return;
        }
        if x == self.x {
            self.set_heading(if y > self.y { 90.0 } else { 270.0 });
            return;
        }

        let angle = to_degrees(((y - self.y).abs() / (x - self.x).abs()).atan());
        let heading = match (x < self.x, y < self.y) {
            (true, false) => 180.0 - angle,
            (true, true) => angle + 180.0,
            (false, true) => 360.0 - angle,
            (false, false) => angle,
        };
        self.set_heading(heading);
    }

    /// Turn towards `(x, y)` and move there, drawing a line if the pen is
    /// down.
    pub fn move_to(&mut self, x: f64, y: f64) -> PaperResult<()> {
        let paper = self.paper()?;
        self.turn_to(x, y);
        if self.down {
            paper.add_primitive(LineStroke {
                from: self.position(),
                to: Point::new(x, y),
                color: self.color,
                width: f64::from(self.stroke_width),
            })?;
        }
        self.set_position(x, y);
        paper.request_redraw();
        Ok(())
    }

    /// Move `distance` pixels along the heading; negative values move
    /// backwards.
    pub fn move_by(&mut self, distance: f64) -> PaperResult<()> {
        let (sin, cos) = to_radians(self.heading).sin_cos();
        self.move_to(self.x + distance * cos, self.y + distance * sin)
    }

    /// Draw a circle through the pen's position without moving the pen.
    ///
    /// The circle lies on the pen's right-hand side: its center is `radius`
    /// away from the pen, a quarter turn clockwise from the heading. At
    /// heading 0 the pen sits at the top of the circle.
    pub fn draw_circle(&mut self, radius: f64) -> PaperResult<()> {
        let paper = self.paper()?;
        if !self.down {
            return Ok(());
        }
        let radius = radius.abs();
        let (sin, cos) = match self.heading {
            h if h == 0.0 => (0.0, 1.0),
            h if h == 90.0 => (1.0, 0.0),
            h if h == 180.0 => (0.0, -1.0),
            h if h == 270.0 => (-1.0, 0.0),
            h => to_radians(h).sin_cos(),
        };
        let center = Point::new(self.x - radius * sin, self.y + radius * cos);
        paper.add_primitive(OvalStroke {
            bounds: Rect::from_center_size(center, (radius * 2.0, radius * 2.0)),
            color: self.color,
            width: f64::from(self.stroke_width),
        })?;
        paper.request_redraw();
        Ok(())
    }

    /// Walk a `width` x `height` rectangle starting along the heading and
    /// turning clockwise at each corner. Does nothing while the pen is up.
    ///
    /// The pen ends where it started, facing the same way.
    pub fn draw_rect(&mut self, width: f64, height: f64) -> PaperResult<()> {
        self.paper()?;
        if !self.down {
            return Ok(());
        }
        for side in [width, height, width, height] {
            self.move_by(side)?;
            self.turn_by(90.0);
        }
        Ok(())
    }

    /// Font style `write` uses: bold for thick pens.
    pub fn default_font_style(&self) -> FontStyle {
        if self.stroke_width > 3 {
            FontStyle::Bold
        } else {
            FontStyle::Plain
        }
    }

    /// Write `value` along the heading with the default style and size.
    pub fn write(&mut self, value: impl fmt::Display) -> PaperResult<()> {
        let style = self.default_font_style();
        self.write_styled(value, style, DEFAULT_FONT_SIZE)
    }

    /// Write `value` starting at the pen, rotated to the heading, then move
    /// the pen to the end of the text without drawing a line.
    ///
    /// Does nothing while the pen is up.
    pub fn write_styled(
        &mut self,
        value: impl fmt::Display,
        style: FontStyle,
        size: f64,
    ) -> PaperResult<()> {
        let paper = self.paper()?;
        if !self.down {
            return Ok(());
        }
        let text = value.to_string();
        let extent = paper.measure_text(&text, style, size);
        paper.add_primitive(TextStamp {
            text,
            origin: self.position(),
            angle: to_radians(self.heading),
            color: self.color,
            style,
            size,
            extent: extent.diagonal(),
        })?;

        self.up();
        let advanced = self.move_by(extent.width);
        self.down();
        advanced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paper::PaperConfig;
    use crate::primitive::Primitive;
    use crate::text::{EstimatedMetrics, TextMetrics};

    fn setup() -> (Paper, Pen) {
        let (paper, _) = Paper::headless(PaperConfig::default());
        let pen = Pen::new(&paper).unwrap();
        (paper, pen)
    }

    fn lines(paper: &Paper) -> Vec<LineStroke> {
        paper
            .primitives()
            .into_iter()
            .filter_map(|p| match p {
                Primitive::Line(line) => Some(line),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_initial_state() {
        let (_paper, pen) = setup();
        assert_eq!(pen.position(), Point::ZERO);
        assert_eq!(pen.heading(), 0.0);
        assert!(!pen.is_down());
        assert_eq!(pen.color(), Rgba::BLACK);
        assert_eq!(pen.stroke_width(), 2);
    }

    #[test]
    fn test_move_to_lands_on_rounded_target() {
        let (paper, mut pen) = setup();
        let targets = [
            (10.0, 20.0),
            (33.33333, 66.66666),
            (-5.0004, 7.0006),
            (123.4561, -0.0001),
        ];
        for (i, (x, y)) in targets.into_iter().enumerate() {
            if i % 2 == 0 {
                pen.down();
            } else {
                pen.up();
            }
            pen.move_to(x, y).unwrap();
            assert_eq!(pen.x(), quantize(x));
            assert_eq!(pen.y(), quantize(y));
        }
        assert_eq!(pen.position(), Point::new(123.456, 0.0));
        assert_eq!(lines(&paper).len(), 2);
    }

    #[test]
    fn test_move_to_draws_only_when_down() {
        let (paper, mut pen) = setup();
        pen.move_to(50.0, 50.0).unwrap();
        assert!(paper.is_empty());

        pen.down();
        pen.move_to(100.0, 50.0).unwrap();
        let drawn = lines(&paper);
        assert_eq!(drawn.len(), 1);
        assert_eq!(drawn[0].from, Point::new(50.0, 50.0));
        assert_eq!(drawn[0].to, Point::new(100.0, 50.0));
        assert_eq!(drawn[0].width, 2.0);
    }

    #[test]
    fn test_move_requests_redraw() {
        let (paper, display) = Paper::headless(PaperConfig::default());
        let mut pen = Pen::new(&paper).unwrap();
        pen.move_to(1.0, 1.0).unwrap();
        pen.move_by(5.0).unwrap();
        assert_eq!(display.redraw_count(), 2);
    }

    #[test]
    fn test_color_is_captured_per_line() {
        let (paper, mut pen) = setup();
        pen.down();
        pen.set_color(Rgba::RED);
        pen.move_to(10.0, 0.0).unwrap();
        pen.set_color(Rgba::BLUE);
        pen.set_stroke_width(5);
        pen.move_to(20.0, 0.0).unwrap();

        let drawn = lines(&paper);
        assert_eq!(drawn[0].color, Rgba::RED);
        assert_eq!(drawn[0].width, 2.0);
        assert_eq!(drawn[1].color, Rgba::BLUE);
        assert_eq!(drawn[1].width, 5.0);
    }

    #[test]
    fn test_move_by_follows_heading() {
        let (_paper, mut pen) = setup();
        pen.move_to(100.0, 100.0).unwrap();
        pen.set_heading(90.0);
        pen.move_by(50.0).unwrap();
        assert_eq!(pen.position(), Point::new(100.0, 150.0));
        assert_eq!(pen.heading(), 90.0);

        pen.move_by(-20.0).unwrap();
        assert_eq!(pen.position(), Point::new(100.0, 130.0));

        pen.set_heading(45.0);
        pen.move_by(10.0).unwrap();
        assert_eq!(pen.position(), Point::new(107.071, 137.071));
    }

    #[test]
    fn test_turn_to_axes() {
        let (_paper, mut pen) = setup();
        pen.move_to(100.0, 100.0).unwrap();

        pen.turn_to(200.0, 100.0);
        assert_eq!(pen.heading(), 0.0);
        pen.turn_to(0.0, 100.0);
        assert_eq!(pen.heading(), 180.0);
        pen.turn_to(100.0, 200.0);
        assert_eq!(pen.heading(), 90.0);
        pen.turn_to(100.0, 0.0);
        assert_eq!(pen.heading(), 270.0);
    }

    #[test]
    fn test_turn_to_quadrants() {
        let (_paper, mut pen) = setup();
        pen.move_to(100.0, 100.0).unwrap();

        pen.turn_to(110.0, 110.0);
        assert_eq!(pen.heading(), 45.0);
        pen.turn_to(90.0, 110.0);
        assert_eq!(pen.heading(), 135.0);
        pen.turn_to(90.0, 90.0);
        assert_eq!(pen.heading(), 225.0);
        pen.turn_to(110.0, 90.0);
        assert_eq!(pen.heading(), 315.0);

        pen.turn_to(100.0 + 3f64.sqrt(), 101.0);
        assert_eq!(pen.heading(), 30.0);
    }

    #[test]
    fn test_turn_to_own_position_keeps_heading() {
        let (_paper, mut pen) = setup();
        pen.move_to(40.0, 60.0).unwrap();
        pen.set_heading(123.0);
        pen.turn_to(40.0, 60.0);
        assert_eq!(pen.heading(), 123.0);
    }

    #[test]
    fn test_turn_to_and_back_is_opposite() {
        let (_paper, mut pen) = setup();
        pen.move_to(10.0, 10.0).unwrap();
        pen.turn_to(70.0, 30.0);
        let there = pen.heading();
        pen.move_to(70.0, 30.0).unwrap();
        pen.turn_to(10.0, 10.0);
        let back = pen.heading();
        assert!(((back - there).rem_euclid(360.0) - 180.0).abs() < 0.002);
    }

    #[test]
    fn test_heading_always_normalized() {
        let (_paper, mut pen) = setup();
        for degrees in [-1e6, -725.5, -360.0, -0.0004, 0.0, 359.9999, 360.0, 1080.25, 1e9] {
            let stored = pen.set_heading(degrees);
            assert!((0.0..360.0).contains(&stored), "{degrees} -> {stored}");
        }
        pen.set_heading(350.0);
        assert_eq!(pen.turn_by(20.0), 10.0);
        assert_eq!(pen.turn_by(-30.0), 340.0);
    }

    #[test]
    fn test_stroke_width_is_positive() {
        let (_paper, mut pen) = setup();
        assert_eq!(pen.set_stroke_width(0), 1);
        assert_eq!(pen.set_stroke_width(7), 7);
    }

    #[test]
    fn test_draw_circle_cardinal_placement() {
        let cases = [
            (0.0, Rect::new(90.0, 100.0, 110.0, 120.0)),
            (90.0, Rect::new(80.0, 90.0, 100.0, 110.0)),
            (180.0, Rect::new(90.0, 80.0, 110.0, 100.0)),
            (270.0, Rect::new(100.0, 90.0, 120.0, 110.0)),
        ];
        for (heading, expected) in cases {
            let (paper, mut pen) = setup();
            pen.move_to(100.0, 100.0).unwrap();
            pen.set_heading(heading);
            pen.down();
            pen.draw_circle(10.0).unwrap();
            match &paper.primitives()[0] {
                Primitive::Oval(oval) => assert_eq!(oval.bounds, expected, "heading {heading}"),
                other => panic!("expected oval, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_draw_circle_passes_through_pen() {
        let (paper, mut pen) = setup();
        pen.move_to(200.0, 150.0).unwrap();
        pen.down();
        for heading in [15.0, 100.0, 200.0, 300.0] {
            pen.set_heading(heading);
            pen.draw_circle(25.0).unwrap();
        }
        for primitive in paper.primitives() {
            let Primitive::Oval(oval) = primitive else {
                panic!("expected only ovals");
            };
            let center = oval.bounds.center();
            assert!((center.distance(pen.position()) - 25.0).abs() < 1e-9);
            assert!((oval.bounds.width() - 50.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_draw_circle_keeps_state() {
        let (paper, mut pen) = setup();
        pen.move_to(30.0, 40.0).unwrap();
        pen.set_heading(77.7);
        let before = (pen.position(), pen.heading());
        pen.down();
        for _ in 0..3 {
            pen.draw_circle(12.0).unwrap();
            assert_eq!((pen.position(), pen.heading()), before);
        }
        assert_eq!(paper.len(), 3);

        pen.up();
        pen.draw_circle(12.0).unwrap();
        assert_eq!(paper.len(), 3);
    }

    #[test]
    fn test_draw_rect_returns_to_start() {
        let (paper, mut pen) = setup();
        pen.move_to(100.0, 100.0).unwrap();
        pen.set_heading(0.0);
        pen.down();
        pen.draw_rect(50.0, 30.0).unwrap();

        assert_eq!(pen.position(), Point::new(100.0, 100.0));
        assert_eq!(pen.heading(), 0.0);
        let corners: Vec<Point> = lines(&paper).iter().map(|l| l.to).collect();
        assert_eq!(corners.len(), 4);
        assert_eq!(corners[0], Point::new(150.0, 100.0));
        assert!(corners[1].distance(Point::new(150.0, 130.0)) < 1e-9);
        assert!(corners[2].distance(Point::new(100.0, 130.0)) < 1e-9);
    }

    #[test]
    fn test_draw_rect_at_an_angle() {
        let (_paper, mut pen) = setup();
        pen.move_to(100.0, 100.0).unwrap();
        pen.set_heading(30.0);
        pen.down();
        pen.draw_rect(40.0, 25.0).unwrap();
        // Quantization may leave the pen a few thousandths away
        assert!(pen.position().distance(Point::new(100.0, 100.0)) < 0.005);
        assert!((pen.heading() - 30.0).abs() < 0.005);
    }

    #[test]
    fn test_draw_rect_needs_pen_down() {
        let (paper, mut pen) = setup();
        pen.move_to(10.0, 10.0).unwrap();
        pen.draw_rect(50.0, 30.0).unwrap();
        assert!(paper.is_empty());
        assert_eq!(pen.position(), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_write_advances_by_text_width() {
        let (paper, mut pen) = setup();
        pen.move_to(100.0, 100.0).unwrap();
        pen.set_heading(0.0);
        pen.down();
        pen.write("AB").unwrap();

        let width = EstimatedMetrics.measure("AB", FontStyle::Plain, 15.0).width;
        assert_eq!(pen.position(), Point::new(quantize(100.0 + width), 100.0));
        assert_eq!(pen.heading(), 0.0);
        assert!(pen.is_down());
        // Only the stamp, no line for the advance
        assert_eq!(paper.len(), 1);
        match &paper.primitives()[0] {
            Primitive::Text(stamp) => {
                assert_eq!(stamp.text, "AB");
                assert_eq!(stamp.origin, Point::new(100.0, 100.0));
                assert_eq!(stamp.style, FontStyle::Plain);
                assert_eq!(stamp.size, 15.0);
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_write_rotates_with_heading() {
        let (paper, mut pen) = setup();
        pen.move_to(50.0, 50.0).unwrap();
        pen.set_heading(90.0);
        pen.set_stroke_width(4);
        pen.down();
        pen.write(42).unwrap();

        let Primitive::Text(stamp) = &paper.primitives()[0] else {
            panic!("expected text");
        };
        assert_eq!(stamp.text, "42");
        assert_eq!(stamp.style, FontStyle::Bold);
        assert!((stamp.angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        let extent = EstimatedMetrics.measure("42", FontStyle::Bold, 15.0);
        assert!((stamp.extent - extent.diagonal()).abs() < 1e-9);
        assert_eq!(pen.position(), Point::new(50.0, quantize(50.0 + extent.width)));
    }

    #[test]
    fn test_write_with_pen_up_is_noop() {
        let (paper, mut pen) = setup();
        pen.move_to(5.0, 5.0).unwrap();
        pen.write_styled("ignored", FontStyle::Italic, 20.0).unwrap();
        assert!(paper.is_empty());
        assert_eq!(pen.position(), Point::new(5.0, 5.0));
    }

    #[test]
    fn test_clear_keeps_pen_state() {
        let (paper, mut pen) = setup();
        pen.down();
        pen.move_to(10.0, 10.0).unwrap();
        pen.move_to(20.0, 10.0).unwrap();
        paper.clear().unwrap();
        assert!(paper.is_empty());
        assert_eq!(pen.position(), Point::new(20.0, 10.0));
        assert_eq!(pen.heading(), 0.0);
    }

    #[test]
    fn test_many_pens_share_a_paper() {
        let (paper, mut first) = setup();
        let mut second = Pen::new(&paper).unwrap();
        first.down();
        second.down();
        first.move_to(10.0, 0.0).unwrap();
        second.move_to(0.0, 10.0).unwrap();
        assert_eq!(paper.len(), 2);
        assert_eq!(first.heading(), 0.0);
        assert_eq!(second.heading(), 90.0);
    }

    #[test]
    fn test_closed_paper_fails_fast() {
        let (paper, mut pen) = setup();
        paper.close();
        assert!(matches!(pen.draw_rect(1.0, 1.0), Err(PaperError::Closed(_))));
        pen.down();
        assert!(matches!(pen.move_to(1.0, 1.0), Err(PaperError::Closed(_))));
        assert!(pen.draw_circle(3.0).is_err());
        assert!(pen.write("x").is_err());
        assert_eq!(pen.position(), Point::ZERO);
        assert!(Pen::new(&paper).is_err());
    }

    #[test]
    fn test_dropped_paper_fails_fast() {
        let (paper, mut pen) = setup();
        drop(paper);
        assert!(matches!(pen.move_by(10.0), Err(PaperError::Closed(_))));
    }
}
