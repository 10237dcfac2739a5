//! Drawing primitives recorded on a paper.
//!
//! Each primitive is an immutable snapshot of what a pen drew: color, width
//! and geometry are captured when the pen emits it, so later pen changes never
//! touch already recorded drawings.

use crate::Rgba;
use crate::text::FontStyle;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A straight stroke between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStroke {
    pub from: Point,
    pub to: Point,
    pub color: Rgba,
    pub width: f64,
}

impl LineStroke {
    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.from, self.to).inflate(self.width / 2.0, self.width / 2.0)
    }
}

/// An unfilled ellipse inscribed in `bounds`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvalStroke {
    pub bounds: Rect,
    pub color: Rgba,
    pub width: f64,
}

/// A single line of text stamped at a baseline origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStamp {
    pub text: String,
    /// Start of the baseline; the rotation pivot.
    pub origin: Point,
    /// Clockwise rotation in radians.
    pub angle: f64,
    pub color: Rgba,
    pub style: FontStyle,
    /// Font size in pixels.
    pub size: f64,
    /// Radius around `origin` that contains the text at any rotation.
    pub extent: f64,
}

impl TextStamp {
    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.origin, (self.extent * 2.0, self.extent * 2.0))
    }
}

/// One recorded drawing instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Line(LineStroke),
    Oval(OvalStroke),
    Text(TextStamp),
}

impl Primitive {
    /// Area the primitive may paint into.
    pub fn bounds(&self) -> Rect {
        match self {
            Primitive::Line(line) => line.bounds(),
            Primitive::Oval(oval) => oval.bounds.inflate(oval.width / 2.0, oval.width / 2.0),
            Primitive::Text(text) => text.bounds(),
        }
    }

    pub fn color(&self) -> Rgba {
        match self {
            Primitive::Line(line) => line.color,
            Primitive::Oval(oval) => oval.color,
            Primitive::Text(text) => text.color,
        }
    }
}

impl From<LineStroke> for Primitive {
    fn from(line: LineStroke) -> Self {
        Primitive::Line(line)
    }
}

impl From<OvalStroke> for Primitive {
    fn from(oval: OvalStroke) -> Self {
        Primitive::Oval(oval)
    }
}

impl From<TextStamp> for Primitive {
    fn from(text: TextStamp) -> Self {
        Primitive::Text(text)
    }
}
