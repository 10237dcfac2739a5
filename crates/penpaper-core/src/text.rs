//! Font styles and text measurement.

use serde::{Deserialize, Serialize};

/// Default font size for pen text, in pixels.
pub const DEFAULT_FONT_SIZE: f64 = 15.0;

/// Font style of written text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    Plain,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    pub fn is_bold(self) -> bool {
        matches!(self, FontStyle::Bold | FontStyle::BoldItalic)
    }

    pub fn is_italic(self) -> bool {
        matches!(self, FontStyle::Italic | FontStyle::BoldItalic)
    }
}

/// Unrotated size of a single line of text.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtent {
    /// Advance width of the whole string.
    pub width: f64,
    /// Line height of the font.
    pub height: f64,
}

impl TextExtent {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Diagonal of the text box, the radius any rotation of it fits in.
    pub fn diagonal(&self) -> f64 {
        self.width.hypot(self.height)
    }
}

/// Measures strings for the pen's `write` operation.
///
/// Hosts with a real font stack plug in their own implementation; the core
/// ships [`EstimatedMetrics`] for headless use.
pub trait TextMetrics: Send + Sync {
    fn measure(&self, text: &str, style: FontStyle, size: f64) -> TextExtent;
}

/// Font-free approximation: every character advances `0.6 * size`, lines are
/// `1.2 * size` tall.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedMetrics;

impl EstimatedMetrics {
    const ADVANCE: f64 = 0.6;
    const LINE_HEIGHT: f64 = 1.2;
}

impl TextMetrics for EstimatedMetrics {
    fn measure(&self, text: &str, _style: FontStyle, size: f64) -> TextExtent {
        let chars = text.chars().count() as f64;
        TextExtent::new(chars * size * Self::ADVANCE, size * Self::LINE_HEIGHT)
    }
}
