//! Text measurement backed by the system fonts.

use crate::layout::single_line;
use parley::{FontContext, LayoutContext};
use peniko::Brush;
use penpaper_core::{FontStyle, TextExtent, TextMetrics};
use std::sync::{Mutex, PoisonError};

struct Contexts {
    font_cx: FontContext,
    layout_cx: LayoutContext<Brush>,
}

/// Measures text with the same Parley layout [`crate::VelloRenderer`] draws.
pub struct ParleyMetrics {
    contexts: Mutex<Contexts>,
}

impl Default for ParleyMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ParleyMetrics {
    pub fn new() -> Self {
        Self {
            contexts: Mutex::new(Contexts {
                font_cx: FontContext::new(),
                layout_cx: LayoutContext::new(),
            }),
        }
    }
}

impl std::fmt::Debug for ParleyMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParleyMetrics").finish_non_exhaustive()
    }
}

impl TextMetrics for ParleyMetrics {
    fn measure(&self, text: &str, style: FontStyle, size: f64) -> TextExtent {
        let mut contexts = self.contexts.lock().unwrap_or_else(PoisonError::into_inner);
        let Contexts { font_cx, layout_cx } = &mut *contexts;
        let layout = single_line(font_cx, layout_cx, text, style, size, Brush::default());
        let height = if layout.height() > 0.0 {
            f64::from(layout.height())
        } else {
            // No font matched; fall back to a nominal line height
            size * 1.2
        };
        TextExtent::new(f64::from(layout.width()), height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_no_width() {
        let metrics = ParleyMetrics::new();
        let extent = metrics.measure("", FontStyle::Plain, 15.0);
        assert_eq!(extent.width, 0.0);
        assert!(extent.height > 0.0);
    }

    #[test]
    fn test_longer_text_is_not_narrower() {
        let metrics = ParleyMetrics::new();
        let short = metrics.measure("ab", FontStyle::Plain, 15.0);
        let long = metrics.measure("abab", FontStyle::Plain, 15.0);
        assert!(long.width >= short.width);
    }
}
