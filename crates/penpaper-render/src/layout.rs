//! Parley layout shared by the renderer and the text metrics.

use parley::{FontContext, Layout, LayoutContext, StyleProperty};
use peniko::Brush;
use penpaper_core::FontStyle;

/// Lay out `text` on a single line in the system sans-serif face.
pub(crate) fn single_line(
    font_cx: &mut FontContext,
    layout_cx: &mut LayoutContext<Brush>,
    text: &str,
    style: FontStyle,
    size: f64,
    brush: Brush,
) -> Layout<Brush> {
    let weight = if style.is_bold() {
        parley::FontWeight::BOLD
    } else {
        parley::FontWeight::NORMAL
    };
    let slant = if style.is_italic() {
        parley::FontStyle::Italic
    } else {
        parley::FontStyle::Normal
    };

    let mut builder = layout_cx.ranged_builder(font_cx, text, 1.0, false);
    builder.push_default(StyleProperty::FontSize(size as f32));
    builder.push_default(StyleProperty::Brush(brush));
    builder.push_default(StyleProperty::FontWeight(weight));
    builder.push_default(StyleProperty::FontStyle(slant));
    builder.push_default(StyleProperty::FontStack(parley::FontStack::Single(
        parley::FontFamily::Generic(parley::GenericFamily::SansSerif),
    )));
    let mut layout = builder.build(text);

    layout.break_all_lines(None);
    layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());
    layout
}
