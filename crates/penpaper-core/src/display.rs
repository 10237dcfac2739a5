//! Seams between the paper model and whatever shows it.

use crate::error::PaperResult;
use crate::paper::PaperId;
use crate::primitive::Primitive;
use crate::prompt::Prompt;
use crate::Rgba;
use kurbo::{Point, Size};

/// Window system side of a paper.
///
/// One display surface may serve many papers; every call names the paper it
/// is about. Implementations must be callable from any thread: a windowed host
/// forwards these calls to its UI thread.
pub trait DisplaySurface: Send + Sync {
    /// Ask for the paper to be repainted soon.
    fn request_redraw(&self, paper: PaperId);

    /// Tear down the paper's window. Called once, when the paper closes.
    fn close(&self, paper: PaperId);

    /// Try to bring the paper's window to the foreground.
    fn focus(&self, _paper: PaperId) {}

    /// Pointer position relative to the paper's content origin, if the
    /// pointer is over it.
    fn pointer_position(&self, paper: PaperId) -> Option<Point>;

    /// Show `prompt` modally and block until the user confirms it.
    ///
    /// Returns the prompt in its final state; the caller reads the value with
    /// [`Prompt::submit`].
    fn run_prompt(&self, paper: PaperId, prompt: Prompt) -> PaperResult<Prompt>;
}

/// Something a paper can replay its primitives onto.
pub trait PaintTarget {
    /// Clear the whole drawing area to `color`.
    fn fill_background(&mut self, color: Rgba, size: Size);

    /// Paint a single primitive on top of what is already there.
    fn paint(&mut self, primitive: &Primitive);
}
