//! Pen & Paper Core Library
//!
//! Platform-agnostic turtle geometry, the paper's primitive list and typed
//! input prompts. Nothing in here touches a window or a GPU; a host plugs in
//! through [`DisplaySurface`] and [`TextMetrics`].

mod color;
mod error;
pub mod display;
pub mod heading;
pub mod headless;
pub mod keys;
pub mod paper;
pub mod pen;
pub mod primitive;
pub mod prompt;
pub mod text;
pub mod title;

pub use color::Rgba;
pub use display::{DisplaySurface, PaintTarget};
pub use error::{PaperError, PaperResult};
pub use headless::{HeadlessDisplay, PromptInput};
pub use keys::Key;
pub use paper::{Paper, PaperConfig, PaperId};
pub use pen::Pen;
pub use primitive::{LineStroke, OvalStroke, Primitive, TextStamp};
pub use prompt::{Prompt, PromptKind, PromptRequest, PromptValue};
pub use text::{EstimatedMetrics, FontStyle, TextExtent, TextMetrics};
pub use title::TitleSequence;
