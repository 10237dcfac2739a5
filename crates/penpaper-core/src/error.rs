//! Error type shared by papers, pens and prompts.

use crate::prompt::PromptKind;
use thiserror::Error;

/// Errors raised by paper and pen operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaperError {
    /// The paper was closed (or dropped) before the operation ran.
    #[error("Operation on closed paper: {0}")]
    Closed(String),
    /// Submitted prompt text could not be read as the requested kind.
    #[error("Invalid {kind} input: {text:?}")]
    InvalidInput { kind: PromptKind, text: String },
    /// The display surface failed to deliver a request.
    #[error("Display error: {0}")]
    Display(String),
}

/// Result type for paper operations.
pub type PaperResult<T> = Result<T, PaperError>;
