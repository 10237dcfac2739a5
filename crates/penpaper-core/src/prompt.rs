//! Typed input prompts.
//!
//! A [`Prompt`] is the state behind a modal input dialog: the host shows it,
//! feeds every change of the input field through [`Prompt::edit`], wires the
//! `+`/`-` buttons to [`Prompt::increment`]/[`Prompt::decrement`] and hands the
//! prompt back once the user confirms. The paper then calls
//! [`Prompt::submit`] to read the typed value.

use crate::error::{PaperError, PaperResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value type a prompt collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromptKind {
    /// Any text.
    Text,
    /// A 32-bit signed integer.
    Integer,
    /// A finite floating point number.
    Number,
}

impl PromptKind {
    /// Text the input field starts with.
    pub fn initial_text(self) -> &'static str {
        match self {
            PromptKind::Text => "",
            PromptKind::Integer => "0",
            PromptKind::Number => "0.0",
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, PromptKind::Text)
    }

    /// Noun used in the default prompt message.
    fn noun(self) -> &'static str {
        match self {
            PromptKind::Text => "a text",
            PromptKind::Integer => "an integer",
            PromptKind::Number => "a number",
        }
    }

    /// Whether `text` is acceptable while the user is still typing.
    fn accepts(self, text: &str) -> bool {
        match self {
            PromptKind::Text => true,
            _ if text.is_empty() || text == "." => true,
            PromptKind::Integer => text.parse::<i32>().is_ok(),
            PromptKind::Number => parse_number(text).is_some(),
        }
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PromptKind::Text => "text",
            PromptKind::Integer => "integer",
            PromptKind::Number => "number",
        };
        f.write_str(name)
    }
}

/// Parse a finite number.
fn parse_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Format a number so it always reads as a decimal ("1.0", "0.5", "-2.5").
fn format_number(value: f64) -> String {
    format!("{value:?}")
}

/// A value read from a submitted prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PromptValue {
    Text(String),
    Integer(i32),
    Number(f64),
}

impl PromptValue {
    pub fn kind(&self) -> PromptKind {
        match self {
            PromptValue::Text(_) => PromptKind::Text,
            PromptValue::Integer(_) => PromptKind::Integer,
            PromptValue::Number(_) => PromptKind::Number,
        }
    }
}

/// What to ask for, before defaults are filled in from the paper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub kind: PromptKind,
    pub message: Option<String>,
    pub title: Option<String>,
}

impl PromptRequest {
    pub fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            message: None,
            title: None,
        }
    }

    /// Set the text shown inside the dialog.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the dialog's window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Build the prompt, defaulting message and title from `paper_title`.
    pub fn into_prompt(self, paper_title: &str) -> Prompt {
        let message = self
            .message
            .unwrap_or_else(|| format!("{paper_title} needs {} to continue", self.kind.noun()));
        let title = self.title.unwrap_or_else(|| paper_title.to_string());
        Prompt::new(self.kind, message, title)
    }
}

/// State of one open input dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    kind: PromptKind,
    message: String,
    title: String,
    /// Current content of the input field.
    text: String,
    /// Content before the last accepted edit.
    previous: String,
}

impl Prompt {
    pub fn new(kind: PromptKind, message: impl Into<String>, title: impl Into<String>) -> Self {
        let text = kind.initial_text().to_string();
        Self {
            kind,
            message: message.into(),
            title: title.into(),
            previous: text.clone(),
            text,
        }
    }

    pub fn kind(&self) -> PromptKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current content of the input field.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Apply a change of the input field.
    ///
    /// Returns `false` and keeps the last valid text when a numeric prompt is
    /// given something that is neither empty, a lone `"."`, nor a literal of
    /// its kind.
    pub fn edit(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.text {
            return true;
        }
        if !self.kind.accepts(&text) {
            log::trace!("Rejected {} input {:?}, keeping {:?}", self.kind, text, self.text);
            return false;
        }
        self.previous = std::mem::replace(&mut self.text, text);
        true
    }

    /// Undo the last accepted edit.
    pub fn revert(&mut self) {
        std::mem::swap(&mut self.text, &mut self.previous);
    }

    /// Add one step (1 or 0.5) to a numeric prompt.
    pub fn increment(&mut self) {
        self.step(1);
    }

    /// Subtract one step (1 or 0.5) from a numeric prompt.
    pub fn decrement(&mut self) {
        self.step(-1);
    }

    fn step(&mut self, direction: i32) {
        let blank = self.text.is_empty() || self.text == ".";
        let stepped = match self.kind {
            PromptKind::Text => return,
            PromptKind::Integer if blank => direction.to_string(),
            PromptKind::Integer => match self.text.parse::<i32>() {
                Ok(value) => value.saturating_add(direction).to_string(),
                Err(_) => return,
            },
            PromptKind::Number => {
                let value = if blank { Some(0.0) } else { parse_number(&self.text) };
                match value {
                    Some(value) => format_number(value + 0.5 * f64::from(direction)),
                    None => return,
                }
            }
        };
        self.edit(stepped);
    }

    /// Read the typed value.
    ///
    /// Empty or `"."` numeric input counts as zero. Text that still fails to
    /// parse is reported as [`PaperError::InvalidInput`].
    pub fn submit(&mut self) -> PaperResult<PromptValue> {
        if self.kind.is_numeric() && (self.text.is_empty() || self.text == ".") {
            self.edit("0");
        }
        let invalid = || PaperError::InvalidInput {
            kind: self.kind,
            text: self.text.clone(),
        };
        match self.kind {
            PromptKind::Text => Ok(PromptValue::Text(self.text.clone())),
            PromptKind::Integer => self.text.parse().map(PromptValue::Integer).map_err(|_| invalid()),
            PromptKind::Number => parse_number(&self.text).map(PromptValue::Number).ok_or_else(invalid),
        }
    }
}
