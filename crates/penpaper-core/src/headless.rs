//! A display surface without a window, for tests and batch drawing.

use crate::display::DisplaySurface;
use crate::error::PaperResult;
use crate::paper::PaperId;
use crate::prompt::Prompt;
use kurbo::Point;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One simulated user action inside a prompt dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptInput {
    /// Type the characters one at a time at the end of the field.
    Type(String),
    /// Replace the whole field content at once (paste, select-all + type).
    Replace(String),
    /// Press the `+` button.
    Increment,
    /// Press the `-` button.
    Decrement,
    /// Undo the last accepted change.
    Revert,
}

impl PromptInput {
    fn apply(&self, prompt: &mut Prompt) {
        match self {
            PromptInput::Type(chars) => {
                for c in chars.chars() {
                    let mut next = prompt.text().to_string();
                    next.push(c);
                    prompt.edit(next);
                }
            }
            PromptInput::Replace(text) => {
                prompt.edit(text.clone());
            }
            PromptInput::Increment => prompt.increment(),
            PromptInput::Decrement => prompt.decrement(),
            PromptInput::Revert => prompt.revert(),
        }
    }
}

/// Records what a paper asks of its window and answers prompts from scripts.
///
/// Each prompt consumes the next queued script; with no script left the
/// prompt is confirmed unchanged.
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    redraws: AtomicUsize,
    focus_requests: AtomicUsize,
    closed: Mutex<Vec<PaperId>>,
    pointer: Mutex<Option<Point>>,
    scripts: Mutex<VecDeque<Vec<PromptInput>>>,
    shown: Mutex<Vec<Prompt>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl HeadlessDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the inputs for the next prompt.
    pub fn push_script(&self, inputs: Vec<PromptInput>) {
        lock(&self.scripts).push_back(inputs);
    }

    /// Set where the pointer is; `None` means outside the paper.
    pub fn set_pointer(&self, position: Option<Point>) {
        *lock(&self.pointer) = position;
    }

    pub fn redraw_count(&self) -> usize {
        self.redraws.load(Ordering::SeqCst)
    }

    pub fn focus_count(&self) -> usize {
        self.focus_requests.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        lock(&self.closed).len()
    }

    pub fn is_closed(&self, paper: PaperId) -> bool {
        lock(&self.closed).contains(&paper)
    }

    /// Prompts shown so far, as they were when opened.
    pub fn prompts_shown(&self) -> Vec<Prompt> {
        lock(&self.shown).clone()
    }
}

impl DisplaySurface for HeadlessDisplay {
    fn request_redraw(&self, _paper: PaperId) {
        self.redraws.fetch_add(1, Ordering::SeqCst);
    }

    fn close(&self, paper: PaperId) {
        lock(&self.closed).push(paper);
    }

    fn focus(&self, _paper: PaperId) {
        self.focus_requests.fetch_add(1, Ordering::SeqCst);
    }

    fn pointer_position(&self, _paper: PaperId) -> Option<Point> {
        *lock(&self.pointer)
    }

    fn run_prompt(&self, _paper: PaperId, mut prompt: Prompt) -> PaperResult<Prompt> {
        lock(&self.shown).push(prompt.clone());
        let script = lock(&self.scripts).pop_front().unwrap_or_default();
        for input in &script {
            input.apply(&mut prompt);
        }
        Ok(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{PromptKind, PromptValue};

    #[test]
    fn test_typing_reverts_invalid_characters() {
        let display = HeadlessDisplay::new();
        display.push_script(vec![
            PromptInput::Replace(String::new()),
            PromptInput::Type("-3x".into()),
        ]);
        let prompt = Prompt::new(PromptKind::Integer, "m", "t");
        let prompt = display.run_prompt(PaperId::next(), prompt).unwrap();
        // A lone "-" is not an integer, so only "3" sticks
        assert_eq!(prompt.text(), "3");
    }

    #[test]
    fn test_sign_in_front_of_digits_is_accepted() {
        let display = HeadlessDisplay::new();
        display.push_script(vec![
            PromptInput::Replace("3".into()),
            PromptInput::Replace("-3".into()),
        ]);
        let prompt = Prompt::new(PromptKind::Integer, "m", "t");
        let mut prompt = display.run_prompt(PaperId::next(), prompt).unwrap();
        assert_eq!(prompt.text(), "-3");
        assert_eq!(prompt.submit(), Ok(PromptValue::Integer(-3)));
    }

    #[test]
    fn test_scripts_are_consumed_in_order() {
        let display = HeadlessDisplay::new();
        display.push_script(vec![PromptInput::Increment]);
        let id = PaperId::next();
        let first = display
            .run_prompt(id, Prompt::new(PromptKind::Number, "m", "t"))
            .unwrap();
        let second = display
            .run_prompt(id, Prompt::new(PromptKind::Number, "m", "t"))
            .unwrap();
        assert_eq!(first.text(), "0.5");
        assert_eq!(second.text(), "0.0");
        assert_eq!(display.prompts_shown().len(), 2);
    }
}
