//! Auto-numbered paper titles.

use std::sync::atomic::{AtomicU32, Ordering};

static GLOBAL: TitleSequence = TitleSequence::new();

/// Counter handing out "Paper #N" titles.
///
/// Every opened paper consumes a number, including papers given an explicit
/// title, so numbering tracks how many papers were opened.
#[derive(Debug)]
pub struct TitleSequence {
    next: AtomicU32,
}

impl TitleSequence {
    pub const fn new() -> Self {
        Self {
            next: AtomicU32::new(1),
        }
    }

    /// The process-wide sequence used by [`Paper::open`](crate::Paper::open).
    pub fn global() -> &'static TitleSequence {
        &GLOBAL
    }

    /// Take the next number.
    pub fn next_number(&self) -> u32 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Take the next number and format it as a title.
    pub fn next_title(&self) -> String {
        format!("Paper #{}", self.next_number())
    }

    /// Restart numbering at 1.
    pub fn reset(&self) {
        self.next.store(1, Ordering::Relaxed);
    }
}

impl Default for TitleSequence {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles_increment() {
        let seq = TitleSequence::new();
        assert_eq!(seq.next_title(), "Paper #1");
        assert_eq!(seq.next_title(), "Paper #2");
        assert_eq!(seq.next_number(), 3);
    }

    #[test]
    fn test_reset() {
        let seq = TitleSequence::new();
        seq.next_title();
        seq.next_title();
        seq.reset();
        assert_eq!(seq.next_title(), "Paper #1");
    }
}
