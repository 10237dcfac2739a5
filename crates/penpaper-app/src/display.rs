//! Display surface that forwards paper requests to the event loop.

use kurbo::Point;
use penpaper_core::{DisplaySurface, Paper, PaperError, PaperId, PaperResult, Prompt};
use std::collections::HashMap;
use std::sync::mpsc::{self, Sender};
use std::sync::{Mutex, MutexGuard, PoisonError};
use winit::event_loop::EventLoopProxy;

/// Messages from papers and the program thread to the event loop.
pub(crate) enum UserEvent {
    /// Create a window for a freshly opened paper.
    Open(Paper),
    Redraw(PaperId),
    Close(PaperId),
    Focus(PaperId),
    /// Show a prompt on the paper's window and send it back once confirmed.
    Prompt {
        paper: PaperId,
        prompt: Prompt,
        reply: Sender<Prompt>,
    },
    /// The drawing program returned (or panicked).
    ProgramFinished,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The window side of every paper opened through a host.
pub(crate) struct WindowDisplay {
    proxy: Mutex<EventLoopProxy<UserEvent>>,
    /// Last pointer position per paper, in logical pixels.
    pointers: Mutex<HashMap<PaperId, Point>>,
}

impl WindowDisplay {
    pub fn new(proxy: EventLoopProxy<UserEvent>) -> Self {
        Self {
            proxy: Mutex::new(proxy),
            pointers: Mutex::new(HashMap::new()),
        }
    }

    /// Post an event; returns `false` once the event loop is gone.
    fn send(&self, event: UserEvent) -> bool {
        lock(&self.proxy).send_event(event).is_ok()
    }

    /// Ask the event loop for a window showing `paper`.
    pub fn open(&self, paper: &Paper) -> PaperResult<()> {
        if self.send(UserEvent::Open(paper.clone())) {
            Ok(())
        } else {
            Err(PaperError::Display("event loop is not running".to_string()))
        }
    }

    /// Record where the pointer is over `paper`; `None` when it left.
    pub fn set_pointer(&self, paper: PaperId, position: Option<Point>) {
        let mut pointers = lock(&self.pointers);
        match position {
            Some(position) => {
                pointers.insert(paper, position);
            }
            None => {
                pointers.remove(&paper);
            }
        }
    }
}

impl DisplaySurface for WindowDisplay {
    fn request_redraw(&self, paper: PaperId) {
        self.send(UserEvent::Redraw(paper));
    }

    fn close(&self, paper: PaperId) {
        if !self.send(UserEvent::Close(paper)) {
            log::debug!("Event loop already gone while closing {paper}");
        }
    }

    fn focus(&self, paper: PaperId) {
        self.send(UserEvent::Focus(paper));
    }

    fn pointer_position(&self, paper: PaperId) -> Option<Point> {
        lock(&self.pointers).get(&paper).copied()
    }

    fn run_prompt(&self, paper: PaperId, prompt: Prompt) -> PaperResult<Prompt> {
        let (reply, answer) = mpsc::channel();
        if !self.send(UserEvent::Prompt {
            paper,
            prompt,
            reply,
        }) {
            return Err(PaperError::Display("event loop is not running".to_string()));
        }
        // The sender is dropped without an answer when the window closes
        answer.recv().map_err(|_| PaperError::Closed(paper.to_string()))
    }
}
