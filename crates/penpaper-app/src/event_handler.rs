//! Keyboard routing from windows to paper key bindings.

use penpaper_core::{Key, Paper};
use std::io;
use std::sync::mpsc::{self, Sender};
use std::thread;
use winit::event::{ElementState, KeyEvent};

/// Key a window event should fire bindings for, if any.
///
/// Only presses count; held keys repeat like any other press.
pub(crate) fn key_for_event(event: &KeyEvent) -> Option<Key> {
    if event.state != ElementState::Pressed {
        return None;
    }
    Key::from_winit(&event.logical_key)
}

/// Runs key bindings on a dedicated thread so an action may block, for
/// example on a prompt, without stalling the event loop.
pub(crate) struct KeyDispatcher {
    sender: Sender<(Paper, Key)>,
}

impl KeyDispatcher {
    pub fn spawn() -> io::Result<Self> {
        let (sender, receiver) = mpsc::channel::<(Paper, Key)>();
        thread::Builder::new()
            .name("penpaper-keys".to_string())
            .spawn(move || {
                for (paper, key) in receiver {
                    let fired = paper.dispatch_key(key);
                    log::trace!("Key {key} on {} fired {fired} binding(s)", paper.id());
                }
                log::debug!("Key dispatcher stopped");
            })?;
        Ok(Self { sender })
    }

    /// Queue `key` for `paper`'s bindings.
    pub fn dispatch(&self, paper: &Paper, key: Key) {
        if self.sender.send((paper.clone(), key)).is_err() {
            log::warn!("Key dispatcher is gone, dropping {key}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use penpaper_core::PaperConfig;
    use std::time::Duration;

    #[test]
    fn test_dispatch_runs_bindings_off_thread() {
        let (paper, _) = Paper::headless(PaperConfig::default());
        let (tx, rx) = mpsc::channel();
        let caller = thread::current().id();
        paper
            .add_key_binding(Key::Space, move || {
                tx.send(thread::current().id()).unwrap();
            })
            .unwrap();

        let dispatcher = KeyDispatcher::spawn().unwrap();
        dispatcher.dispatch(&paper, Key::Space);
        dispatcher.dispatch(&paper, Key::Char('x'));

        let ran_on = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_ne!(ran_on, caller);
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn test_bindings_fire_in_order() {
        let (paper, _) = Paper::headless(PaperConfig::default());
        let (tx, rx) = mpsc::channel();
        for label in ["first", "second"] {
            let tx = tx.clone();
            paper
                .add_key_binding(Key::Enter, move || {
                    tx.send(label).unwrap();
                })
                .unwrap();
        }

        let dispatcher = KeyDispatcher::spawn().unwrap();
        dispatcher.dispatch(&paper, Key::Enter);
        let timeout = Duration::from_secs(5);
        assert_eq!(rx.recv_timeout(timeout).unwrap(), "first");
        assert_eq!(rx.recv_timeout(timeout).unwrap(), "second");
    }
}
