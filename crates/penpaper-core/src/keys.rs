//! Platform-neutral key codes for paper key bindings.
//!
//! Mapping from winit logical keys ([`Key::from_winit`]):
//!
//! | winit                         | `Key`                       |
//! |-------------------------------|-----------------------------|
//! | `Character("a")`, `"A"`       | `Char('a')` (lowercased)    |
//! | `Character("1")`, `"+"`, ...  | `Char('1')`, `Char('+')`    |
//! | `Named(Space)`                | `Space`                     |
//! | `Named(Enter)`                | `Enter`                     |
//! | `Named(Escape)`               | `Escape`                    |
//! | `Named(Tab)`                  | `Tab`                       |
//! | `Named(Backspace)`            | `Backspace`                 |
//! | `Named(Delete)`               | `Delete`                    |
//! | `Named(ArrowUp)` etc.         | `Up`, `Down`, `Left`, `Right` |
//! | `Named(Home)`, `Named(End)`   | `Home`, `End`               |
//! | `Named(PageUp)`, `PageDown`   | `PageUp`, `PageDown`        |
//! | `Named(F1)` .. `Named(F12)`   | `F(1)` .. `F(12)`           |
//! | `Named(Shift)`, `Control`, `Alt` | `Shift`, `Control`, `Alt` |
//!
//! Anything else (dead keys, IME composition, media keys) maps to `None`.

use serde::{Deserialize, Serialize};
use std::fmt;
use winit::keyboard::{Key as WinitKey, NamedKey};

/// A key a paper binding can listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// A printable character; letters are stored lowercase.
    Char(char),
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// Function key `F1` to `F12`.
    F(u8),
    Shift,
    Control,
    Alt,
}

impl Key {
    /// Key for a printable character, normalized to lowercase.
    pub fn char(c: char) -> Self {
        if c == ' ' {
            return Key::Space;
        }
        Key::Char(c.to_lowercase().next().unwrap_or(c))
    }

    /// Map a winit logical key.
    pub fn from_winit(key: &WinitKey) -> Option<Self> {
        match key {
            WinitKey::Character(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Key::char(c)),
                    _ => None,
                }
            }
            WinitKey::Named(named) => Self::from_named(*named),
            _ => None,
        }
    }

    fn from_named(named: NamedKey) -> Option<Self> {
        let key = match named {
            NamedKey::Space => Key::Space,
            NamedKey::Enter => Key::Enter,
            NamedKey::Escape => Key::Escape,
            NamedKey::Tab => Key::Tab,
            NamedKey::Backspace => Key::Backspace,
            NamedKey::Delete => Key::Delete,
            NamedKey::ArrowUp => Key::Up,
            NamedKey::ArrowDown => Key::Down,
            NamedKey::ArrowLeft => Key::Left,
            NamedKey::ArrowRight => Key::Right,
            NamedKey::Home => Key::Home,
            NamedKey::End => Key::End,
            NamedKey::PageUp => Key::PageUp,
            NamedKey::PageDown => Key::PageDown,
            NamedKey::Shift => Key::Shift,
            NamedKey::Control => Key::Control,
            NamedKey::Alt => Key::Alt,
            NamedKey::F1 => Key::F(1),
            NamedKey::F2 => Key::F(2),
            NamedKey::F3 => Key::F(3),
            NamedKey::F4 => Key::F(4),
            NamedKey::F5 => Key::F(5),
            NamedKey::F6 => Key::F(6),
            NamedKey::F7 => Key::F(7),
            NamedKey::F8 => Key::F(8),
            NamedKey::F9 => Key::F(9),
            NamedKey::F10 => Key::F(10),
            NamedKey::F11 => Key::F(11),
            NamedKey::F12 => Key::F(12),
            _ => return None,
        };
        Some(key)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c.to_uppercase()),
            Key::F(n) => write!(f, "F{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}
