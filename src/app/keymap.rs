//! Keyboard command interpretation.
//!
//! Hosts deliver already-normalized key events: a key name plus the ctrl, alt and
//! meta modifier flags and whether an upstream handler already claimed the event.
//! [`interpret`] classifies the physical key into a semantic [`Command`]. It does
//! not look at alt or meta for navigation keys; those variants depend on context
//! (loop flag, groups) and are resolved by the machine at dispatch time.
//!
//! # Keybindings
//!
//! | Key                          | Command       |
//! |------------------------------|---------------|
//! | `ArrowDown`, `Ctrl+n`/`Ctrl+j` | `Next`        |
//! | `ArrowUp`, `Ctrl+p`/`Ctrl+k`   | `Prev`        |
//! | `Home`                       | `JumpToStart` |
//! | `End`                        | `JumpToLast`  |
//! | `Enter`                      | `Confirm`     |

use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized key name.
///
/// Serialized as the DOM key string (`"ArrowDown"`, `"Enter"`, `"j"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Home,
    End,
    Enter,
    /// A single printable character.
    Char(char),
    /// Any other named key, kept verbatim.
    Named(String),
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        match name {
            "ArrowDown" => Self::ArrowDown,
            "ArrowUp" => Self::ArrowUp,
            "Home" => Self::Home,
            "End" => Self::End,
            "Enter" => Self::Enter,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => Self::Named(name.to_string()),
                }
            }
        }
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.to_string()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArrowDown => f.write_str("ArrowDown"),
            Self::ArrowUp => f.write_str("ArrowUp"),
            Self::Home => f.write_str("Home"),
            Self::End => f.write_str("End"),
            Self::Enter => f.write_str("Enter"),
            Self::Char(c) => write!(f, "{c}"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// A keyboard event as delivered by the host.
///
/// # Example
///
/// ```rust
/// use palette_machine::app::keymap::{interpret, Command, KeyEvent};
///
/// let event = KeyEvent::new('j').with_ctrl();
/// assert_eq!(interpret(&event), Some(Command::Next));
///
/// let mut claimed = KeyEvent::new("ArrowDown");
/// claimed.prevent_default();
/// assert_eq!(interpret(&claimed), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    #[serde(default, rename = "ctrlKey")]
    pub ctrl: bool,
    #[serde(default, rename = "altKey")]
    pub alt: bool,
    #[serde(default, rename = "metaKey")]
    pub meta: bool,
    /// Set once some handler has claimed the event's default action.
    #[serde(default, rename = "defaultPrevented")]
    pub default_prevented: bool,
}

impl KeyEvent {
    /// Creates an unmodified, unclaimed key event.
    #[must_use]
    pub fn new(key: impl Into<Key>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            alt: false,
            meta: false,
            default_prevented: false,
        }
    }

    #[must_use]
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    #[must_use]
    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    #[must_use]
    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Marks the event's default action as handled.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

/// Semantic palette commands produced from key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move selection forward.
    Next,
    /// Move selection backward.
    Prev,
    /// Select the first visible item.
    JumpToStart,
    /// Select the last visible item.
    JumpToLast,
    /// Confirm the current selection.
    Confirm,
}

impl Command {
    /// Whether interpreting this command claims the key's default action.
    ///
    /// `Next` and `Prev` claim it in their own transition handlers instead.
    #[must_use]
    pub const fn prevents_default(self) -> bool {
        matches!(self, Self::JumpToStart | Self::JumpToLast | Self::Confirm)
    }
}

/// Maps a key event to a palette command.
///
/// Returns `None` for unbound keys and for events whose default action was
/// already prevented upstream.
#[must_use]
pub fn interpret(event: &KeyEvent) -> Option<Command> {
    if event.default_prevented {
        return None;
    }

    match event.key {
        Key::ArrowDown => Some(Command::Next),
        Key::Char('n' | 'j') if event.ctrl => Some(Command::Next),
        Key::ArrowUp => Some(Command::Prev),
        Key::Char('p' | 'k') if event.ctrl => Some(Command::Prev),
        Key::Home => Some(Command::JumpToStart),
        Key::End => Some(Command::JumpToLast),
        Key::Enter => Some(Command::Confirm),
        _ => None,
    }
}
