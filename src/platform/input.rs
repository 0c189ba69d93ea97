//! Keyboard input

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
    Enter,
    Escape,
    Backspace,
}

/// Polled keyboard state
pub trait InputService {
    fn is_key_down(&self, key: Key) -> bool;

    fn is_key_up(&self, key: Key) -> bool {
        !self.is_key_down(key)
    }

    /// Letter currently held, for initials entry
    fn letter_key_down(&self) -> Option<char>;
}

/// Key state for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub keys: BTreeSet<Key>,
    pub letter: Option<char>,
}

impl TickInput {
    pub fn pressing(keys: &[Key]) -> Self {
        Self {
            keys: keys.iter().copied().collect(),
            letter: None,
        }
    }

    pub fn with_letter(mut self, letter: char) -> Self {
        self.letter = Some(letter.to_ascii_uppercase());
        self
    }
}

impl InputService for TickInput {
    fn is_key_down(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    fn letter_key_down(&self) -> Option<char> {
        self.letter.filter(char::is_ascii_alphabetic)
    }
}
