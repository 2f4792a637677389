use serde::{Deserialize, Serialize};

use crate::Algorithm;

/// Commands accepted by the playback driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    SelectAlgorithm(Algorithm),
    PauseToggle,
    Reshuffle,
    SpeedUp,
    SpeedDown,
    Quit,
}

/// Backend-neutral key press. The front end translates its own key events
/// into this before looking them up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Char(char),
    Esc,
}

/// Describes how a key should be routed to a driver command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub key: Key,
    pub command: Command,
}

/// Table of key bindings consulted for every key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    bindings: Vec<Binding>,
}

impl Default for KeyMap {
    fn default() -> Self {
        let mut map = Self::empty();
        for algorithm in Algorithm::ALL {
            if let Some(digit) = char::from_digit(algorithm.slot() as u32, 10) {
                map.bind(Key::Char(digit), Command::SelectAlgorithm(algorithm));
            }
        }
        map.bind(Key::Char('r'), Command::Reshuffle);
        map.bind(Key::Char(' '), Command::PauseToggle);
        map.bind(Key::Char('+'), Command::SpeedUp);
        map.bind(Key::Char('='), Command::SpeedUp);
        map.bind(Key::Char('-'), Command::SpeedDown);
        map.bind(Key::Char('_'), Command::SpeedDown);
        map.bind(Key::Char('q'), Command::Quit);
        map.bind(Key::Esc, Command::Quit);
        map
    }
}

impl KeyMap {
    pub fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Binds `key` to `command`, replacing any earlier binding of the key.
    pub fn bind(&mut self, key: Key, command: Command) {
        self.bindings.retain(|binding| binding.key != key);
        self.bindings.push(Binding { key, command });
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Looks up the command for a key press. Letters match case-insensitively.
    pub fn command_for(&self, key: Key) -> Option<Command> {
        let key = match key {
            Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
            other => other,
        };
        self.bindings
            .iter()
            .find(|binding| binding.key == key)
            .map(|binding| binding.command)
    }
}
