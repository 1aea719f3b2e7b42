//! Keyboard shortcut mapping for card commands

use serde::{Deserialize, Serialize};

/// Commands the keyboard layer can dispatch to a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardCommand {
    /// Space toggles between start and pause depending on run state
    StartOrPause,
    Reset,
    Lap,
}

impl CardCommand {
    /// Map a pressed key to a command. Case-insensitive; unmapped keys
    /// return `None` and are ignored by the caller.
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            ' ' => Some(CardCommand::StartOrPause),
            'r' => Some(CardCommand::Reset),
            'l' => Some(CardCommand::Lap),
            _ => None,
        }
    }
}
