//! The game keys the controller can press.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A logical key driven by one zone.
///
/// Declaration order is the evaluation order used everywhere: Left, Right, Jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKey {
    Left,
    Right,
    Jump,
}

impl GameKey {
    /// Every key, in evaluation order.
    pub const ALL: [GameKey; 3] = [GameKey::Left, GameKey::Right, GameKey::Jump];

    /// Name of the keyboard key this game key is bound to.
    pub fn key_name(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Jump => "space",
        }
    }
}

impl fmt::Display for GameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    Down,
    Up,
}

/// A key edge emitted by the debouncer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyTransition {
    pub key: GameKey,
    pub action: KeyAction,
}

impl KeyTransition {
    pub fn down(key: GameKey) -> Self {
        Self {
            key,
            action: KeyAction::Down,
        }
    }

    pub fn up(key: GameKey) -> Self {
        Self {
            key,
            action: KeyAction::Up,
        }
    }
}

impl fmt::Display for KeyTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            KeyAction::Down => write!(f, "KeyDown '{}'", self.key),
            KeyAction::Up => write!(f, "KeyUp '{}'", self.key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_names_match_keyboard_vocabulary() {
        let names: Vec<_> = GameKey::ALL.iter().map(|k| k.key_name()).collect();
        assert_eq!(names, vec!["left", "right", "space"]);
    }

    #[test]
    fn transition_display_is_readable() {
        assert_eq!(KeyTransition::down(GameKey::Jump).to_string(), "KeyDown 'space'");
        assert_eq!(KeyTransition::up(GameKey::Left).to_string(), "KeyUp 'left'");
    }
}
