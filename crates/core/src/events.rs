//! Engine events, drained by observers after each action or tick

use crate::types::{Color, RocketAxis, Special};

/// Something notable that happened inside the engine.
///
/// Events carry no game logic; front-ends turn them into toasts and remote
/// clients receive their [`message`](GameEvent::message) strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A tap hit a group smaller than two tiles
    TooSmall { x: i8, y: i8 },
    /// A group was popped
    Popped { color: Color, size: usize, score: u32 },
    /// A special was placed after the settle
    SpecialCreated { special: Special, x: i8, y: i8 },
    /// A rocket or bomb fired
    Blasted {
        special: Special,
        axis: Option<RocketAxis>,
        cleared: usize,
        score: u32,
    },
    Shuffled,
    LevelStarted { level: u32 },
    LevelCleared { level: u32 },
    OutOfMoves { level: u32 },
}

impl GameEvent {
    /// Advisory text for the player, if this event has one
    pub fn message(&self) -> Option<String> {
        match self {
            GameEvent::TooSmall { .. } => Some("Need 2+ to pop".to_string()),
            GameEvent::Shuffled => Some("Shuffled!".to_string()),
            GameEvent::LevelStarted { level } => Some(format!("Level {level}")),
            GameEvent::LevelCleared { .. } => Some("Level cleared!".to_string()),
            GameEvent::OutOfMoves { .. } => Some("Out of moves! Try again.".to_string()),
            GameEvent::Popped { .. }
            | GameEvent::SpecialCreated { .. }
            | GameEvent::Blasted { .. } => None,
        }
    }

    /// Stable name for logs and the remote protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            GameEvent::TooSmall { .. } => "tooSmall",
            GameEvent::Popped { .. } => "popped",
            GameEvent::SpecialCreated { .. } => "specialCreated",
            GameEvent::Blasted { .. } => "blasted",
            GameEvent::Shuffled => "shuffled",
            GameEvent::LevelStarted { .. } => "levelStarted",
            GameEvent::LevelCleared { .. } => "levelCleared",
            GameEvent::OutOfMoves { .. } => "outOfMoves",
        }
    }
}
