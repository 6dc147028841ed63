//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains all the game rules, state management, and simulation logic.
//! It has **no dependencies** on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games (for remote agents and replays)
//! - **Testable**: Every random decision can be scripted
//! - **Portable**: Can run in any environment (terminal, headless, over TCP)
//!
//! # Module Structure
//!
//! - [`board`]: square grid of colored tiles
//! - [`group`]: 4-connected same-color group finder
//! - [`resolve`]: popping groups, firing rockets and bombs
//! - [`gravity`]: column compaction and refill
//! - [`goals`]: per-level color collection goals
//! - [`game_state`]: round lifecycle, settle phase, level transitions
//! - [`rng`]: the random source all decisions are drawn from
//!
//! # Game Rules
//!
//! - **Pop**: tapping a group of 2+ same-colored tiles clears it for `size²` points
//! - **Specials**: groups of 5+ leave a rocket, 7+ a bomb, in the column of a random group cell
//! - **Rocket**: clears a full row or column; **Bomb**: clears the 3x3 around it
//! - **Blast score**: 3 points per cleared tile, specials caught in a blast do not fire
//! - **Goals**: collect `12 + floor(1.5 × level)` tiles of each of two colors within 30 moves
//!
//! # Example
//!
//! ```
//! use zoo_pop_core::{GameState, RulesConfig, TapOutcome};
//! use zoo_pop_types::GameAction;
//!
//! let mut game = GameState::with_config(RulesConfig::instant(), 12345);
//! assert_eq!(game.level(), 1);
//! assert_eq!(game.moves_remaining(), 30);
//!
//! // Every tap resolves to an outcome; nothing panics on bad input
//! assert_eq!(game.tap(-1, 0), TapOutcome::OutOfBounds);
//!
//! game.apply_action(GameAction::Shuffle);
//! assert!(game.board().is_full());
//! ```
//!
//! # Timing
//!
//! After every pop or blast the board refills at once and the engine waits
//! out a settle delay (120ms by default) before accepting the next tap. Call
//! [`GameState::tick`](game_state::GameState::tick) every frame with the
//! elapsed time.

pub mod board;
pub mod config;
pub mod events;
pub mod game_state;
pub mod goals;
pub mod gravity;
pub mod group;
pub mod palette;
pub mod resolve;
pub mod rng;
pub mod snapshot;

pub use zoo_pop_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::RulesConfig;
pub use events::GameEvent;
pub use game_state::{GameState, Phase, RoundOutcome, TapOutcome};
pub use goals::{Goal, Goals};
pub use gravity::{settle, SettleReport};
pub use group::{find_group, Group};
pub use palette::Palette;
pub use resolve::{BlastArea, BlastResult, PopResult};
pub use rng::{PcgSource, RandomSource, ScriptedSource};
pub use snapshot::{GameSnapshot, GoalSnapshot};
