//! Terminal input module (engine-facing).
//!
//! This crate is independent of any UI framework beyond `crossterm` events. It
//! maps key presses and mouse clicks into [`InputCommand`]s and keeps the
//! keyboard [`Cursor`] that turns "tap here" into a [`types::GameAction`].

pub mod cursor;
pub mod map;

pub use zoo_pop_types as types;

pub use cursor::Cursor;
pub use map::{handle_key_event, handle_mouse_event, should_quit, InputCommand};
