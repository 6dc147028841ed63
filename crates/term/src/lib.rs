//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. It avoids widget
//! toolkits and instead renders into a simple framebuffer that is diffed and
//! flushed to the terminal.
//!
//! - [`GameView`] draws a `GameSnapshot` plus cursor, toast and help overlay
//!   and maps mouse clicks back to board coordinates
//! - [`TerminalRenderer`] owns the terminal session and writes changed cells
//! - [`Toasts`] and [`Pulse`] time the short-lived feedback

pub mod fb;
pub mod game_view;
pub mod renderer;
pub mod toast;

pub use zoo_pop_core as core;
pub use zoo_pop_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{color_rgb, tile_glyph, GameView, Overlay, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use toast::{Pulse, Toasts};
