//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, remote protocol).
//!
//! # Board Geometry
//!
//! The board is square:
//!
//! - **Width**: 10 columns and 10 rows by default (indexed 0-9)
//! - **Origin**: `(0, 0)` is the top-left cell, `y` grows downward
//! - **Bottom row**: `y = width - 1`, where tiles come to rest after a fall
//!
//! # Rule Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MOVE_BUDGET` | 30 | Moves granted at the start of every level |
//! | `MIN_GROUP_SIZE` | 2 | Smallest group that can be popped |
//! | `ROCKET_MIN_GROUP` | 5 | Group size that leaves a rocket behind |
//! | `BOMB_MIN_GROUP` | 7 | Group size that leaves a bomb behind |
//! | `BLAST_CELL_SCORE` | 3 | Flat score per tile cleared by a rocket or bomb |
//! | `GOAL_BASE` | 12 | Goal target before the per-level increase |
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `SETTLE_MS` | 120 | Pause after a refill before the next action is accepted |
//! | `TOAST_MS` | 1200 | How long an advisory message stays visible |
//! | `PULSE_MS` | 100 | Highlight on a tile that was too small to pop |
//!
//! # Examples
//!
//! ```
//! use zoo_pop_types::{Color, GameAction, Special, BOARD_WIDTH};
//!
//! // Parse a color (case-insensitive)
//! let color = Color::from_str("Blue").unwrap();
//! assert_eq!(color, Color::Blue);
//! assert_eq!(color.animal(), "panda");
//!
//! // Specials by name
//! assert_eq!(Special::from_str("bomb"), Some(Special::Bomb));
//!
//! // Parse a parameterless action
//! assert_eq!(GameAction::from_str("shuffle"), Some(GameAction::Shuffle));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! ```

/// Default board width (and height) in cells
pub const BOARD_WIDTH: u8 = 10;

/// Largest supported board width
pub const MAX_BOARD_WIDTH: u8 = 32;

/// Moves granted at the start of every level
pub const MOVE_BUDGET: u32 = 30;

/// Smallest group that can be popped
pub const MIN_GROUP_SIZE: usize = 2;

/// Groups of at least this size leave a rocket behind
pub const ROCKET_MIN_GROUP: usize = 5;

/// Groups of at least this size leave a bomb behind (takes precedence over rockets)
pub const BOMB_MIN_GROUP: usize = 7;

/// Score awarded for each colored tile cleared by a blast
pub const BLAST_CELL_SCORE: u32 = 3;

/// Goal target at level 0; the real target adds `floor(1.5 * level)`
pub const GOAL_BASE: u32 = 12;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Settle delay after a refill, in milliseconds
pub const SETTLE_MS: u32 = 120;

/// Advisory message lifetime in milliseconds
pub const TOAST_MS: u32 = 1200;

/// Highlight duration for a rejected tap, in milliseconds
pub const PULSE_MS: u32 = 100;

/// Board coordinate `(x, y)`.
///
/// Signed so that neighbor arithmetic can step off the board and be rejected
/// by a bounds check instead of wrapping.
pub type Pos = (i8, i8);

/// The six tile colors
///
/// Each color is themed by an animal:
/// - **Red**: fox
/// - **Orange**: tiger
/// - **Yellow**: chick
/// - **Green**: frog
/// - **Blue**: panda
/// - **Purple**: owl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
}

impl Color {
    /// All colors in palette order
    pub const ALL: [Color; 6] = [
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::Blue,
        Color::Purple,
    ];

    /// Number of distinct colors
    pub const COUNT: usize = 6;

    /// Parse color from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use zoo_pop_types::Color;
    ///
    /// assert_eq!(Color::from_str("red"), Some(Color::Red));
    /// assert_eq!(Color::from_str("PURPLE"), Some(Color::Purple));
    /// assert_eq!(Color::from_str("teal"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(Color::Red),
            "orange" => Some(Color::Orange),
            "yellow" => Some(Color::Yellow),
            "green" => Some(Color::Green),
            "blue" => Some(Color::Blue),
            "purple" => Some(Color::Purple),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Purple => "purple",
        }
    }

    /// Animal shown on tiles of this color
    pub fn animal(&self) -> &'static str {
        match self {
            Color::Red => "fox",
            Color::Orange => "tiger",
            Color::Yellow => "chick",
            Color::Green => "frog",
            Color::Blue => "panda",
            Color::Purple => "owl",
        }
    }

    /// Single-letter code used by board fixtures and compact dumps
    ///
    /// # Examples
    ///
    /// ```
    /// use zoo_pop_types::Color;
    ///
    /// for color in Color::ALL {
    ///     assert_eq!(Color::from_letter(color.letter()), Some(color));
    /// }
    /// ```
    pub fn letter(&self) -> char {
        match self {
            Color::Red => 'R',
            Color::Orange => 'O',
            Color::Yellow => 'Y',
            Color::Green => 'G',
            Color::Blue => 'B',
            Color::Purple => 'P',
        }
    }

    /// Inverse of [`Color::letter`] (case-insensitive)
    pub fn from_letter(ch: char) -> Option<Self> {
        match ch.to_ascii_uppercase() {
            'R' => Some(Color::Red),
            'O' => Some(Color::Orange),
            'Y' => Some(Color::Yellow),
            'G' => Some(Color::Green),
            'B' => Some(Color::Blue),
            'P' => Some(Color::Purple),
            _ => None,
        }
    }

    /// Stable index into [`Color::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Special tile kinds
///
/// - **None**: regular tile, popped as part of a group
/// - **Rocket**: clears a full row or column when tapped
/// - **Bomb**: clears the 3x3 neighborhood when tapped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Special {
    #[default]
    None,
    Rocket,
    Bomb,
}

impl Special {
    /// Parse special kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(Special::None),
            "rocket" => Some(Special::Rocket),
            "bomb" => Some(Special::Bomb),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Special::None => "none",
            Special::Rocket => "rocket",
            Special::Bomb => "bomb",
        }
    }

    pub fn is_special(&self) -> bool {
        !matches!(self, Special::None)
    }

    /// Special left behind by a popped group of `size` tiles
    ///
    /// # Examples
    ///
    /// ```
    /// use zoo_pop_types::Special;
    ///
    /// assert_eq!(Special::for_group_size(4), Special::None);
    /// assert_eq!(Special::for_group_size(5), Special::Rocket);
    /// assert_eq!(Special::for_group_size(6), Special::Rocket);
    /// assert_eq!(Special::for_group_size(7), Special::Bomb);
    /// ```
    pub fn for_group_size(size: usize) -> Self {
        if size >= BOMB_MIN_GROUP {
            Special::Bomb
        } else if size >= ROCKET_MIN_GROUP {
            Special::Rocket
        } else {
            Special::None
        }
    }
}

/// Orientation picked when a rocket fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RocketAxis {
    /// The full row through the rocket
    Row,
    /// The full column through the rocket
    Column,
}

impl RocketAxis {
    pub fn as_str(&self) -> &'static str {
        match self {
            RocketAxis::Row => "row",
            RocketAxis::Column => "column",
        }
    }
}

/// A colored tile, optionally carrying a special
///
/// Specials are themed tiles: they keep a color (so they still join groups of
/// that color) but are drawn with their own glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub color: Color,
    pub special: Special,
}

impl Tile {
    /// Plain tile of the given color
    pub const fn plain(color: Color) -> Self {
        Self {
            color,
            special: Special::None,
        }
    }

    pub const fn new(color: Color, special: Special) -> Self {
        Self { color, special }
    }
}

/// A cell on the game board
///
/// - `None`: cleared, only observable between a clear and the following refill
/// - `Some(Tile)`: occupied
pub type Cell = Option<Tile>;

/// Player actions accepted by the engine
///
/// These actions are used by both the terminal front-end and remote clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Tap the tile at `(x, y)`: pops its group or fires its special
    Tap { x: i8, y: i8 },
    /// Redistribute the colors on the board
    Shuffle,
    /// Skip ahead to the next level
    NewLevel,
    /// Restart from level 1
    Reset,
}

impl GameAction {
    /// Parse a parameterless action from string (for the remote protocol)
    ///
    /// `tap` carries coordinates and is built directly instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use zoo_pop_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("newLevel"), Some(GameAction::NewLevel));
    /// assert_eq!(GameAction::from_str("RESET"), Some(GameAction::Reset));
    /// assert_eq!(GameAction::from_str("tap"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "shuffle" => Some(GameAction::Shuffle),
            "newlevel" => Some(GameAction::NewLevel),
            "reset" => Some(GameAction::Reset),
            _ => None,
        }
    }

    /// Convert to camelCase string for the remote protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Tap { .. } => "tap",
            GameAction::Shuffle => "shuffle",
            GameAction::NewLevel => "newLevel",
            GameAction::Reset => "reset",
        }
    }
}
