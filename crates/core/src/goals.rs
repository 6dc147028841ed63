//! Per-level color collection goals

use crate::palette::Palette;
use crate::rng::RandomSource;
use crate::types::{Color, GOAL_BASE};

/// Collect `need` tiles of `color`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Goal {
    pub color: Color,
    pub need: u32,
    pub have: u32,
}

impl Goal {
    pub fn new(color: Color, need: u32) -> Self {
        Self {
            color,
            need,
            have: 0,
        }
    }

    pub fn is_met(&self) -> bool {
        self.have >= self.need
    }

    /// Credit `count` tiles if they match this goal's color
    pub fn accrue(&mut self, color: Color, count: u32) {
        if color == self.color {
            self.have = self.have.saturating_add(count);
        }
    }

    /// Progress for display, clamped to `need`
    pub fn shown_have(&self) -> u32 {
        self.have.min(self.need)
    }

    /// Rounded completion percentage, clamped to 100
    pub fn percent(&self) -> u8 {
        if self.need == 0 {
            return 100;
        }
        let pct = (self.have as u64 * 200 + self.need as u64) / (self.need as u64 * 2);
        pct.min(100) as u8
    }
}

/// The two goals of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Goals {
    pub a: Goal,
    pub b: Goal,
}

impl Goals {
    pub fn new(a: Goal, b: Goal) -> Self {
        Self { a, b }
    }

    /// Fresh goals for `level`: two distinct palette colors, same target.
    pub fn generate<R: RandomSource>(level: u32, palette: &Palette, rng: &mut R) -> Self {
        let (first, second) = palette.sample_pair(rng);
        let need = target_for_level(level);
        Self::new(Goal::new(first, need), Goal::new(second, need))
    }

    /// Credit `count` tiles of `color` to every goal of that color
    pub fn accrue(&mut self, color: Color, count: u32) {
        self.a.accrue(color, count);
        self.b.accrue(color, count);
    }

    /// Credit a per-color tally indexed by [`Color::index`]
    pub fn accrue_counts(&mut self, counts: &[u32; Color::COUNT]) {
        for color in Color::ALL {
            let n = counts[color.index()];
            if n > 0 {
                self.accrue(color, n);
            }
        }
    }

    pub fn all_met(&self) -> bool {
        self.a.is_met() && self.b.is_met()
    }

    pub fn as_array(&self) -> [Goal; 2] {
        [self.a, self.b]
    }
}

/// `GOAL_BASE + floor(1.5 * level)`
pub fn target_for_level(level: u32) -> u32 {
    GOAL_BASE.saturating_add(level.saturating_mul(3) / 2)
}
