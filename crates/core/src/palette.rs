//! Palette module - the set of colors a level draws tiles and goals from

use arrayvec::ArrayVec;

use crate::rng::RandomSource;
use crate::types::Color;

/// An ordered set of at least two distinct colors.
///
/// Two is the minimum because every level binds its goals to two different
/// colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: ArrayVec<Color, { Color::COUNT }>,
}

impl Palette {
    /// All six colors
    pub fn full() -> Self {
        Self {
            colors: Color::ALL.into_iter().collect(),
        }
    }

    /// Build a palette from a list of colors, dropping duplicates.
    ///
    /// Returns `None` when fewer than two distinct colors remain.
    pub fn new(colors: &[Color]) -> Option<Self> {
        let mut out: ArrayVec<Color, { Color::COUNT }> = ArrayVec::new();
        for &color in colors {
            if !out.contains(&color) {
                out.push(color);
            }
        }
        if out.len() < 2 {
            return None;
        }
        Some(Self { colors: out })
    }

    /// Parse letter codes such as `"RGB"` (see [`Color::letter`]).
    pub fn from_letters(s: &str) -> Option<Self> {
        let mut colors = Vec::with_capacity(s.len());
        for ch in s.chars().filter(|c| !c.is_whitespace()) {
            colors.push(Color::from_letter(ch)?);
        }
        Self::new(&colors)
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn contains(&self, color: Color) -> bool {
        self.colors.contains(&color)
    }

    /// Uniformly sample one color.
    pub fn sample<R: RandomSource>(&self, rng: &mut R) -> Color {
        self.colors[rng.below(self.colors.len())]
    }

    /// Uniformly sample two distinct colors.
    pub fn sample_pair<R: RandomSource>(&self, rng: &mut R) -> (Color, Color) {
        let n = self.colors.len();
        let first = rng.below(n);
        // Draw from the remaining n - 1 slots and step over `first`.
        let mut second = rng.below(n - 1);
        if second >= first {
            second += 1;
        }
        (self.colors[first], self.colors[second])
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::full()
    }
}
