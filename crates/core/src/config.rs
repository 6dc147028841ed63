//! Rules configuration
//!
//! Defaults come from the constants in `zoo_pop_types`; each value can be
//! overridden through a `ZOO_POP_*` environment variable. Values that fail to
//! parse or fall outside the supported range are ignored.

use crate::palette::Palette;
use crate::types::{BOARD_WIDTH, MAX_BOARD_WIDTH, MOVE_BUDGET, SETTLE_MS};

/// Tunable rules for a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulesConfig {
    /// Board width (and height)
    pub width: u8,
    /// Colors tiles and goals are drawn from
    pub palette: Palette,
    /// Moves granted at the start of each level
    pub move_budget: u32,
    /// Delay after a refill before the next action is accepted
    pub settle_ms: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            palette: Palette::full(),
            move_budget: MOVE_BUDGET,
            settle_ms: SETTLE_MS,
        }
    }
}

impl RulesConfig {
    /// Default rules with no settle delay: every action resolves synchronously.
    pub fn instant() -> Self {
        Self {
            settle_ms: 0,
            ..Self::default()
        }
    }

    /// Read overrides from the process environment
    ///
    /// - `ZOO_POP_WIDTH`: board width, `2..=32`
    /// - `ZOO_POP_MOVES`: move budget, at least 1
    /// - `ZOO_POP_SETTLE_MS`: settle delay in milliseconds
    /// - `ZOO_POP_PALETTE`: color letters, e.g. `RGBY`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(width) = lookup("ZOO_POP_WIDTH").and_then(|s| s.trim().parse::<u8>().ok()) {
            if (2..=MAX_BOARD_WIDTH).contains(&width) {
                config.width = width;
            }
        }

        if let Some(moves) = lookup("ZOO_POP_MOVES").and_then(|s| s.trim().parse::<u32>().ok()) {
            if moves > 0 {
                config.move_budget = moves;
            }
        }

        if let Some(ms) = lookup("ZOO_POP_SETTLE_MS").and_then(|s| s.trim().parse().ok()) {
            config.settle_ms = ms;
        }

        if let Some(palette) = lookup("ZOO_POP_PALETTE").and_then(|s| Palette::from_letters(&s)) {
            config.palette = palette;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_defaults() {
        let config = RulesConfig::default();
        assert_eq!(config.width, 10);
        assert_eq!(config.move_budget, 30);
        assert_eq!(config.settle_ms, 120);
        assert_eq!(config.palette.len(), 6);
        assert_eq!(RulesConfig::instant().settle_ms, 0);
    }

    #[test]
    fn test_overrides_applied() {
        let config = RulesConfig::from_lookup(lookup(&[
            ("ZOO_POP_WIDTH", "8"),
            ("ZOO_POP_MOVES", " 12 "),
            ("ZOO_POP_SETTLE_MS", "0"),
            ("ZOO_POP_PALETTE", "RGB"),
        ]));
        assert_eq!(config.width, 8);
        assert_eq!(config.move_budget, 12);
        assert_eq!(config.settle_ms, 0);
        assert_eq!(config.palette.colors(), &[Color::Red, Color::Green, Color::Blue]);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = RulesConfig::from_lookup(lookup(&[
            ("ZOO_POP_WIDTH", "1"),
            ("ZOO_POP_MOVES", "0"),
            ("ZOO_POP_SETTLE_MS", "soon"),
            ("ZOO_POP_PALETTE", "RR"),
        ]));
        assert_eq!(config, RulesConfig::default());

        let config = RulesConfig::from_lookup(lookup(&[("ZOO_POP_WIDTH", "99")]));
        assert_eq!(config.width, 10);
    }
}
