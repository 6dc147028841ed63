use crate::goals::Goal;
use crate::types::{Cell, Color};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GoalSnapshot {
    pub color: Color,
    pub have: u32,
    pub need: u32,
}

impl GoalSnapshot {
    pub fn is_met(&self) -> bool {
        self.have >= self.need
    }
}

impl From<Goal> for GoalSnapshot {
    fn from(value: Goal) -> Self {
        Self {
            color: value.color,
            have: value.have,
            need: value.need,
        }
    }
}

impl From<GoalSnapshot> for Goal {
    fn from(value: GoalSnapshot) -> Self {
        Self {
            color: value.color,
            need: value.need,
            have: value.have,
        }
    }
}

/// Read-only copy of everything a front-end or observer needs.
///
/// `snapshot_into` reuses the `cells` allocation, so a long-lived snapshot can
/// be refreshed every frame without allocating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub width: u8,
    /// Row-major cells, `width * width` long
    pub cells: Vec<Cell>,
    pub score: u32,
    pub moves_remaining: u32,
    pub level: u32,
    /// Increments on every level reset
    pub level_id: u32,
    /// Increments on every state change
    pub revision: u64,
    pub goals: [GoalSnapshot; 2],
    /// A settle is pending; taps and shuffles are ignored
    pub busy: bool,
    pub seed: Option<u64>,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.width = 0;
        self.cells.clear();
        self.score = 0;
        self.moves_remaining = 0;
        self.level = 0;
        self.level_id = 0;
        self.revision = 0;
        self.goals = [GoalSnapshot {
            color: Color::Red,
            have: 0,
            need: 0,
        }; 2];
        self.busy = false;
        self.seed = None;
    }

    /// Cell at (x, y); `None` when out of bounds
    pub fn cell(&self, x: i8, y: i8) -> Option<Cell> {
        if x < 0 || y < 0 || x as u8 >= self.width || y as u8 >= self.width {
            return None;
        }
        self.cells
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn playable(&self) -> bool {
        !self.busy && self.moves_remaining > 0
    }

    /// Stable 64-bit FNV-1a hash of the board contents.
    ///
    /// Each cell contributes two bytes: color (0 for empty, 1..=6 otherwise)
    /// and special (0 none, 1 rocket, 2 bomb).
    pub fn board_hash(&self) -> u64 {
        const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
        const PRIME: u64 = 0x100000001b3;

        let mut state = OFFSET_BASIS;
        let mut feed = |b: u8| {
            state ^= b as u64;
            state = state.wrapping_mul(PRIME);
        };
        feed(self.width);
        for cell in &self.cells {
            let (color, special) = match cell {
                Some(tile) => (tile.color.index() as u8 + 1, tile.special as u8),
                None => (0, 0),
            };
            feed(color);
            feed(special);
        }
        state
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            width: 0,
            cells: Vec::new(),
            score: 0,
            moves_remaining: 0,
            level: 0,
            level_id: 0,
            revision: 0,
            goals: [GoalSnapshot {
                color: Color::Red,
                have: 0,
                need: 0,
            }; 2],
            busy: false,
            seed: None,
        };
        s.clear();
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Special, Tile};

    #[test]
    fn test_cell_lookup_bounds() {
        let mut snap = GameSnapshot::default();
        snap.width = 2;
        snap.cells = vec![Some(Tile::plain(Color::Red)), None, None, None];
        assert_eq!(snap.cell(0, 0), Some(Some(Tile::plain(Color::Red))));
        assert_eq!(snap.cell(1, 1), Some(None));
        assert_eq!(snap.cell(2, 0), None);
        assert_eq!(snap.cell(-1, 0), None);
    }

    #[test]
    fn test_board_hash_sees_specials() {
        let mut snap = GameSnapshot::default();
        snap.width = 1;
        snap.cells = vec![Some(Tile::plain(Color::Blue))];
        let plain = snap.board_hash();
        snap.cells[0] = Some(Tile::new(Color::Blue, Special::Bomb));
        assert_ne!(plain, snap.board_hash());
    }
}
