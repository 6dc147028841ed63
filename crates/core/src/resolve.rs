//! Resolution engine - popping groups and firing specials
//!
//! These functions mutate the board and goals for a single resolution step.
//! They leave cleared cells behind; the caller runs [`gravity::settle`]
//! afterwards and, once the settle delay has passed, places any special with
//! [`attach_special`].
//!
//! [`gravity::settle`]: crate::gravity::settle

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::goals::Goals;
use crate::group::Group;
use crate::rng::RandomSource;
use crate::types::{Color, Pos, RocketAxis, Special, BLAST_CELL_SCORE};

/// Outcome of popping a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopResult {
    pub color: Color,
    pub size: usize,
    pub score: u32,
    /// Special earned by the group size
    pub special: Special,
    /// Group cell picked to carry the special (only its column is used)
    pub anchor: Option<Pos>,
}

/// Score for popping `size` tiles: `size²`
pub fn group_score(size: usize) -> u32 {
    let n = u32::try_from(size).unwrap_or(u32::MAX);
    n.saturating_mul(n)
}

/// Clear a group, credit the goals and plan a special.
///
/// When the group earns a special, one of its cells is drawn uniformly as the
/// anchor before anything is cleared.
pub fn pop_group<R: RandomSource>(
    board: &mut Board,
    group: &Group,
    goals: &mut Goals,
    rng: &mut R,
) -> PopResult {
    let size = group.len();
    let special = Special::for_group_size(size);
    let anchor = if special.is_special() {
        rng.pick(group.cells())
    } else {
        None
    };

    for &(x, y) in group.cells() {
        board.clear(x, y);
    }
    goals.accrue(group.color(), size as u32);

    PopResult {
        color: group.color(),
        size,
        score: group_score(size),
        special,
        anchor,
    }
}

/// Cells hit by a special fired at `(x, y)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlastArea {
    pub cells: Vec<Pos>,
    /// Orientation the rocket picked; `None` for bombs
    pub axis: Option<RocketAxis>,
}

/// Work out the area of a special at `(x, y)`.
///
/// Rockets flip a fair coin between their row and their column. A plain
/// special kind yields an empty area.
pub fn blast_area<R: RandomSource>(
    board: &Board,
    x: i8,
    y: i8,
    special: Special,
    rng: &mut R,
) -> BlastArea {
    match special {
        Special::Rocket => {
            let axis = if rng.coin() {
                RocketAxis::Row
            } else {
                RocketAxis::Column
            };
            BlastArea {
                cells: rocket_cells(board, x, y, axis),
                axis: Some(axis),
            }
        }
        Special::Bomb => BlastArea {
            cells: bomb_cells(board, x, y).to_vec(),
            axis: None,
        },
        Special::None => BlastArea {
            cells: Vec::new(),
            axis: None,
        },
    }
}

/// Every cell of row `y` or column `x`
pub fn rocket_cells(board: &Board, x: i8, y: i8, axis: RocketAxis) -> Vec<Pos> {
    let w = board.width() as i8;
    match axis {
        RocketAxis::Row => (0..w).map(|cx| (cx, y)).collect(),
        RocketAxis::Column => (0..w).map(|cy| (x, cy)).collect(),
    }
}

/// The 3x3 neighborhood of `(x, y)`, clipped to the board
pub fn bomb_cells(board: &Board, x: i8, y: i8) -> ArrayVec<Pos, 9> {
    let mut cells = ArrayVec::new();
    for dy in -1..=1 {
        for dx in -1..=1 {
            let (nx, ny) = (x + dx, y + dy);
            if board.in_bounds(nx, ny) {
                cells.push((nx, ny));
            }
        }
    }
    cells
}

/// Outcome of a blast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlastResult {
    /// Colored tiles cleared
    pub cleared: usize,
    pub score: u32,
    /// Tiles collected per color, indexed by [`Color::index`]
    pub collected: [u32; Color::COUNT],
}

/// Clear every cell in `cells`.
///
/// Each colored tile scores a flat [`BLAST_CELL_SCORE`] and counts toward the
/// goals. Specials caught in the area are removed without firing.
pub fn blast(board: &mut Board, cells: &[Pos], goals: &mut Goals) -> BlastResult {
    let mut result = BlastResult::default();
    for &(x, y) in cells {
        if let Some(tile) = board.clear(x, y) {
            result.cleared += 1;
            result.score = result.score.saturating_add(BLAST_CELL_SCORE);
            result.collected[tile.color.index()] += 1;
        }
    }
    goals.accrue_counts(&result.collected);
    result
}

/// Flag the lowest colored tile in `column` with `special`.
///
/// Overwrites whatever special that tile carried. Returns the flagged
/// position, or `None` if the column has no colored tile.
pub fn attach_special(board: &mut Board, column: i8, special: Special) -> Option<Pos> {
    let w = board.width() as i8;
    for y in (0..w).rev() {
        if let Some(tile) = board.tile(column, y) {
            board.set_tile(column, y, tile.color, special);
            return Some((column, y));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals::Goal;
    use crate::group::find_group;
    use crate::rng::ScriptedSource;

    fn goals(a: Color, b: Color) -> Goals {
        Goals::new(Goal::new(a, 20), Goal::new(b, 20))
    }

    #[test]
    fn test_group_score_is_square() {
        assert_eq!(group_score(2), 4);
        assert_eq!(group_score(6), 36);
        assert_eq!(group_score(8), 64);
    }

    #[test]
    fn test_pop_small_group_plans_nothing() {
        let mut board = Board::from_rows(&["RRB", "GBB", "GGY"]).unwrap();
        let group = find_group(&board, 0, 0).unwrap();
        let mut goals = goals(Color::Red, Color::Blue);
        let mut rng = ScriptedSource::default();

        let result = pop_group(&mut board, &group, &mut goals, &mut rng);
        assert_eq!(result.size, 2);
        assert_eq!(result.score, 4);
        assert_eq!(result.special, Special::None);
        assert_eq!(result.anchor, None);
        assert_eq!(rng.draws(), 0);
        assert_eq!(board.empty_count(), 2);
        assert_eq!(goals.a.have, 2);
        assert_eq!(goals.b.have, 0);
    }

    #[test]
    fn test_pop_five_plans_rocket_with_anchor() {
        let mut board = Board::from_rows(&["RRR", "RRB", "GBB"]).unwrap();
        let group = find_group(&board, 0, 0).unwrap();
        let mut goals = goals(Color::Green, Color::Blue);
        let mut rng = ScriptedSource::new([3]);

        let result = pop_group(&mut board, &group, &mut goals, &mut rng);
        assert_eq!(result.special, Special::Rocket);
        assert_eq!(result.anchor, Some(group.cells()[3]));
        assert_eq!(result.score, 25);
    }

    #[test]
    fn test_bomb_in_corner_is_clipped() {
        let board = Board::empty(10);
        let mut cells = bomb_cells(&board, 0, 0).to_vec();
        cells.sort_unstable();
        assert_eq!(cells, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert_eq!(bomb_cells(&board, 5, 5).len(), 9);
    }

    #[test]
    fn test_rocket_axis_follows_coin() {
        let board = Board::empty(4);
        let mut rng = ScriptedSource::new([1]);
        let area = blast_area(&board, 1, 2, Special::Rocket, &mut rng);
        assert_eq!(area.axis, Some(RocketAxis::Row));
        assert_eq!(area.cells, vec![(0, 2), (1, 2), (2, 2), (3, 2)]);

        let mut rng = ScriptedSource::new([0]);
        let area = blast_area(&board, 1, 2, Special::Rocket, &mut rng);
        assert_eq!(area.axis, Some(RocketAxis::Column));
        assert_eq!(area.cells, vec![(1, 0), (1, 1), (1, 2), (1, 3)]);
    }

    #[test]
    fn test_blast_scores_flat_and_removes_specials() {
        let mut board = Board::from_rows(&["RGB", "RRB", "YYB"]).unwrap();
        board.set_tile(1, 1, Color::Red, Special::Bomb);
        board.set_tile(2, 2, Color::Blue, Special::Rocket);
        let mut goals = goals(Color::Red, Color::Blue);

        let area = bomb_cells(&board, 1, 1);
        let result = blast(&mut board, &area, &mut goals);
        assert_eq!(result.cleared, 9);
        assert_eq!(result.score, 27);
        assert_eq!(result.collected[Color::Red.index()], 3);
        assert_eq!(goals.a.have, 3);
        assert_eq!(goals.b.have, 3);
        assert_eq!(board.empty_count(), 9);
        assert!(board.specials().is_empty());
    }

    #[test]
    fn test_blast_skips_empty_cells() {
        let mut board = Board::from_rows(&["R.", ".G"]).unwrap();
        let mut goals = goals(Color::Red, Color::Green);
        let result = blast(&mut board, &[(0, 0), (1, 0), (0, 1), (1, 1)], &mut goals);
        assert_eq!(result.cleared, 2);
        assert_eq!(result.score, 6);
    }

    #[test]
    fn test_attach_special_flags_bottom_tile() {
        let mut board = Board::from_rows(&["RG", "BY"]).unwrap();
        board.set_tile(0, 1, Color::Blue, Special::Rocket);
        assert_eq!(attach_special(&mut board, 0, Special::Bomb), Some((0, 1)));
        assert_eq!(board.tile(0, 1).map(|t| t.special), Some(Special::Bomb));
        assert_eq!(board.tile(0, 0).map(|t| t.special), Some(Special::None));
    }

    #[test]
    fn test_attach_special_skips_empty_bottom() {
        let mut board = Board::from_rows(&["RG", ".Y"]).unwrap();
        assert_eq!(attach_special(&mut board, 0, Special::Rocket), Some((0, 0)));
        let mut empty = Board::empty(2);
        assert_eq!(attach_special(&mut empty, 1, Special::Rocket), None);
    }
}
