//! Gravity and refill
//!
//! After a pop or blast, every column is compacted toward the bottom row with
//! a write pointer, keeping the top-to-bottom order of the survivors. The
//! vacated slots above are then filled with fresh plain tiles. Runs once per
//! resolution; refilled tiles never trigger further clears.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::palette::Palette;
use crate::rng::RandomSource;
use crate::types::{Cell, Tile, MAX_BOARD_WIDTH};

/// What a settle pass did to the board
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettleReport {
    /// Fresh tiles created at the top of columns
    pub refilled: usize,
    /// Number of refilled slots per column, left to right
    pub per_column: ArrayVec<u8, { MAX_BOARD_WIDTH as usize }>,
}

impl SettleReport {
    pub fn is_noop(&self) -> bool {
        self.refilled == 0
    }
}

/// Compact every column and refill the gaps from `palette`.
///
/// Columns are processed left to right; within a column fresh colors are
/// drawn from the lowest vacated slot upward.
pub fn settle<R: RandomSource>(board: &mut Board, palette: &Palette, rng: &mut R) -> SettleReport {
    let width = board.width() as usize;
    let mut report = SettleReport::default();
    let cells = board.cells_mut();

    for x in 0..width {
        let vacated = compact_column(cells, width, x);
        for y in (0..vacated).rev() {
            cells[y * width + x] = Some(Tile::plain(palette.sample(rng)));
        }
        report.refilled += vacated;
        report.per_column.push(vacated as u8);
    }

    report
}

/// Compact every column without refilling.
///
/// Leaves `None` at the top of each column; used to inspect the intermediate
/// state between a clear and a refill.
pub fn compact(board: &mut Board) -> usize {
    let width = board.width() as usize;
    let cells = board.cells_mut();
    (0..width).map(|x| compact_column(cells, width, x)).sum()
}

/// Slide the occupied cells of column `x` down; returns how many slots at the
/// top are left empty.
fn compact_column(cells: &mut [Cell], width: usize, x: usize) -> usize {
    let mut write = width;
    for y in (0..width).rev() {
        let idx = y * width + x;
        if cells[idx].is_some() {
            write -= 1;
            if write != y {
                cells[write * width + x] = cells[idx].take();
            }
        }
    }
    write
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedSource;
    use crate::types::{Color, Special};

    #[test]
    fn test_full_board_is_untouched() {
        let mut board = Board::from_rows(&["RG", "BY"]).unwrap();
        let before = board.clone();
        let mut rng = ScriptedSource::default();
        let report = settle(&mut board, &Palette::full(), &mut rng);
        assert!(report.is_noop());
        assert_eq!(board, before);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_survivors_fall_in_order() {
        // column 0 top->bottom: R . G .
        let mut board = Board::from_rows(&["RBBB", ".BBB", "GBBB", ".BBB"]).unwrap();
        board.set_tile(0, 0, Color::Red, Special::Rocket);
        let vacated = compact(&mut board);
        assert_eq!(vacated, 2);
        assert_eq!(board.get(0, 0), Some(None));
        assert_eq!(board.get(0, 1), Some(None));
        assert_eq!(board.tile(0, 2), Some(Tile::new(Color::Red, Special::Rocket)));
        assert_eq!(board.tile(0, 3), Some(Tile::plain(Color::Green)));
    }

    #[test]
    fn test_refill_draws_bottom_up_per_column() {
        let mut board = Board::from_rows(&["..", ".R"]).unwrap();
        // column 0: y=1 then y=0; column 1: y=0
        let mut rng = ScriptedSource::new([1, 2, 3]);
        let report = settle(&mut board, &Palette::full(), &mut rng);

        assert_eq!(report.refilled, 3);
        assert_eq!(report.per_column.as_slice(), &[2, 1]);
        assert_eq!(board.tile(0, 1).map(|t| t.color), Some(Color::Orange));
        assert_eq!(board.tile(0, 0).map(|t| t.color), Some(Color::Yellow));
        assert_eq!(board.tile(1, 0).map(|t| t.color), Some(Color::Green));
        assert_eq!(board.tile(1, 1).map(|t| t.color), Some(Color::Red));
        assert!(board.is_full());
        assert!(board.specials().is_empty());
    }
}
