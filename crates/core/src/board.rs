//! Board module - manages the game grid
//!
//! The board is a square `width x width` grid where each cell holds a colored
//! tile or, briefly between a clear and the following refill, nothing.
//! Uses a flat vector in row-major order for cache locality.
//! Coordinates: (x, y) where x grows left to right and y grows top to bottom,
//! so `y = width - 1` is the bottom row that tiles fall toward.

use crate::palette::Palette;
use crate::rng::RandomSource;
use crate::types::{Cell, Color, Pos, Special, Tile, BOARD_WIDTH, MAX_BOARD_WIDTH};

/// The game board - `width` columns x `width` rows using flat storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a board with every cell cleared.
    ///
    /// `width` is clamped to `1..=MAX_BOARD_WIDTH`.
    pub fn empty(width: u8) -> Self {
        let width = width.clamp(1, MAX_BOARD_WIDTH);
        let len = (width as usize) * (width as usize);
        Self {
            width,
            cells: vec![None; len],
        }
    }

    /// Create a fully populated board.
    ///
    /// Every cell gets an independent, uniformly sampled color from `palette`
    /// and no special.
    pub fn random<R: RandomSource>(width: u8, palette: &Palette, rng: &mut R) -> Self {
        let mut board = Self::empty(width);
        for cell in board.cells.iter_mut() {
            *cell = Some(Tile::plain(palette.sample(rng)));
        }
        board
    }

    /// Build a board from rows of color letters (`R O Y G B P`), `.` for a
    /// cleared cell.
    ///
    /// Returns `None` unless the rows form a square of a supported width and
    /// every character is recognised.
    ///
    /// ```
    /// use zoo_pop_core::Board;
    /// use zoo_pop_types::Color;
    ///
    /// let board = Board::from_rows(&["RB", "G."]).unwrap();
    /// assert_eq!(board.tile(1, 0).map(|t| t.color), Some(Color::Blue));
    /// assert_eq!(board.get(1, 1), Some(None));
    /// ```
    pub fn from_rows(rows: &[&str]) -> Option<Self> {
        let width = rows.len();
        if width == 0 || width > MAX_BOARD_WIDTH as usize {
            return None;
        }
        let mut board = Self::empty(width as u8);
        for (y, row) in rows.iter().enumerate() {
            let chars: Vec<char> = row.chars().collect();
            if chars.len() != width {
                return None;
            }
            for (x, ch) in chars.into_iter().enumerate() {
                let cell = match ch {
                    '.' => None,
                    _ => Some(Tile::plain(Color::from_letter(ch)?)),
                };
                board.cells[y * width + x] = cell;
            }
        }
        Some(board)
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i8, y: i8) -> Option<usize> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Width (and height) of the board
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Number of cells on the board
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn in_bounds(&self, x: i8, y: i8) -> bool {
        x >= 0 && y >= 0 && (x as u8) < self.width && (y as u8) < self.width
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Tile at (x, y), or None if out of bounds or cleared
    pub fn tile(&self, x: i8, y: i8) -> Option<Tile> {
        self.get(x, y).flatten()
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Place a tile with the given color and special at (x, y)
    pub fn set_tile(&mut self, x: i8, y: i8, color: Color, special: Special) -> bool {
        self.set(x, y, Some(Tile::new(color, special)))
    }

    /// Clear the cell at (x, y), returning what it held
    pub fn clear(&mut self, x: i8, y: i8) -> Option<Tile> {
        let idx = self.index(x, y)?;
        self.cells[idx].take()
    }

    /// True when no cell is cleared
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Number of tiles per color, indexed by [`Color::index`]
    pub fn color_histogram(&self) -> [usize; Color::COUNT] {
        let mut counts = [0usize; Color::COUNT];
        for tile in self.cells.iter().flatten() {
            counts[tile.color.index()] += 1;
        }
        counts
    }

    /// Positions of all special tiles, in row-major order
    pub fn specials(&self) -> Vec<(Pos, Special)> {
        self.positions()
            .filter_map(|(x, y)| {
                let tile = self.tile(x, y)?;
                tile.special.is_special().then_some(((x, y), tile.special))
            })
            .collect()
    }

    /// All coordinates in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let w = self.width as i8;
        (0..w).flat_map(move |y| (0..w).map(move |x| (x, y)))
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty(BOARD_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::PcgSource;

    #[test]
    fn test_board_index_calculation() {
        let board = Board::empty(10);
        assert_eq!(board.index(0, 0), Some(0));
        assert_eq!(board.index(9, 0), Some(9));
        assert_eq!(board.index(0, 1), Some(10));
        assert_eq!(board.index(9, 9), Some(99));
        assert_eq!(board.index(-1, 0), None);
        assert_eq!(board.index(10, 0), None);
        assert_eq!(board.index(0, 10), None);
    }

    #[test]
    fn test_width_is_clamped() {
        assert_eq!(Board::empty(0).width(), 1);
        assert_eq!(Board::empty(200).width(), MAX_BOARD_WIDTH);
    }

    #[test]
    fn test_random_board_is_full_and_plain() {
        let mut rng = PcgSource::new(5);
        let board = Board::random(10, &Palette::full(), &mut rng);
        assert_eq!(board.len(), 100);
        assert!(board.is_full());
        assert!(board.specials().is_empty());
    }

    #[test]
    fn test_random_board_uses_palette_only() {
        let palette = Palette::new(&[Color::Red, Color::Blue]).unwrap();
        let mut rng = PcgSource::new(9);
        let board = Board::random(8, &palette, &mut rng);
        let hist = board.color_histogram();
        assert_eq!(hist[Color::Red.index()] + hist[Color::Blue.index()], 64);
    }

    #[test]
    fn test_clear_empties_cell() {
        let mut board = Board::from_rows(&["RB", "GY"]).unwrap();
        assert_eq!(board.clear(0, 1), Some(Tile::plain(Color::Green)));
        assert_eq!(board.get(0, 1), Some(None));
        assert_eq!(board.clear(0, 1), None);
        assert_eq!(board.clear(5, 5), None);
        assert_eq!(board.empty_count(), 1);
    }

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        assert!(Board::from_rows(&["RB", "G"]).is_none());
        assert!(Board::from_rows(&["RB"]).is_none());
        assert!(Board::from_rows(&["RX", "GG"]).is_none());
        assert!(Board::from_rows(&[]).is_none());
    }

    #[test]
    fn test_positions_row_major() {
        let board = Board::empty(2);
        let all: Vec<Pos> = board.positions().collect();
        assert_eq!(all, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }
}
