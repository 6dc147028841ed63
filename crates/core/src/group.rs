//! Group finder - 4-connected same-color regions
//!
//! A group is the maximal set of cells reachable from an origin through
//! orthogonal steps over tiles of the origin's color. Special tiles keep their
//! color, so they belong to the group like any other tile.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::types::{Color, Pos, MIN_GROUP_SIZE};

/// Orthogonal neighbor offsets
const NEIGHBORS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// A connected same-color region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    color: Color,
    cells: Vec<Pos>,
}

impl Group {
    pub fn color(&self) -> Color {
        self.color
    }

    /// Cells in discovery order (the origin comes first)
    pub fn cells(&self) -> &[Pos] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Large enough to pop
    pub fn is_poppable(&self) -> bool {
        self.cells.len() >= MIN_GROUP_SIZE
    }

    pub fn contains(&self, x: i8, y: i8) -> bool {
        self.cells.contains(&(x, y))
    }
}

/// Flood-fill the group containing `(x, y)`.
///
/// Returns `None` when the origin is out of bounds or cleared. Each coordinate
/// is visited at most once.
pub fn find_group(board: &Board, x: i8, y: i8) -> Option<Group> {
    let origin = board.tile(x, y)?;
    let width = board.width() as usize;

    let mut visited = vec![false; width * width];
    let mut stack: Vec<Pos> = Vec::with_capacity(16);
    let mut cells: Vec<Pos> = Vec::with_capacity(16);

    visited[y as usize * width + x as usize] = true;
    stack.push((x, y));

    while let Some((cx, cy)) = stack.pop() {
        cells.push((cx, cy));
        for (nx, ny) in neighbors(board, cx, cy) {
            let idx = ny as usize * width + nx as usize;
            if visited[idx] {
                continue;
            }
            if board.tile(nx, ny).map(|t| t.color) == Some(origin.color) {
                visited[idx] = true;
                stack.push((nx, ny));
            }
        }
    }

    Some(Group {
        color: origin.color,
        cells,
    })
}

/// In-bounds orthogonal neighbors of `(x, y)`
fn neighbors(board: &Board, x: i8, y: i8) -> ArrayVec<Pos, 4> {
    NEIGHBORS
        .iter()
        .map(|&(dx, dy)| (x + dx, y + dy))
        .filter(|&(nx, ny)| board.in_bounds(nx, ny))
        .collect()
}
