//! Board cursor for keyboard play.

use crate::types::{GameAction, Pos};

/// Highlighted cell, always kept inside a `width x width` board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    x: i8,
    y: i8,
    width: u8,
}

impl Cursor {
    /// Start in the middle of the board
    pub fn new(width: u8) -> Self {
        let width = width.max(1);
        let mid = (width / 2) as i8;
        Self {
            x: mid,
            y: mid,
            width,
        }
    }

    pub fn position(&self) -> Pos {
        (self.x, self.y)
    }

    /// Step by (dx, dy), stopping at the edges
    pub fn move_by(&mut self, dx: i8, dy: i8) {
        let max = self.width as i8 - 1;
        self.x = self.x.saturating_add(dx).clamp(0, max);
        self.y = self.y.saturating_add(dy).clamp(0, max);
    }

    /// Jump to (x, y) if it is on the board
    pub fn set(&mut self, x: i8, y: i8) -> bool {
        let w = self.width as i8;
        if (0..w).contains(&x) && (0..w).contains(&y) {
            self.x = x;
            self.y = y;
            true
        } else {
            false
        }
    }

    /// Follow a board resize, clamping into range
    pub fn resize(&mut self, width: u8) {
        if width == self.width {
            return;
        }
        self.width = width.max(1);
        self.move_by(0, 0);
    }

    /// Tap action for the highlighted cell
    pub fn tap(&self) -> GameAction {
        GameAction::Tap {
            x: self.x,
            y: self.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_centered() {
        assert_eq!(Cursor::new(10).position(), (5, 5));
        assert_eq!(Cursor::new(3).position(), (1, 1));
    }

    #[test]
    fn test_move_stops_at_edges() {
        let mut cursor = Cursor::new(4);
        for _ in 0..10 {
            cursor.move_by(-1, 1);
        }
        assert_eq!(cursor.position(), (0, 3));
        assert_eq!(cursor.tap(), GameAction::Tap { x: 0, y: 3 });
    }

    #[test]
    fn test_set_and_resize() {
        let mut cursor = Cursor::new(10);
        assert!(cursor.set(9, 9));
        assert!(!cursor.set(10, 0));
        cursor.resize(6);
        assert_eq!(cursor.position(), (5, 5));
    }
}
