//! Short-lived visual feedback: toast messages and tile pulses.

use std::collections::VecDeque;

use crate::types::{Pos, PULSE_MS, TOAST_MS};

/// Messages waiting to be shown, oldest first
const MAX_QUEUED: usize = 3;

/// Queue of advisory messages, each shown for [`TOAST_MS`].
///
/// A burst such as "Level cleared!" followed by "Level 2" is shown in order
/// instead of the second hiding the first.
#[derive(Debug, Clone, Default)]
pub struct Toasts {
    queue: VecDeque<String>,
    remaining_ms: u32,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        if self.queue.len() >= MAX_QUEUED {
            self.queue.pop_front();
            self.remaining_ms = TOAST_MS;
        }
        if self.queue.is_empty() {
            self.remaining_ms = TOAST_MS;
        }
        self.queue.push_back(message.into());
    }

    /// Message currently on screen
    pub fn current(&self) -> Option<&str> {
        self.queue.front().map(String::as_str)
    }

    /// Advance time; returns true when the visible message changed.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.queue.is_empty() {
            return false;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
        if self.remaining_ms > 0 {
            return false;
        }
        self.queue.pop_front();
        if !self.queue.is_empty() {
            self.remaining_ms = TOAST_MS;
        }
        true
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.remaining_ms = 0;
    }
}

/// Brief highlight on a tile, used when a tap was too small to pop.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pulse {
    target: Option<(Pos, u32)>,
}

impl Pulse {
    pub fn start(&mut self, pos: Pos) {
        self.target = Some((pos, PULSE_MS));
    }

    pub fn position(&self) -> Option<Pos> {
        self.target.map(|(pos, _)| pos)
    }

    /// Returns true when the pulse ended during this tick.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        let Some((pos, remaining)) = self.target else {
            return false;
        };
        let remaining = remaining.saturating_sub(elapsed_ms);
        if remaining == 0 {
            self.target = None;
            true
        } else {
            self.target = Some((pos, remaining));
            false
        }
    }
}
