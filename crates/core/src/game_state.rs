//! Game state module - manages the complete game state
//!
//! This module ties together the board, group finder, resolution engine,
//! gravity, goals and the random source. It owns the round lifecycle: every
//! pop or blast is followed by a refill and a short settle phase, after which
//! any earned special is placed and the end-of-round check runs.

use crate::board::Board;
use crate::config::RulesConfig;
use crate::events::GameEvent;
use crate::goals::{Goal, Goals};
use crate::gravity::settle;
use crate::group::find_group;
use crate::resolve::{attach_special, blast, blast_area, pop_group};
use crate::rng::{PcgSource, RandomSource};
use crate::snapshot::{GameSnapshot, GoalSnapshot};
use crate::types::{Color, GameAction, Special, Tile};

/// Events kept for observers before the oldest are dropped
const MAX_PENDING_EVENTS: usize = 256;

/// Result of a tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// A settle is still pending; nothing happened
    Busy,
    /// The coordinate is off the board; nothing happened
    OutOfBounds,
    /// The group was too small to pop; no move was spent
    TooSmall { size: usize },
    /// A group was popped, possibly earning a special
    Popped { size: usize, special: Special },
    /// A rocket or bomb fired
    Triggered { special: Special, cleared: usize },
}

impl TapOutcome {
    /// The tap spent a move and changed the board
    pub fn resolved(&self) -> bool {
        matches!(self, TapOutcome::Popped { .. } | TapOutcome::Triggered { .. })
    }
}

/// Whether the engine accepts taps and shuffles right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Ready,
    /// Waiting out the settle delay after a refill
    Settling,
}

/// Result of the end-of-round check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Continue,
    /// Both goals met; the next level has started
    LevelCleared,
    /// Moves ran out; the same level has restarted
    OutOfMoves,
}

/// Work left over from a resolution until the settle delay passes
#[derive(Debug, Clone, Copy)]
struct PendingSettle {
    remaining_ms: u32,
    /// Special earned by the pop and the column it goes to
    special: Option<(Special, i8)>,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState<R: RandomSource = PcgSource> {
    config: RulesConfig,
    rng: R,
    board: Board,
    goals: Goals,
    score: u32,
    moves: u32,
    level: u32,
    /// Monotonic count of level resets
    level_id: u32,
    /// Monotonic count of observable state changes
    revision: u64,
    pending: Option<PendingSettle>,
    /// Result of the most recent end-of-round check
    last_outcome: RoundOutcome,
    events: Vec<GameEvent>,
}

impl GameState<PcgSource> {
    /// Create a new game at level 1 with the default rules
    pub fn new(seed: u64) -> Self {
        Self::with_config(RulesConfig::default(), seed)
    }

    pub fn with_config(config: RulesConfig, seed: u64) -> Self {
        Self::with_rng(config, PcgSource::new(seed))
    }
}

impl<R: RandomSource> GameState<R> {
    /// Create a new game at level 1 drawing from `rng`
    pub fn with_rng(config: RulesConfig, rng: R) -> Self {
        let placeholder = Goal::new(Color::Red, 0);
        let mut state = Self {
            board: Board::empty(config.width),
            config,
            rng,
            goals: Goals::new(placeholder, placeholder),
            score: 0,
            moves: 0,
            level: 1,
            level_id: 0,
            revision: 0,
            pending: None,
            last_outcome: RoundOutcome::Continue,
            events: Vec::new(),
        };
        state.start_level();
        state
    }

    /// Tap the tile at (x, y).
    ///
    /// A plain tile pops its group when the group has at least two tiles; a
    /// special fires. Either way one move is spent and the board refills.
    pub fn tap(&mut self, x: i8, y: i8) -> TapOutcome {
        if self.pending.is_some() {
            log::debug!("tap ({x}, {y}) ignored: settling");
            return TapOutcome::Busy;
        }
        let Some(tile) = self.board.tile(x, y) else {
            log::debug!("tap ({x}, {y}) ignored: out of bounds");
            return TapOutcome::OutOfBounds;
        };

        if tile.special.is_special() {
            self.trigger_special(x, y, tile.special)
        } else {
            self.pop_at(x, y)
        }
    }

    fn pop_at(&mut self, x: i8, y: i8) -> TapOutcome {
        let Some(group) = find_group(&self.board, x, y) else {
            return TapOutcome::OutOfBounds;
        };
        if !group.is_poppable() {
            self.push_event(GameEvent::TooSmall { x, y });
            return TapOutcome::TooSmall { size: group.len() };
        }

        self.moves = self.moves.saturating_sub(1);
        let result = pop_group(&mut self.board, &group, &mut self.goals, &mut self.rng);
        self.score = self.score.saturating_add(result.score);
        self.push_event(GameEvent::Popped {
            color: result.color,
            size: result.size,
            score: result.score,
        });

        let special = result.anchor.map(|(column, _)| (result.special, column));
        self.begin_settle(special);

        TapOutcome::Popped {
            size: result.size,
            special: result.special,
        }
    }

    fn trigger_special(&mut self, x: i8, y: i8, special: Special) -> TapOutcome {
        self.moves = self.moves.saturating_sub(1);
        let area = blast_area(&self.board, x, y, special, &mut self.rng);
        let result = blast(&mut self.board, &area.cells, &mut self.goals);
        self.score = self.score.saturating_add(result.score);
        self.push_event(GameEvent::Blasted {
            special,
            axis: area.axis,
            cleared: result.cleared,
            score: result.score,
        });

        self.begin_settle(None);

        TapOutcome::Triggered {
            special,
            cleared: result.cleared,
        }
    }

    /// Refill the board and start the settle delay
    fn begin_settle(&mut self, special: Option<(Special, i8)>) {
        settle(&mut self.board, &self.config.palette, &mut self.rng);
        self.last_outcome = RoundOutcome::Continue;
        self.revision += 1;
        self.pending = Some(PendingSettle {
            remaining_ms: self.config.settle_ms,
            special,
        });
        if self.config.settle_ms == 0 {
            self.finish_settle();
        }
    }

    /// Place the pending special and run the end-of-round check
    fn finish_settle(&mut self) -> RoundOutcome {
        let Some(pending) = self.pending.take() else {
            return RoundOutcome::Continue;
        };
        if let Some((special, column)) = pending.special {
            if let Some((x, y)) = attach_special(&mut self.board, column, special) {
                self.push_event(GameEvent::SpecialCreated { special, x, y });
            }
        }
        self.revision += 1;
        self.last_outcome = self.check_end();
        self.last_outcome
    }

    /// Cleared beats out-of-moves when both hold
    fn check_end(&mut self) -> RoundOutcome {
        if self.goals.all_met() {
            log::info!("level {} cleared with score {}", self.level, self.score);
            self.push_event(GameEvent::LevelCleared { level: self.level });
            self.level = self.level.saturating_add(1);
            self.start_level();
            return RoundOutcome::LevelCleared;
        }
        if self.moves == 0 {
            log::info!("level {} out of moves with score {}", self.level, self.score);
            self.push_event(GameEvent::OutOfMoves { level: self.level });
            self.start_level();
            return RoundOutcome::OutOfMoves;
        }
        RoundOutcome::Continue
    }

    /// Full level reset: moves, score, goals and board
    fn start_level(&mut self) {
        self.pending = None;
        self.moves = self.config.move_budget;
        self.score = 0;
        self.goals = Goals::generate(self.level, &self.config.palette, &mut self.rng);
        self.board = Board::random(self.config.width, &self.config.palette, &mut self.rng);
        self.level_id = self.level_id.wrapping_add(1);
        self.revision += 1;
        log::info!(
            "level {} started: goals {} x{} and {} x{}, {} moves",
            self.level,
            self.goals.a.color.as_str(),
            self.goals.a.need,
            self.goals.b.color.as_str(),
            self.goals.b.need,
            self.moves
        );
        self.push_event(GameEvent::LevelStarted { level: self.level });
    }

    /// Redistribute the colors on the board and clear every special.
    ///
    /// Costs no move. Returns false while a settle is pending.
    pub fn shuffle(&mut self) -> bool {
        if self.pending.is_some() {
            log::debug!("shuffle ignored: settling");
            return false;
        }

        let mut colors: Vec<Color> = self.board.cells().iter().flatten().map(|t| t.color).collect();
        self.rng.shuffle(&mut colors);

        let mut next = colors.into_iter();
        for cell in self.board.cells_mut().iter_mut() {
            if cell.is_some() {
                if let Some(color) = next.next() {
                    *cell = Some(Tile::plain(color));
                }
            }
        }

        self.revision += 1;
        self.push_event(GameEvent::Shuffled);
        true
    }

    /// Skip to the next level. Cancels any pending settle.
    pub fn request_new_level(&mut self) {
        self.level = self.level.saturating_add(1);
        self.start_level();
    }

    /// Restart from level 1. Cancels any pending settle.
    pub fn request_reset(&mut self) {
        self.level = 1;
        self.start_level();
    }

    /// Advance the settle timer.
    ///
    /// Returns true when the settle finished during this tick.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        pending.remaining_ms = pending.remaining_ms.saturating_sub(elapsed_ms);
        if pending.remaining_ms > 0 {
            return false;
        }
        self.finish_settle();
        true
    }

    /// Apply a player action. Returns true if the state changed.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Tap { x, y } => self.tap(x, y).resolved(),
            GameAction::Shuffle => self.shuffle(),
            GameAction::NewLevel => {
                self.request_new_level();
                true
            }
            GameAction::Reset => {
                self.request_reset();
                true
            }
        }
    }

    fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    /// Take every event recorded since the last drain
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn phase(&self) -> Phase {
        if self.pending.is_some() {
            Phase::Settling
        } else {
            Phase::Ready
        }
    }

    /// Outcome of the end-of-round check that followed the last settle
    pub fn last_outcome(&self) -> RoundOutcome {
        self.last_outcome
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves_remaining(&self) -> u32 {
        self.moves
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn level_id(&self) -> u32 {
        self.level_id
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn goals(&self) -> &Goals {
        &self.goals
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Replace the board, e.g. with a fixture from [`Board::from_rows`].
    ///
    /// Cancels any pending settle. The board width becomes the configured width.
    pub fn load_board(&mut self, board: Board) {
        self.pending = None;
        self.config.width = board.width();
        self.board = board;
        self.revision += 1;
    }

    /// Replace the current goals
    pub fn set_goals(&mut self, goals: Goals) {
        self.goals = goals;
        self.revision += 1;
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.width = self.board.width();
        out.cells.clear();
        out.cells.extend_from_slice(self.board.cells());
        out.score = self.score;
        out.moves_remaining = self.moves;
        out.level = self.level;
        out.level_id = self.level_id;
        out.revision = self.revision;
        out.goals = [
            GoalSnapshot::from(self.goals.a),
            GoalSnapshot::from(self.goals.b),
        ];
        out.busy = self.pending.is_some();
        out.seed = self.rng.seed();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}
