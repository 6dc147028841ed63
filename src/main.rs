//! Zoo Pop terminal runner (default binary).
//!
//! Crossterm input, the framebuffer renderer and a fixed-timestep loop. When
//! the remote adapter is enabled its commands are applied between frames and
//! every state change is broadcast as an observation.

use std::fs::OpenOptions;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};

use zoo_pop::adapter::protocol::create_ack;
use zoo_pop::adapter::{build_observation, execute, Adapter, InboundPayload, OutboundMessage};
use zoo_pop::core::{GameEvent, GameSnapshot, GameState, PcgSource, RulesConfig};
use zoo_pop::input::{handle_key_event, handle_mouse_event, should_quit, Cursor, InputCommand};
use zoo_pop::term::{FrameBuffer, GameView, Overlay, Pulse, TerminalRenderer, Toasts, Viewport};
use zoo_pop::types::{GameAction, TICK_MS};

fn main() -> Result<()> {
    init_logging()?;

    let config = RulesConfig::from_env();
    let game = match seed_from_env() {
        Some(seed) => GameState::with_config(config, seed),
        None => GameState::with_rng(config, PcgSource::from_entropy()),
    };

    let adapter = match Adapter::start_from_env() {
        Ok(adapter) => adapter,
        Err(e) => {
            log::warn!("remote adapter unavailable: {e:#}");
            None
        }
    };

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = App::new(game, adapter).run(&mut term);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Log to the file named by `ZOO_POP_LOG_PATH`; the alternate screen owns
/// stdout and stderr. Logging stays off when the variable is unset.
fn init_logging() -> Result<()> {
    let Some(path) = std::env::var_os("ZOO_POP_LOG_PATH").filter(|p| !p.is_empty()) else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.to_string_lossy()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(())
}

fn seed_from_env() -> Option<u64> {
    std::env::var("ZOO_POP_SEED")
        .ok()
        .and_then(|s| s.trim().parse().ok())
}

struct App {
    game: GameState,
    snapshot: GameSnapshot,
    cursor: Cursor,
    toasts: Toasts,
    pulse: Pulse,
    show_help: bool,
    adapter: Option<Adapter>,
    /// Messages raised since the last broadcast observation
    messages: Vec<String>,
    obs_seq: u64,
    broadcast_revision: Option<u64>,
}

impl App {
    fn new(game: GameState, adapter: Option<Adapter>) -> Self {
        let cursor = Cursor::new(game.board().width());
        Self {
            game,
            snapshot: GameSnapshot::default(),
            cursor,
            toasts: Toasts::new(),
            pulse: Pulse::default(),
            show_help: false,
            adapter,
            messages: Vec::new(),
            obs_seq: 0,
            broadcast_revision: None,
        }
    }

    fn run(mut self, term: &mut TerminalRenderer) -> Result<()> {
        let view = GameView::default();
        let mut fb = FrameBuffer::new(0, 0);
        let tick_duration = Duration::from_millis(TICK_MS as u64);
        let mut last_tick = Instant::now();

        loop {
            self.poll_adapter();
            self.collect_events();
            self.broadcast();

            // Render.
            let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
            let viewport = Viewport::new(w, h);
            self.game.snapshot_into(&mut self.snapshot);
            self.cursor.resize(self.snapshot.width);
            let remote_port = self
                .adapter
                .as_mut()
                .and_then(|a| a.local_addr())
                .map(|addr| addr.port());
            let overlay = Overlay {
                cursor: Some(self.cursor.position()),
                pulse: self.pulse.position(),
                toast: self.toasts.current(),
                show_help: self.show_help,
                remote_port,
            };
            view.render_into_with(&self.snapshot, &overlay, viewport, &mut fb);
            term.draw(&fb)?;

            // Input with timeout until next tick.
            let timeout = tick_duration
                .checked_sub(last_tick.elapsed())
                .unwrap_or(Duration::ZERO);

            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) => {
                        if should_quit(key) {
                            return Ok(());
                        }
                        if let Some(command) = handle_key_event(key) {
                            self.handle_command(command);
                        }
                    }
                    Event::Mouse(mouse) => {
                        if let Some((column, row)) = handle_mouse_event(mouse) {
                            if let Some((x, y)) =
                                view.hit_test(self.snapshot.width, viewport, column, row)
                            {
                                self.cursor.set(x, y);
                                self.game.apply_action(GameAction::Tap { x, y });
                            }
                        }
                    }
                    Event::Resize(_, _) => term.invalidate(),
                    _ => {}
                }
            }

            // Tick.
            if last_tick.elapsed() >= tick_duration {
                last_tick = Instant::now();
                self.game.tick(TICK_MS);
                self.toasts.tick(TICK_MS);
                self.pulse.tick(TICK_MS);
            }
        }
    }

    fn handle_command(&mut self, command: InputCommand) {
        match command {
            InputCommand::MoveCursor { dx, dy } => self.cursor.move_by(dx, dy),
            InputCommand::Tap => {
                self.game.apply_action(self.cursor.tap());
            }
            InputCommand::Shuffle => {
                self.game.apply_action(GameAction::Shuffle);
            }
            InputCommand::NewLevel => {
                self.game.apply_action(GameAction::NewLevel);
            }
            InputCommand::Reset => {
                self.game.apply_action(GameAction::Reset);
            }
            InputCommand::ToggleHelp => self.show_help = !self.show_help,
        }
    }

    /// Turn engine events into toasts, pulses and observation messages.
    fn collect_events(&mut self) {
        for event in self.game.drain_events() {
            if let GameEvent::TooSmall { x, y } = event {
                self.pulse.start((x, y));
            }
            if let Some(message) = event.message() {
                self.toasts.push(message.clone());
                if self.adapter.is_some() {
                    self.messages.push(message);
                }
            }
        }
    }

    fn poll_adapter(&mut self) {
        let Some(adapter) = self.adapter.as_mut() else {
            return;
        };
        while let Some(cmd) = adapter.try_recv() {
            match cmd.payload {
                InboundPayload::Action(action) => {
                    let outcome = execute(&mut self.game, action);
                    log::debug!(
                        "client {} seq {}: {} -> {outcome:?}",
                        cmd.client_id,
                        cmd.seq,
                        action.as_str()
                    );
                    adapter.send(OutboundMessage::ToClientAck {
                        client_id: cmd.client_id,
                        ack: create_ack(cmd.seq, outcome),
                    });
                }
                InboundPayload::SnapshotRequest => {
                    self.game.snapshot_into(&mut self.snapshot);
                    self.obs_seq += 1;
                    let obs = build_observation(&self.snapshot, self.obs_seq, Vec::new());
                    adapter.send(OutboundMessage::ToClientObservation {
                        client_id: cmd.client_id,
                        obs,
                    });
                }
            }
        }
    }

    /// Broadcast an observation whenever the engine state changed or a
    /// message is waiting.
    fn broadcast(&mut self) {
        let Some(adapter) = self.adapter.as_ref() else {
            return;
        };
        let revision = self.game.revision();
        if self.broadcast_revision == Some(revision) && self.messages.is_empty() {
            return;
        }
        self.broadcast_revision = Some(revision);
        self.game.snapshot_into(&mut self.snapshot);
        self.obs_seq += 1;
        let messages = std::mem::take(&mut self.messages);
        let obs = build_observation(&self.snapshot, self.obs_seq, messages);
        adapter.send(OutboundMessage::BroadcastObservation { obs });
    }
}
