//! Adapter runtime integration.
//!
//! Bridges the sync game loop with the async TCP server.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::runtime::Runtime;
use tokio::sync::{mpsc, oneshot};

use crate::core::{GameState, RandomSource};
use crate::protocol::{AckMessage, AckOutcome, ObservationMessage};
use crate::server::{run_server, ServerConfig};
use crate::types::GameAction;

/// Command delivered to the game loop.
#[derive(Debug, Clone)]
pub struct InboundCommand {
    pub client_id: usize,
    pub seq: u64,
    pub payload: InboundPayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundPayload {
    /// Controller command; the game loop answers with an ack
    Action(GameAction),
    /// A client just joined and wants the current state
    SnapshotRequest,
}

/// Outbound message to be delivered by the server.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    ToClientAck { client_id: usize, ack: AckMessage },
    ToClientObservation { client_id: usize, obs: ObservationMessage },
    BroadcastObservation { obs: ObservationMessage },
}

/// Apply a remote command to the engine and describe what happened.
pub fn execute<R: RandomSource>(game: &mut GameState<R>, action: GameAction) -> AckOutcome {
    match action {
        GameAction::Tap { x, y } => game.tap(x, y).into(),
        GameAction::Shuffle => {
            if game.shuffle() {
                AckOutcome::Shuffled
            } else {
                AckOutcome::Busy
            }
        }
        GameAction::NewLevel => {
            game.request_new_level();
            AckOutcome::NewLevel
        }
        GameAction::Reset => {
            game.request_reset();
            AckOutcome::Reset
        }
    }
}

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
    ready_rx: Option<oneshot::Receiver<SocketAddr>>,
    local_addr: Option<SocketAddr>,
}

impl Adapter {
    /// Start the adapter from environment variables.
    ///
    /// Returns `Ok(None)` if `ZOO_POP_AI_DISABLED` is set.
    pub fn start_from_env() -> anyhow::Result<Option<Self>> {
        let config = ServerConfig::from_env();
        if config.disabled {
            log::info!("remote adapter disabled via ZOO_POP_AI_DISABLED");
            return Ok(None);
        }
        Self::start(config).map(Some)
    }

    /// Spawn the server on a dedicated tokio runtime.
    pub fn start(config: ServerConfig) -> anyhow::Result<Self> {
        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
        let (ready_tx, ready_rx) = oneshot::channel();

        let rt = Runtime::new().context("failed to create tokio runtime")?;
        rt.spawn(async move {
            if let Err(e) = run_server(config, cmd_tx, out_rx, Some(ready_tx)).await {
                log::error!("remote adapter stopped: {e:#}");
            }
        });

        Ok(Self {
            _rt: rt,
            cmd_rx,
            out_tx,
            ready_rx: Some(ready_rx),
            local_addr: None,
        })
    }

    /// Address the server bound to, once it is listening.
    pub fn local_addr(&mut self) -> Option<SocketAddr> {
        if self.local_addr.is_none() {
            if let Some(rx) = self.ready_rx.as_mut() {
                match rx.try_recv() {
                    Ok(addr) => {
                        self.local_addr = Some(addr);
                        self.ready_rx = None;
                    }
                    Err(oneshot::error::TryRecvError::Empty) => {}
                    Err(oneshot::error::TryRecvError::Closed) => self.ready_rx = None,
                }
            }
        }
        self.local_addr
    }

    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }
}
