//! TCP server for the remote adapter
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking.

use std::hash::{Hash, Hasher};
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, RwLock};

use crate::core::GameSnapshot;
use crate::protocol::*;
use crate::runtime::{InboundCommand, InboundPayload, OutboundMessage};

/// Stable 64-bit FNV-1a hasher for deterministic `state_hash`.
///
/// `DefaultHasher` output is not guaranteed stable across Rust versions.
#[derive(Debug, Clone)]
struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_pending_commands: usize,
    pub disabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            max_pending_commands: 10,
            disabled: false,
        }
    }
}

impl ServerConfig {
    /// Create from `ZOO_POP_AI_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key: &str| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let host = lookup("ZOO_POP_AI_HOST")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = lookup("ZOO_POP_AI_PORT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);
        let max_pending_commands = lookup("ZOO_POP_AI_MAX_PENDING")
            .and_then(|s| s.trim().parse().ok())
            .filter(|&n: &usize| n > 0)
            .unwrap_or(defaults.max_pending_commands);
        let disabled = lookup("ZOO_POP_AI_DISABLED")
            .map(|v| v.trim() == "1" || v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            host,
            port,
            max_pending_commands,
            disabled,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid adapter address {}:{}", self.host, self.port))
    }
}

/// Shared server state
struct ServerState {
    clients: RwLock<Vec<ClientHandle>>,
    controller: RwLock<Option<usize>>,
}

impl ServerState {
    fn new() -> Self {
        Self {
            clients: RwLock::new(Vec::new()),
            controller: RwLock::new(None),
        }
    }

    async fn is_handshaken(&self, client_id: usize) -> bool {
        let clients = self.clients.read().await;
        clients
            .iter()
            .find(|c| c.id == client_id)
            .map(|c| c.handshaken)
            .unwrap_or(false)
    }

    async fn is_controller(&self, client_id: usize) -> bool {
        *self.controller.read().await == Some(client_id)
    }

    /// Record `seq` if it is strictly greater than the last one seen.
    async fn check_and_update_seq(&self, client_id: usize, seq: u64) -> bool {
        let mut clients = self.clients.write().await;
        let Some(client) = clients.iter_mut().find(|c| c.id == client_id) else {
            return true;
        };
        match client.last_seq {
            Some(prev) if seq <= prev => false,
            _ => {
                client.last_seq = Some(seq);
                true
            }
        }
    }

    async fn send_to(&self, client_id: usize, msg: ClientOutbound) {
        let clients = self.clients.read().await;
        if let Some(c) = clients.iter().find(|c| c.id == client_id) {
            let _ = c.tx.send(msg);
        }
    }
}

/// Handle to a connected client
struct ClientHandle {
    id: usize,
    stream_observations: bool,
    handshaken: bool,
    last_seq: Option<u64>,
    tx: mpsc::UnboundedSender<ClientOutbound>,
}

#[derive(Debug, Clone)]
enum ClientOutbound {
    Welcome(WelcomeMessage),
    Ack(AckMessage),
    Error(ErrorMessage),
    Observation(ObservationMessage),
}

/// Start the TCP server
///
/// Commands go to the game loop through `command_tx`; whatever the game loop
/// sends on `out_rx` is routed to clients. `ready_tx` receives the bound
/// address once the listener is up.
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let bound = listener.local_addr()?;
    log::info!("remote adapter listening on {bound}");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState::new());
    let mut client_id_counter = 0usize;

    // Outbound dispatcher.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                match msg {
                    OutboundMessage::ToClientAck { client_id, ack } => {
                        state.send_to(client_id, ClientOutbound::Ack(ack)).await;
                    }
                    OutboundMessage::ToClientObservation { client_id, obs } => {
                        state.send_to(client_id, ClientOutbound::Observation(obs)).await;
                    }
                    OutboundMessage::BroadcastObservation { obs } => {
                        let clients = state.clients.read().await;
                        for c in clients.iter() {
                            if c.handshaken && c.stream_observations {
                                let _ = c.tx.send(ClientOutbound::Observation(obs.clone()));
                            }
                        }
                    }
                }
            }
        });
    }

    // Accept incoming connections
    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;

        log::info!("client {client_id} connected from {addr}");

        let state = Arc::clone(&state);
        let command_tx = command_tx.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, client_id, state, command_tx).await {
                log::warn!("client {client_id} error: {e:#}");
            }
            log::info!("client {client_id} disconnected");
        });
    }
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    client_id: usize,
    state: Arc<ServerState>,
    command_tx: mpsc::Sender<InboundCommand>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);

    let (tx, mut rx) = mpsc::unbounded_channel::<ClientOutbound>();

    state.clients.write().await.push(ClientHandle {
        id: client_id,
        stream_observations: false,
        handshaken: false,
        last_seq: None,
        tx: tx.clone(),
    });

    // Writer task: one JSON object per line.
    let write_task = tokio::spawn(async move {
        let mut buf: Vec<u8> = Vec::with_capacity(4096);
        while let Some(msg) = rx.recv().await {
            buf.clear();
            let encoded = match &msg {
                ClientOutbound::Welcome(m) => serde_json::to_writer(&mut buf, m),
                ClientOutbound::Ack(m) => serde_json::to_writer(&mut buf, m),
                ClientOutbound::Error(m) => serde_json::to_writer(&mut buf, m),
                ClientOutbound::Observation(m) => serde_json::to_writer(&mut buf, m),
            };
            if encoded.is_err() {
                continue;
            }
            buf.push(b'\n');
            if writer.write_all(&buf).await.is_err() || writer.flush().await.is_err() {
                break;
            }
        }
    });

    let reject = |seq: u64, code: ErrorCode, message: &str| {
        log::debug!("client {client_id} seq {seq}: {message}");
        let _ = tx.send(ClientOutbound::Error(create_error(seq, code, message)));
    };

    let mut line = String::new();
    let result: anyhow::Result<()> = loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => break Ok(()),
            Ok(_) => {}
            Err(e) => break Err(e.into()),
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_message(trimmed) {
            Ok(ParsedMessage::Hello(hello)) => {
                let handshaken = state.is_handshaken(client_id).await;
                if handshaken && !state.check_and_update_seq(client_id, hello.seq).await {
                    reject(hello.seq, ErrorCode::InvalidSeq, "seq must be strictly increasing");
                    continue;
                }

                let major = PROTOCOL_VERSION.split('.').next().unwrap_or("1");
                if hello.protocol_version.split('.').next() != Some(major) {
                    reject(
                        hello.seq,
                        ErrorCode::ProtocolMismatch,
                        &format!("Protocol version {} not supported", hello.protocol_version),
                    );
                    break Ok(());
                }

                // First client to hello becomes controller.
                let role = {
                    let mut controller = state.controller.write().await;
                    let mut clients = state.clients.write().await;
                    if let Some(client) = clients.iter_mut().find(|c| c.id == client_id) {
                        client.handshaken = true;
                        client.last_seq = Some(hello.seq);
                        client.stream_observations = hello.requested.stream_observations;
                    }
                    match *controller {
                        None => {
                            *controller = Some(client_id);
                            log::info!("client {client_id} is now controller");
                            AssignedRole::Controller
                        }
                        Some(id) if id == client_id => AssignedRole::Controller,
                        Some(_) => AssignedRole::Observer,
                    }
                };

                let welcome = create_welcome(hello.seq, client_id as u64, role);
                let _ = tx.send(ClientOutbound::Welcome(welcome));

                if hello.requested.stream_observations {
                    let _ = command_tx.try_send(InboundCommand {
                        client_id,
                        seq: hello.seq,
                        payload: InboundPayload::SnapshotRequest,
                    });
                }
            }

            Ok(ParsedMessage::Command(cmd)) => {
                if !state.is_handshaken(client_id).await {
                    reject(cmd.seq, ErrorCode::HandshakeRequired, "Send hello before command");
                    continue;
                }
                if !state.check_and_update_seq(client_id, cmd.seq).await {
                    reject(cmd.seq, ErrorCode::InvalidSeq, "seq must be strictly increasing");
                    continue;
                }
                if !state.is_controller(client_id).await {
                    reject(cmd.seq, ErrorCode::NotController, "Only controller may send commands");
                    continue;
                }

                let action = match cmd.to_action() {
                    Ok(a) => a,
                    Err(message) => {
                        reject(cmd.seq, ErrorCode::InvalidCommand, message);
                        continue;
                    }
                };

                // Backpressure: bounded queue. The game loop acks once applied.
                if command_tx
                    .try_send(InboundCommand {
                        client_id,
                        seq: cmd.seq,
                        payload: InboundPayload::Action(action),
                    })
                    .is_err()
                {
                    reject(cmd.seq, ErrorCode::Backpressure, "Command queue is full");
                }
            }

            Ok(ParsedMessage::Unknown(msg)) => {
                reject(msg.seq, ErrorCode::InvalidCommand, "Unknown message type");
            }

            Err(e) => {
                let seq = extract_seq_best_effort(trimmed).unwrap_or(0);
                reject(seq, ErrorCode::InvalidCommand, &format!("JSON parse error: {e}"));
            }
        }
    };

    // Remove the client and hand control to the oldest remaining client.
    {
        let mut controller = state.controller.write().await;
        let mut clients = state.clients.write().await;
        clients.retain(|c| c.id != client_id);

        if *controller == Some(client_id) {
            let next_id = clients.iter().filter(|c| c.handshaken).map(|c| c.id).min();
            *controller = next_id;
            match next_id {
                Some(id) => log::info!("client {id} promoted to controller"),
                None => log::info!("controller {client_id} released"),
            }
        }
    }

    drop(reject);
    drop(tx);
    let _ = write_task.await;

    result
}

/// Build an observation from a snapshot and the messages raised since the
/// previous one.
pub fn build_observation(
    snapshot: &GameSnapshot,
    seq: u64,
    messages: Vec<String>,
) -> ObservationMessage {
    let width = snapshot.width;
    let mut cells = Vec::with_capacity(width as usize);
    let mut specials = Vec::new();
    for y in 0..width as i8 {
        let mut row = Vec::with_capacity(width as usize);
        for x in 0..width as i8 {
            let tile = snapshot.cell(x, y).flatten();
            row.push(tile.map(|t| t.color.index() as u8 + 1).unwrap_or(0));
            if let Some(kind) = tile.and_then(|t| SpecialKind::from_special(t.special)) {
                specials.push(SpecialCell { x, y, kind });
            }
        }
        cells.push(row);
    }

    let goals = snapshot.goals.map(|g| GoalView {
        color: ColorName(g.color),
        have: g.have.min(g.need),
        need: g.need,
    });

    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        width,
        board: BoardSnapshot { cells, specials },
        score: snapshot.score,
        moves: snapshot.moves_remaining,
        level: snapshot.level,
        level_id: snapshot.level_id,
        goals,
        busy: snapshot.busy,
        playable: snapshot.playable(),
        seed: snapshot.seed,
        state_hash: state_hash(snapshot),
        messages,
    }
}

/// Hash of everything an observer can see except timestamps and messages.
pub fn state_hash(snapshot: &GameSnapshot) -> StateHash {
    let mut hasher = Fnv1aHasher::new();
    snapshot.board_hash().hash(&mut hasher);
    snapshot.score.hash(&mut hasher);
    snapshot.moves_remaining.hash(&mut hasher);
    snapshot.level.hash(&mut hasher);
    snapshot.level_id.hash(&mut hasher);
    for goal in &snapshot.goals {
        goal.color.index().hash(&mut hasher);
        goal.have.hash(&mut hasher);
        goal.need.hash(&mut hasher);
    }
    snapshot.busy.hash(&mut hasher);
    StateHash(hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameState, RulesConfig};

    #[test]
    fn test_server_config_from_lookup() {
        let config = ServerConfig::from_lookup(|key: &str| match key {
            "ZOO_POP_AI_PORT" => Some("9000".to_string()),
            "ZOO_POP_AI_MAX_PENDING" => Some("0".to_string()),
            "ZOO_POP_AI_DISABLED" => Some("TRUE".to_string()),
            _ => None,
        });
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_pending_commands, 10);
        assert!(config.disabled);
        assert!(config.socket_addr().is_ok());
    }

    #[test]
    fn test_invalid_host_is_an_error() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..ServerConfig::default()
        };
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn test_observation_mirrors_snapshot() {
        let game = GameState::with_config(RulesConfig::instant(), 42);
        let snap = game.snapshot();
        let obs = build_observation(&snap, 3, vec!["Level 1".to_string()]);

        assert_eq!(obs.seq, 3);
        assert_eq!(obs.width, snap.width);
        assert_eq!(obs.board.cells.len(), snap.width as usize);
        assert!(obs.board.cells.iter().flatten().all(|&c| (1..=6).contains(&c)));
        assert!(obs.board.specials.is_empty());
        assert_eq!(obs.moves, snap.moves_remaining);
        assert_eq!(obs.messages, vec!["Level 1".to_string()]);
        assert!(obs.playable);
    }

    #[test]
    fn test_state_hash_tracks_visible_state() {
        let mut game = GameState::with_config(RulesConfig::instant(), 1);
        let before = state_hash(&game.snapshot());
        assert_eq!(before, state_hash(&game.snapshot()));

        game.request_new_level();
        assert_ne!(before, state_hash(&game.snapshot()));
    }
}
