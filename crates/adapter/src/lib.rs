//! Adapter module - remote control via TCP socket with JSON protocol
//!
//! This crate lets bots, test harnesses and spectators drive or watch a game
//! over a TCP connection while the terminal front-end keeps running.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7878)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Controller Assignment**: First client to hello becomes the controller;
//!    everyone else observes. When the controller leaves, the oldest remaining
//!    client takes over.
//! 4. **Observation Streaming**: Server sends an observation on join and after
//!    every state change
//! 5. **Commanding**: Controller sends commands; each is acked once applied
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: client info, protocol version, `requested.stream_observations`
//! - **command**: `action` is one of `tap` (with `x`, `y`), `shuffle`,
//!   `newLevel`, `reset`
//!
//! ## Server → Client
//!
//! - **welcome**: assigned role and client id
//! - **observation**: board, score, moves, level, goals, busy flag,
//!   `state_hash` and advisory `messages`
//! - **ack**: command applied, with its `outcome`
//! - **error**: `handshake_required`, `protocol_mismatch`, `not_controller`,
//!   `invalid_command`, `invalid_seq` or `backpressure`
//!
//! # Environment Variables
//!
//! - `ZOO_POP_AI_HOST`: Bind address (default: "127.0.0.1")
//! - `ZOO_POP_AI_PORT`: Port number (default: 7878, 0 picks a free port)
//! - `ZOO_POP_AI_MAX_PENDING`: Command queue depth before `backpressure` (default: 10)
//! - `ZOO_POP_AI_DISABLED`: Set to "1" or "true" to disable adapter entirely
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":0,"client":{"name":"bot","version":"0.1.0"},"protocol_version":"1.0.0"}
//! Server -> Client: {"type":"welcome","seq":1,"ts":...,"protocol_version":"1.0.0","client_id":1,"role":"controller","game_id":"zoo-pop"}
//! Server -> Client: {"type":"observation","seq":1,"width":10,"board":{"cells":[[1,4,...],...],"specials":[]},...}
//! Client -> Server: {"type":"command","seq":2,"ts":0,"action":"tap","x":3,"y":7}
//! Server -> Client: {"type":"ack","seq":2,"ts":...,"status":"ok","outcome":"popped"}
//! ```
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 7878
//! {"type":"hello","seq":1,"ts":0,"client":{"name":"nc","version":"0"},"protocol_version":"1.0.0"}
//! ```

pub mod protocol;
pub mod runtime;
pub mod server;

pub use zoo_pop_core as core;
pub use zoo_pop_types as types;

pub use protocol::{AckOutcome, ErrorCode, ObservationMessage, PROTOCOL_VERSION};
pub use runtime::{execute, Adapter, InboundCommand, InboundPayload, OutboundMessage};
pub use server::{build_observation, run_server, state_hash, ServerConfig};
