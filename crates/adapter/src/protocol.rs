//! Protocol module - JSON message types for the remote adapter
//!
//! Line-delimited JSON. Every message carries `type`, `seq` (sender sequence
//! number) and `ts` (milliseconds since the Unix epoch).

use serde::{Deserialize, Serialize};

use crate::core::TapOutcome;
use crate::types::{Color, GameAction, Special};

/// Version string sent in `welcome`; clients must share the major version.
pub const PROTOCOL_VERSION: &str = "1.0.0";

// ============== Client -> Game Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HelloType {
    #[serde(rename = "hello")]
    Hello,
}

impl Default for HelloType {
    fn default() -> Self {
        Self::Hello
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandType {
    #[serde(rename = "command")]
    Command,
}

impl Default for CommandType {
    fn default() -> Self {
        Self::Command
    }
}

/// Client hello message (first message to establish connection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: HelloType,
    pub seq: u64,
    #[serde(default)]
    pub ts: u64,
    #[serde(default)]
    pub client: ClientInfo,
    pub protocol_version: String,
    #[serde(default)]
    pub requested: RequestedCapabilities,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestedCapabilities {
    #[serde(default = "default_stream")]
    pub stream_observations: bool,
}

fn default_stream() -> bool {
    true
}

impl Default for RequestedCapabilities {
    fn default() -> Self {
        Self {
            stream_observations: default_stream(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignedRole {
    #[serde(rename = "controller")]
    Controller,
    #[serde(rename = "observer")]
    Observer,
}

/// Command message (controller only)
#[derive(Debug, Clone, Deserialize)]
pub struct CommandMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: CommandType,
    pub seq: u64,
    #[serde(default)]
    pub ts: u64,
    pub action: ActionName,
    #[serde(default)]
    pub x: Option<i8>,
    #[serde(default)]
    pub y: Option<i8>,
}

impl CommandMessage {
    /// Engine action for this command. `tap` needs both coordinates.
    pub fn to_action(&self) -> Result<GameAction, &'static str> {
        match self.action {
            ActionName::Tap => match (self.x, self.y) {
                (Some(x), Some(y)) => Ok(GameAction::Tap { x, y }),
                _ => Err("tap requires x and y"),
            },
            ActionName::Shuffle => Ok(GameAction::Shuffle),
            ActionName::NewLevel => Ok(GameAction::NewLevel),
            ActionName::Reset => Ok(GameAction::Reset),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionName {
    Tap,
    Shuffle,
    NewLevel,
    Reset,
}

impl<'de> Deserialize<'de> for ActionName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        if s.eq_ignore_ascii_case("tap") {
            Ok(Self::Tap)
        } else if s.eq_ignore_ascii_case("shuffle") {
            Ok(Self::Shuffle)
        } else if s.eq_ignore_ascii_case("newLevel") {
            Ok(Self::NewLevel)
        } else if s.eq_ignore_ascii_case("reset") {
            Ok(Self::Reset)
        } else {
            Err(serde::de::Error::custom("unknown action"))
        }
    }
}

impl Serialize for ActionName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let s = match self {
            ActionName::Tap => "tap",
            ActionName::Shuffle => "shuffle",
            ActionName::NewLevel => "newLevel",
            ActionName::Reset => "reset",
        };
        serializer.serialize_str(s)
    }
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckStatus {
    #[serde(rename = "ok")]
    Ok,
}

/// What a command did once the game loop applied it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AckOutcome {
    Popped,
    Triggered,
    TooSmall,
    OutOfBounds,
    /// A settle was pending; the command was ignored
    Busy,
    Shuffled,
    NewLevel,
    Reset,
}

impl From<TapOutcome> for AckOutcome {
    fn from(value: TapOutcome) -> Self {
        match value {
            TapOutcome::Busy => Self::Busy,
            TapOutcome::OutOfBounds => Self::OutOfBounds,
            TapOutcome::TooSmall { .. } => Self::TooSmall,
            TapOutcome::Popped { .. } => Self::Popped,
            TapOutcome::Triggered { .. } => Self::Triggered,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "handshake_required")]
    HandshakeRequired,
    #[serde(rename = "protocol_mismatch")]
    ProtocolMismatch,
    #[serde(rename = "not_controller")]
    NotController,
    #[serde(rename = "invalid_command")]
    InvalidCommand,
    #[serde(rename = "invalid_seq")]
    InvalidSeq,
    #[serde(rename = "backpressure")]
    Backpressure,
}

/// Welcome message (response to hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub client_id: u64,
    pub role: AssignedRole,
    pub game_id: String,
}

/// Acknowledgment, sent after the command has been applied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    pub ts: u64,
    pub status: AckStatus,
    pub outcome: AckOutcome,
}

/// Error message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

/// Game state observation (streamed to clients that asked for it)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    pub width: u8,
    pub board: BoardSnapshot,
    pub score: u32,
    pub moves: u32,
    pub level: u32,
    pub level_id: u32,
    pub goals: [GoalView; 2],
    pub busy: bool,
    pub playable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub state_hash: StateHash,
    /// Advisory messages raised since the previous observation
    #[serde(default)]
    pub messages: Vec<String>,
}

/// Row-major board; rows run top to bottom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// 0 = empty, 1..=6 = color in palette order
    pub cells: Vec<Vec<u8>>,
    #[serde(default)]
    pub specials: Vec<SpecialCell>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialCell {
    pub x: i8,
    pub y: i8,
    pub kind: SpecialKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialKind {
    #[serde(rename = "rocket")]
    Rocket,
    #[serde(rename = "bomb")]
    Bomb,
}

impl SpecialKind {
    pub fn from_special(special: Special) -> Option<Self> {
        match special {
            Special::None => None,
            Special::Rocket => Some(Self::Rocket),
            Special::Bomb => Some(Self::Bomb),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalView {
    pub color: ColorName,
    pub have: u32,
    pub need: u32,
}

/// Color serialized by its lowercase name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorName(pub Color);

impl Serialize for ColorName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for ColorName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        Color::from_str(s)
            .map(ColorName)
            .ok_or_else(|| serde::de::Error::custom("invalid color"))
    }
}

/// Deterministic state hash serialized as lowercase hex (without heap allocation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateHash(pub u64);

impl Serialize for StateHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        const HEX: &[u8; 16] = b"0123456789abcdef";
        let mut buf = [0u8; 16];
        let mut v = self.0;
        for i in 0..16 {
            buf[15 - i] = HEX[(v & 0x0f) as usize];
            v >>= 4;
        }
        let s = std::str::from_utf8(&buf).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(s)
    }
}

impl<'de> Deserialize<'de> for StateHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        u64::from_str_radix(s.trim(), 16)
            .map(StateHash)
            .map_err(|_| serde::de::Error::custom("invalid hex"))
    }
}

// ============== Message Parsing ==============

/// Parse a JSON message from a string
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "hello")]
        Hello(HelloMessage),
        #[serde(rename = "command")]
        Command(CommandMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Command(m)) => Ok(ParsedMessage::Command(m)),
        Err(e) => {
            // An unknown type is reported to the client, not treated as garbage.
            #[derive(Debug, Deserialize)]
            struct Header<'a> {
                #[serde(rename = "type")]
                msg_type: Option<&'a str>,
                seq: Option<u64>,
            }
            let header = serde_json::from_str::<Header>(json)?;
            match header.msg_type {
                Some("hello") | Some("command") => Err(e),
                _ => Ok(ParsedMessage::Unknown(UnknownMessage {
                    seq: header.seq.unwrap_or(0),
                })),
            }
        }
    }
}

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Command(CommandMessage),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

/// Best-effort `seq` from a line that failed to parse
pub fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

// ============== Utility Functions ==============

/// Create a hello message
pub fn create_hello(seq: u64, client_name: &str) -> HelloMessage {
    HelloMessage {
        msg_type: HelloType::Hello,
        seq,
        ts: current_timestamp_ms(),
        client: ClientInfo {
            name: client_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        protocol_version: PROTOCOL_VERSION.to_string(),
        requested: RequestedCapabilities::default(),
    }
}

/// Create a welcome message
pub fn create_welcome(seq: u64, client_id: u64, role: AssignedRole) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: current_timestamp_ms(),
        protocol_version: PROTOCOL_VERSION.to_string(),
        client_id,
        role,
        game_id: "zoo-pop".to_string(),
    }
}

/// Create an acknowledgment
pub fn create_ack(seq: u64, outcome: AckOutcome) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        ts: current_timestamp_ms(),
        status: AckStatus::Ok,
        outcome,
    }
}

/// Create an error message
pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Get current timestamp in milliseconds
pub(crate) fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hello() {
        let json = r#"{"type":"hello","seq":1,"ts":1234567890,"client":{"name":"bot","version":"0.1.0"},"protocol_version":"1.0.0","requested":{"stream_observations":false}}"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Hello(msg) => {
                assert_eq!(msg.msg_type, HelloType::Hello);
                assert_eq!(msg.seq, 1);
                assert_eq!(msg.client.name, "bot");
                assert!(!msg.requested.stream_observations);
            }
            other => panic!("Expected Hello message, got {other:?}"),
        }
    }

    #[test]
    fn test_hello_defaults_to_streaming() {
        let json = r#"{"type":"hello","seq":1,"protocol_version":"1.0.0"}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Hello(msg) => assert!(msg.requested.stream_observations),
            other => panic!("Expected Hello message, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_tap_command() {
        let json = r#"{"type":"command","seq":2,"ts":0,"action":"tap","x":3,"y":7}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Command(msg) => {
                assert_eq!(msg.action, ActionName::Tap);
                assert_eq!(msg.to_action(), Ok(GameAction::Tap { x: 3, y: 7 }));
            }
            other => panic!("Expected Command message, got {other:?}"),
        }
    }

    #[test]
    fn test_tap_without_coordinates_is_rejected() {
        let json = r#"{"type":"command","seq":2,"action":"tap","x":3}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Command(msg) => assert!(msg.to_action().is_err()),
            other => panic!("Expected Command message, got {other:?}"),
        }
    }

    #[test]
    fn test_action_names_case_insensitive() {
        let json = r#"{"type":"command","seq":4,"action":"NEWLEVEL"}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Command(msg) => assert_eq!(msg.to_action(), Ok(GameAction::NewLevel)),
            other => panic!("Expected Command message, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_action_is_parse_error() {
        let json = r#"{"type":"command","seq":5,"action":"explode"}"#;
        assert!(parse_message(json).is_err());
        assert_eq!(extract_seq_best_effort(json), Some(5));
    }

    #[test]
    fn test_unknown_type_keeps_seq() {
        let json = r#"{"type":"control","seq":9}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Unknown(m) => assert_eq!(m.seq, 9),
            other => panic!("Expected Unknown message, got {other:?}"),
        }
    }

    #[test]
    fn test_ack_carries_outcome() {
        let ack = create_ack(10, AckOutcome::TooSmall);
        let json = serde_json::to_string(&ack).unwrap();
        assert!(json.contains(r#""outcome":"tooSmall""#));
        assert!(json.contains(r#""status":"ok""#));
    }

    #[test]
    fn test_error_code_wire_names() {
        let err = create_error(3, ErrorCode::InvalidSeq, "seq must be strictly increasing");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains(r#""code":"invalid_seq""#));
    }

    #[test]
    fn test_state_hash_hex() {
        let json = serde_json::to_string(&StateHash(0xab)).unwrap();
        assert_eq!(json, "\"00000000000000ab\"");
        let back: StateHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StateHash(0xab));
    }

    #[test]
    fn test_tap_outcome_mapping() {
        assert_eq!(AckOutcome::from(TapOutcome::Busy), AckOutcome::Busy);
        assert_eq!(
            AckOutcome::from(TapOutcome::TooSmall { size: 1 }),
            AckOutcome::TooSmall
        );
        assert_eq!(
            AckOutcome::from(TapOutcome::Popped {
                size: 3,
                special: Special::None
            }),
            AckOutcome::Popped
        );
    }
}
