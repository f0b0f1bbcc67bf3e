//! Protocol module - JSON messages exchanged over the WebSocket
//!
//! Every frame is a JSON object with a `type` field and an optional
//! `payload`. The server sends one message kind, `state_update`, carrying a
//! full snapshot of the game. The client sends `move` and `new_game`.

use derive_more::{Display, Error};
use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use ws_tetris_core::types::{Cell, Direction, BOARD_HEIGHT, BOARD_WIDTH};
use ws_tetris_core::GameState;

const W: usize = BOARD_WIDTH as usize;
const H: usize = BOARD_HEIGHT as usize;

// ============== Server -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateUpdateType {
    #[serde(rename = "state_update")]
    StateUpdate,
}

impl Default for StateUpdateType {
    fn default() -> Self {
        Self::StateUpdate
    }
}

/// Full game snapshot sent after every state change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateUpdateMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: StateUpdateType,
    pub payload: StatePayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatePayload {
    /// `H` rows of `W` cells, row 0 at the top
    pub board: [[Cell; W]; H],
    pub current_piece: PiecePayload,
    /// 0-based piece type index
    pub next_piece: u8,
    pub score: u32,
    pub level: u32,
    pub lines_cleared: u32,
    pub game_over: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiecePayload {
    /// 0-based piece type index (I, J, L, O, S, T, Z)
    #[serde(rename = "type")]
    pub kind: u8,
    pub x: i8,
    pub y: i8,
    /// 0..=3, clockwise from spawn
    pub rotation: u8,
}

impl From<&GameState> for StatePayload {
    fn from(state: &GameState) -> Self {
        let piece = state.current_piece;
        Self {
            board: state.board.to_grid(),
            current_piece: PiecePayload {
                kind: piece.kind.index(),
                x: piece.x,
                y: piece.y,
                rotation: piece.rotation.index(),
            },
            next_piece: state.next_piece.index(),
            score: state.score,
            level: state.level,
            lines_cleared: state.lines_cleared,
            game_over: state.game_over,
        }
    }
}

impl From<&GameState> for StateUpdateMessage {
    fn from(state: &GameState) -> Self {
        Self {
            msg_type: StateUpdateType::StateUpdate,
            payload: StatePayload::from(state),
        }
    }
}

/// Serialize a snapshot of `state` into a text frame
pub fn encode_state(state: &GameState) -> Result<String, serde_json::Error> {
    serde_json::to_string(&StateUpdateMessage::from(state))
}

// ============== Client -> Server Messages ==============

/// Decoded inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    Move(Direction),
    NewGame,
    /// Well-formed message with a type this server does not handle
    Unknown(String),
}

#[derive(Debug, Display, Error)]
pub enum ParseError {
    #[display("malformed JSON: {source}")]
    Json { source: serde_json::Error },
    #[display("message has no type")]
    MissingType,
    #[display("invalid move payload: {source}")]
    InvalidMove { source: serde_json::Error },
}

/// Direction on the wire: integer 0..=3, or a case-insensitive name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WireDirection(Direction);

impl<'de> Deserialize<'de> for WireDirection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = WireDirection;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "a direction index 0..=3 or one of left/right/down/rotate")
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Direction::from_index(v)
                    .map(WireDirection)
                    .ok_or_else(|| E::invalid_value(Unexpected::Unsigned(v), &self))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                u64::try_from(v)
                    .ok()
                    .and_then(Direction::from_index)
                    .map(WireDirection)
                    .ok_or_else(|| E::invalid_value(Unexpected::Signed(v), &self))
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Direction::from_str(v)
                    .map(WireDirection)
                    .ok_or_else(|| E::invalid_value(Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(V)
    }
}

/// Parse one inbound text frame
pub fn parse_message(json: &str) -> Result<ClientMessage, ParseError> {
    #[derive(Debug, Deserialize)]
    struct Envelope {
        #[serde(rename = "type")]
        msg_type: Option<String>,
        #[serde(default)]
        payload: serde_json::Value,
    }

    let envelope: Envelope =
        serde_json::from_str(json).map_err(|source| ParseError::Json { source })?;
    let msg_type = envelope.msg_type.ok_or(ParseError::MissingType)?;

    match msg_type.as_str() {
        "move" => {
            let WireDirection(direction) = serde_json::from_value(envelope.payload)
                .map_err(|source| ParseError::InvalidMove { source })?;
            Ok(ClientMessage::Move(direction))
        }
        "new_game" => Ok(ClientMessage::NewGame),
        _ => Ok(ClientMessage::Unknown(msg_type)),
    }
}
