//! WebSocket message DTOs.
//!
//! Every frame is a JSON object tagged by `type`; field names are camelCase.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::RoomEvent;

/// Message type tag
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MessageType {
    // client -> server
    Join,
    Buzz,
    StartQuestion,
    UpdateScore,
    // both directions
    GameStart,
    // server -> client
    Update,
    Buzzed,
    QuestionStart,
    ScoreUpdate,
    Error,
}

/// Participant as it appears on the wire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInfo {
    pub id: String,
    #[serde(default, alias = "name")]
    pub display_name: String,
    #[serde(default, alias = "email", skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default)]
    pub score: i64,
}

/// Inbound messages.
///
/// Fields are optional so that a missing room code or participant surfaces
/// as invalid input from the usecase layer instead of a parse failure.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    Join {
        room_code: Option<String>,
        participant: Option<ParticipantInfo>,
    },
    Buzz {
        room_code: Option<String>,
        participant: Option<ParticipantInfo>,
    },
    StartQuestion {
        room_code: Option<String>,
    },
    GameStart {
        room_code: Option<String>,
    },
    UpdateScore {
        room_code: Option<String>,
        participant_id: Option<String>,
        score: Option<i64>,
    },
}

/// `type` tags accepted from clients
const CLIENT_MESSAGE_TYPES: [&str; 5] =
    ["join", "buzz", "startQuestion", "gameStart", "updateScore"];

/// Result of parsing an inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedMessage {
    Known(ClientMessage),
    /// Well-formed JSON with a `type` this server does not handle
    Unknown(String),
}

#[derive(Debug, Error)]
pub enum MessageParseError {
    #[error("invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("message has no 'type' field")]
    MissingType,

    #[error("invalid '{kind}' message: {source}")]
    InvalidPayload {
        kind: String,
        source: serde_json::Error,
    },
}

/// Parse an inbound text frame.
pub fn parse_client_message(text: &str) -> Result<ParsedMessage, MessageParseError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(MessageParseError::InvalidJson)?;
    let kind = value
        .get("type")
        .and_then(serde_json::Value::as_str)
        .ok_or(MessageParseError::MissingType)?
        .to_string();

    if !CLIENT_MESSAGE_TYPES.contains(&kind.as_str()) {
        return Ok(ParsedMessage::Unknown(kind));
    }

    serde_json::from_value(value)
        .map(ParsedMessage::Known)
        .map_err(|source| MessageParseError::InvalidPayload { kind, source })
}

/// `update` / `scoreUpdate`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayersMessage {
    pub r#type: MessageType,
    pub room_code: String,
    pub players: Vec<ParticipantInfo>,
}

/// `buzzed`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuzzedMessage {
    pub r#type: MessageType,
    pub room_code: String,
    pub player: ParticipantInfo,
}

/// `questionStart` / `gameStart`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomSignalMessage {
    pub r#type: MessageType,
    pub room_code: String,
}

/// `error`, sent only to the originating connection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorMessage {
    pub r#type: MessageType,
    pub message: String,
}

impl ErrorMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            r#type: MessageType::Error,
            message: message.into(),
        }
    }
}

/// Serialize a room event into its wire representation.
pub fn encode_room_event(event: &RoomEvent) -> Result<String, serde_json::Error> {
    match event {
        RoomEvent::Update { room_code, players } => serde_json::to_string(&PlayersMessage {
            r#type: MessageType::Update,
            room_code: room_code.to_string(),
            players: players.iter().cloned().map(Into::into).collect(),
        }),
        RoomEvent::ScoreUpdate { room_code, players } => serde_json::to_string(&PlayersMessage {
            r#type: MessageType::ScoreUpdate,
            room_code: room_code.to_string(),
            players: players.iter().cloned().map(Into::into).collect(),
        }),
        RoomEvent::Buzzed { room_code, player } => serde_json::to_string(&BuzzedMessage {
            r#type: MessageType::Buzzed,
            room_code: room_code.to_string(),
            player: player.clone().into(),
        }),
        RoomEvent::QuestionStart { room_code } => serde_json::to_string(&RoomSignalMessage {
            r#type: MessageType::QuestionStart,
            room_code: room_code.to_string(),
        }),
        RoomEvent::GameStart { room_code } => serde_json::to_string(&RoomSignalMessage {
            r#type: MessageType::GameStart,
            room_code: room_code.to_string(),
        }),
    }
}
