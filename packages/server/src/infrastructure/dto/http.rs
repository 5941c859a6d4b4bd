//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::ParticipantInfo;

/// Entry of `GET /api/rooms`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub code: String,
    /// Participant ids, sorted
    pub participants: Vec<String>,
    pub question_active: bool,
    /// RFC 3339 (UTC)
    pub created_at: String,
}

/// Body of `GET /api/rooms/{room_code}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub code: String,
    pub participants: Vec<ParticipantInfo>,
    pub question_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buzzer_winner: Option<ParticipantInfo>,
    pub created_at: String,
}
