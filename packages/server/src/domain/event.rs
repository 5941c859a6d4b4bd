//! Events fanned out to every connection bound to a room.

use super::entity::Participant;
use super::value_object::RoomCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    /// Participant list changed (join / leave)
    Update {
        room_code: RoomCode,
        players: Vec<Participant>,
    },
    /// A buzz was accepted for the current question
    Buzzed {
        room_code: RoomCode,
        player: Participant,
    },
    QuestionStart {
        room_code: RoomCode,
    },
    GameStart {
        room_code: RoomCode,
    },
    /// A score was overwritten; carries the full participant list
    ScoreUpdate {
        room_code: RoomCode,
        players: Vec<Participant>,
    },
}

impl RoomEvent {
    pub fn room_code(&self) -> &RoomCode {
        match self {
            Self::Update { room_code, .. }
            | Self::Buzzed { room_code, .. }
            | Self::QuestionStart { room_code }
            | Self::GameStart { room_code }
            | Self::ScoreUpdate { room_code, .. } => room_code,
        }
    }
}
