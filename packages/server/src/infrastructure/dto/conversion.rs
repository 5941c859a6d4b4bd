//! Conversion logic between DTOs and domain entities.

use hayaoshi_shared::time::millis_to_rfc3339;

use crate::domain::{DomainError, Participant, ParticipantId, Room};
use crate::infrastructure::dto::{
    http::{RoomDetailDto, RoomSummaryDto},
    websocket::ParticipantInfo,
};

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<ParticipantInfo> for Participant {
    type Error = DomainError;

    /// A blank display name falls back to the participant id.
    fn try_from(dto: ParticipantInfo) -> Result<Self, Self::Error> {
        let id = ParticipantId::new(dto.id)?;
        let display_name = match dto.display_name.trim() {
            "" => id.as_str().to_string(),
            name => name.to_string(),
        };
        Ok(Participant::new(id, display_name)
            .with_contact(dto.contact.filter(|c| !c.trim().is_empty()))
            .with_score(dto.score))
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<Participant> for ParticipantInfo {
    fn from(model: Participant) -> Self {
        Self {
            id: model.id.into_string(),
            display_name: model.display_name,
            contact: model.contact,
            score: model.score,
        }
    }
}

impl From<&Room> for RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            code: room.code().to_string(),
            participants: room
                .participant_list()
                .into_iter()
                .map(|p| p.id.into_string())
                .collect(),
            question_active: room.question_active(),
            created_at: millis_to_rfc3339(room.created_at().value()),
        }
    }
}

impl From<&Room> for RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            code: room.code().to_string(),
            participants: room.participant_list().into_iter().map(Into::into).collect(),
            question_active: room.question_active(),
            buzzer_winner: room.buzzer_winner().cloned().map(Into::into),
            created_at: millis_to_rfc3339(room.created_at().value()),
        }
    }
}
