//! Route inbound WebSocket messages to usecases by their `type` tag.

use crate::{
    domain::{ConnectionId, Participant, ParticipantId, RoomCode},
    infrastructure::dto::websocket::{
        ClientMessage, ParsedMessage, ParticipantInfo, parse_client_message,
    },
    ui::state::AppState,
    usecase::GameError,
};

/// Handle one inbound text frame.
///
/// Errors are reported back to the originating connection only; unknown
/// message types are logged and ignored.
pub async fn dispatch(
    state: &AppState,
    connection_id: &ConnectionId,
    text: &str,
) -> Result<(), GameError> {
    let message = match parse_client_message(text) {
        Ok(ParsedMessage::Known(message)) => message,
        Ok(ParsedMessage::Unknown(kind)) => {
            tracing::warn!(
                "Unknown message type '{}' from connection '{}'; ignored",
                kind,
                connection_id
            );
            return Ok(());
        }
        Err(e) => return Err(GameError::InvalidInput(e.to_string())),
    };

    match message {
        ClientMessage::Join {
            room_code,
            participant,
        } => {
            let room_code = require_room_code(room_code)?;
            let participant = require_participant(participant)?;
            state
                .join_room_usecase
                .execute(connection_id, room_code, participant)
                .await?;
        }
        ClientMessage::Buzz {
            room_code,
            participant,
        } => {
            let room_code = require_room_code(room_code)?;
            let participant = require_participant(participant)?;
            state.buzz_usecase.execute(room_code, participant).await;
        }
        ClientMessage::StartQuestion { room_code } => {
            let room_code = require_room_code(room_code)?;
            state.start_question_usecase.execute(room_code).await?;
        }
        ClientMessage::GameStart { room_code } => {
            let room_code = require_room_code(room_code)?;
            state.game_start_usecase.execute(room_code).await?;
        }
        ClientMessage::UpdateScore {
            room_code,
            participant_id,
            score,
        } => {
            let room_code = require_room_code(room_code)?;
            let participant_id = participant_id.ok_or_else(|| {
                GameError::InvalidInput("participantId is required".to_string())
            })?;
            let participant_id = ParticipantId::new(participant_id)?;
            let score =
                score.ok_or_else(|| GameError::InvalidInput("score is required".to_string()))?;
            state
                .update_score_usecase
                .execute(room_code, participant_id, score)
                .await?;
        }
    }

    Ok(())
}

fn require_room_code(value: Option<String>) -> Result<RoomCode, GameError> {
    let value = value.ok_or_else(|| GameError::InvalidInput("roomCode is required".to_string()))?;
    Ok(RoomCode::new(value)?)
}

fn require_participant(value: Option<ParticipantInfo>) -> Result<Participant, GameError> {
    let value =
        value.ok_or_else(|| GameError::InvalidInput("participant is required".to_string()))?;
    Ok(Participant::try_from(value)?)
}
