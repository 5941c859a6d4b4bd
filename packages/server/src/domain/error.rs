//! Domain layer errors.

use thiserror::Error;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("room code must not be empty")]
    EmptyRoomCode,

    #[error("room code must be at most {0} characters")]
    RoomCodeTooLong(usize),

    #[error("participant id must not be empty")]
    EmptyParticipantId,

    #[error("participant id must be at most {0} characters")]
    ParticipantIdTooLong(usize),
}

/// Repository errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),
}

/// MessagePusher errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),

    #[error("failed to encode event: {0}")]
    Encode(String),
}
