//! UseCase 層のエラー定義
//!
//! ゲートウェイはこのエラーを `error` イベントとして発信元の接続にだけ返します。

use thiserror::Error;

use crate::domain::{DomainError, RepositoryError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// ルームコード・参加者の欠落や不正、JSON の不正
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// ルームがレジストリに存在しない
    #[error("Room not found: {0}")]
    RoomNotFound(String),

    /// 接続がすでに閉じられている（置き換え・切断と競合した場合）
    #[error("Connection '{0}' is closed")]
    ConnectionClosed(String),
}

impl From<DomainError> for GameError {
    fn from(e: DomainError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

impl From<RepositoryError> for GameError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::RoomNotFound(code) => Self::RoomNotFound(code),
        }
    }
}

/// 参照系（HTTP API）のユースケースのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomQueryError {
    /// パスのルームコードが不正
    #[error("Invalid room code: {0}")]
    InvalidRoomCode(#[from] DomainError),

    /// ルームがレジストリに存在しない
    #[error("Room not found: {0}")]
    RoomNotFound(String),
}

impl From<RepositoryError> for RoomQueryError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::RoomNotFound(code) => Self::RoomNotFound(code),
        }
    }
}
