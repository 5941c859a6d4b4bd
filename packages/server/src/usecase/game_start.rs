//! UseCase: ゲーム開始（待機状態へのリセット）
//!
//! ルームを WaitingRoom に戻して早押しの勝者をクリアし、`gameStart` を通知します。

use std::sync::Arc;

use crate::domain::{MessagePusher, RoomCode, RoomEvent, RoomRepository};

use super::{error::GameError, sequencer::UpdateSequencer};

/// ゲーム開始のユースケース
pub struct GameStartUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 状態変更と通知の直列化
    sequencer: UpdateSequencer,
}

impl GameStartUseCase {
    /// 新しい GameStartUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        sequencer: UpdateSequencer,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            sequencer,
        }
    }

    /// ゲーム開始を実行
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 状態遷移とブロードキャスト完了
    /// * `Err(GameError::RoomNotFound)` - ルームが存在しない
    pub async fn execute(&self, room_code: RoomCode) -> Result<(), GameError> {
        let _sequence = self.sequencer.enter().await;
        self.repository.game_start(&room_code).await?;
        tracing::info!("Game started in room '{}'", room_code);

        let event = RoomEvent::GameStart { room_code };
        if let Err(e) = self.message_pusher.broadcast(&event).await {
            tracing::warn!("Failed to broadcast gameStart: {}", e);
        }
        Ok(())
    }
}
