//! UseCase: 出題開始
//!
//! ルームを QuestionActive にして早押しの勝者をクリアし、`questionStart` を通知します。
//! 状態変更から通知までを直列化区間の中で行うため、同じルームの `buzzed` が
//! `questionStart` より先に届くことはありません。

use std::sync::Arc;

use crate::domain::{MessagePusher, RoomCode, RoomEvent, RoomRepository};

use super::{error::GameError, sequencer::UpdateSequencer};

/// 出題開始のユースケース
pub struct StartQuestionUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 状態変更と通知の直列化
    sequencer: UpdateSequencer,
}

impl StartQuestionUseCase {
    /// 新しい StartQuestionUseCase を作成
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

    /// 出題開始を実行
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 状態遷移とブロードキャスト完了
    /// * `Err(GameError::RoomNotFound)` - ルームが存在しない
    pub async fn execute(&self, room_code: RoomCode) -> Result<(), GameError> {
        let _sequence = self.sequencer.enter().await;
        self.repository.start_question(&room_code).await?;
        tracing::info!("Question started in room '{}'", room_code);

        let event = RoomEvent::QuestionStart { room_code };
        if let Err(e) = self.message_pusher.broadcast(&event).await {
            tracing::warn!("Failed to broadcast questionStart: {}", e);
        }
        Ok(())
    }
}
