//! UseCase: スコア更新
//!
//! スコアは上書き。参加者がルームにいない場合は何もしません。

use std::sync::Arc;

use crate::domain::{MessagePusher, ParticipantId, RoomCode, RoomEvent, RoomRepository};

use super::{error::GameError, sequencer::UpdateSequencer};

/// スコア更新のユースケース
pub struct UpdateScoreUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 状態変更と通知の直列化
    sequencer: UpdateSequencer,
}

impl UpdateScoreUseCase {
    /// 新しい UpdateScoreUseCase を作成
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

    /// スコア更新を実行
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 更新して `scoreUpdate` を通知した
    /// * `Ok(false)` - 参加者がルームにいなかった（何もしない）
    /// * `Err(GameError::RoomNotFound)` - ルームが存在しない
    pub async fn execute(
        &self,
        room_code: RoomCode,
        participant_id: ParticipantId,
        score: i64,
    ) -> Result<bool, GameError> {
        let _sequence = self.sequencer.enter().await;
        let Some(players) = self
            .repository
            .update_score(&room_code, &participant_id, score)
            .await?
        else {
            tracing::debug!(
                "Score update ignored: '{}' is not in room '{}'",
                participant_id,
                room_code
            );
            return Ok(false);
        };
        tracing::info!(
            "Score of '{}' in room '{}' set to {}",
            participant_id,
            room_code,
            score
        );

        let event = RoomEvent::ScoreUpdate { room_code, players };
        if let Err(e) = self.message_pusher.broadcast(&event).await {
            tracing::warn!("Failed to broadcast scoreUpdate: {}", e);
        }
        Ok(true)
    }
}
