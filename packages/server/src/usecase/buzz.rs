//! UseCase: 早押し
//!
//! 判定は Repository のロック内で `arbitrate` が行い、受理された場合だけ
//! `buzzed` を通知します。判定から通知までは直列化区間の中で行います。出題中でない場合やルームが存在しない場合は
//! エラーにせず黙って無視します。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - BuzzUseCase::execute() メソッド
//! - 1 問につき `buzzed` のブロードキャストが高々 1 回であること
//!
//! ### なぜこのテストが必要か
//! - 早押しの公平性はこのゲームの中心。2 回通知されると勝者が 2 人に見える
//!
//! ### どのような状況を想定しているか
//! - 正常系：出題中の最初の早押し
//! - エッジケース：同時に大量の早押し、出題前の早押し、存在しないルーム

use std::sync::Arc;

use crate::domain::{
    BuzzOutcome, MessagePusher, Participant, RepositoryError, RoomCode, RoomEvent,
    RoomRepository,
};

use super::sequencer::UpdateSequencer;

/// 早押しのユースケース
pub struct BuzzUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 状態変更と通知の直列化
    sequencer: UpdateSequencer,
}

impl BuzzUseCase {
    /// 新しい BuzzUseCase を作成
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

    /// 早押しを実行
    ///
    /// # Returns
    ///
    /// * `Some(BuzzOutcome)` - 判定結果（`Accepted` のときだけ通知済み）
    /// * `None` - ルームが存在しない
    pub async fn execute(
        &self,
        room_code: RoomCode,
        participant: Participant,
    ) -> Option<BuzzOutcome> {
        let participant_id = participant.id.clone();
        let _sequence = self.sequencer.enter().await;
        let outcome = match self.repository.buzz(&room_code, participant).await {
            Ok(outcome) => outcome,
            Err(RepositoryError::RoomNotFound(_)) => {
                tracing::debug!(
                    "Buzz from '{}' ignored: room '{}' not found",
                    participant_id,
                    room_code
                );
                return None;
            }
        };

        match &outcome {
            BuzzOutcome::Accepted(winner) => {
                tracing::info!("'{}' buzzed first in room '{}'", winner.id, room_code);
                let event = RoomEvent::Buzzed {
                    room_code,
                    player: winner.clone(),
                };
                if let Err(e) = self.message_pusher.broadcast(&event).await {
                    tracing::warn!("Failed to broadcast buzzed: {}", e);
                }
            }
            BuzzOutcome::QuestionInactive => {
                tracing::debug!(
                    "Buzz from '{}' ignored: no active question in room '{}'",
                    participant_id,
                    room_code
                );
            }
            BuzzOutcome::AlreadyTaken { winner } => {
                tracing::debug!(
                    "Buzz from '{}' ignored: '{}' already won in room '{}'",
                    participant_id,
                    winner,
                    room_code
                );
            }
        }

        Some(outcome)
    }
}
