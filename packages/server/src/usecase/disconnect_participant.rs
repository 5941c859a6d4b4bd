//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 切断時の退出処理（バインディングの解除、ルームからの削除、update の通知）
//!
//! ### なぜこのテストが必要か
//! - 切断した参加者が残りの参加者のリストから消えることを保証
//! - 最後の参加者が抜けてもルームは削除されない（削除は掃除のみ）ことを保証
//! - 置き換えられた接続の切断では退出処理が走らないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断と通知
//! - エッジケース：最後の参加者の切断、未参加の接続の切断
//! - 並行性：切断処理の途中に同じ参加者の再接続（join）が来るケース

use std::sync::Arc;

use crate::domain::{Binding, ConnectionId, MessagePusher, RoomEvent, RoomRepository};

use super::sequencer::UpdateSequencer;

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 状態変更と通知の直列化
    sequencer: UpdateSequencer,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
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

    /// 参加者切断を実行
    ///
    /// 接続を MessagePusher から外し、紐付いていた参加者をルームから退出させます。
    /// 接続ごとに 1 回だけ呼ばれる前提です。
    ///
    /// 登録解除・退出・通知は 1 つの直列化区間で行います。同じ参加者の再接続による
    /// join がこの間に割り込み、退出で新しい接続の参加者が消えることはありません。
    ///
    /// # Returns
    ///
    /// * `Some(Binding)` - 退出処理を行った参加者
    /// * `None` - 未参加、または別の接続に置き換えられていた
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<Binding> {
        let _sequence = self.sequencer.enter().await;
        let binding = self.message_pusher.unregister_client(connection_id).await?;

        let Some(players) = self
            .repository
            .leave(&binding.room_code, &binding.participant_id)
            .await
        else {
            tracing::debug!(
                "Room '{}' already removed; nothing to leave",
                binding.room_code
            );
            return Some(binding);
        };
        tracing::info!(
            "Participant '{}' left room '{}'",
            binding.participant_id,
            binding.room_code
        );

        let event = RoomEvent::Update {
            room_code: binding.room_code.clone(),
            players,
        };
        if let Err(e) = self.message_pusher.broadcast(&event).await {
            tracing::warn!("Failed to broadcast update: {}", e);
        }

        Some(binding)
    }
}
