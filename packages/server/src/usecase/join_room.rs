//! UseCase: ルームへの参加
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 接続の紐付け、ルームへの追加、update のブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 参加者が常に 1 つのルームにしか存在しないことを保証
//! - 同じ参加者の再接続で古い接続が閉じられ、退出処理が走らないことを保証
//! - 別の参加者として join し直したときに以前のルームへ update が届くことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規参加、複数人の参加
//! - エッジケース：同じ接続での再 join、別ルームへの移動、再接続による置き換え

use std::sync::Arc;

use crate::domain::{
    Binding, ConnectionId, MessagePusher, Participant, RoomCode, RoomEvent, RoomRepository,
};

use super::{error::GameError, sequencer::UpdateSequencer};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 状態変更と通知の直列化
    sequencer: UpdateSequencer,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
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

    /// ルーム参加を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - join を送ってきた接続
    /// * `room_code` - 参加先のルーム（存在しなければ作成される）
    /// * `participant` - 参加者
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Participant>)` - 参加後のルームの参加者リスト（ID 順）
    /// * `Err(GameError::ConnectionClosed)` - 接続が既に閉じられていた
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_code: RoomCode,
        participant: Participant,
    ) -> Result<Vec<Participant>, GameError> {
        let binding = Binding {
            room_code: room_code.clone(),
            participant_id: participant.id.clone(),
        };
        let _sequence = self.sequencer.enter().await;

        // 1. 接続を紐付ける（同じ参加者の古い接続はここで閉じられる）
        let outcome = self
            .message_pusher
            .bind(connection_id, binding)
            .await
            .map_err(|_| GameError::ConnectionClosed(connection_id.to_string()))?;

        // 2. Repository に参加者を追加
        //    別の参加者として join し直した場合は、以前の参加者の退出も同じ操作で行う
        //    （同じ参加者のルーム移動は Repository の join が処理する）
        let participant_id = participant.id.clone();
        let replaced = outcome
            .previous
            .map(|previous| previous.participant_id)
            .filter(|previous| previous != &participant_id);
        let joined = match &replaced {
            Some(previous) => {
                self.repository
                    .join_replacing(room_code.clone(), participant, previous)
                    .await
            }
            None => self.repository.join(room_code.clone(), participant).await,
        };
        if let Some(previous) = &replaced {
            tracing::info!(
                "Participant '{}' left by re-joining as '{}'",
                previous,
                participant_id
            );
        }
        tracing::info!(
            "Participant '{}' joined room '{}' ({} participant(s))",
            participant_id,
            room_code,
            joined.participants.len()
        );

        // 3. 参加者が抜けたルームと参加先のルームに update を通知
        for (departed_code, players) in joined.departed {
            self.broadcast(RoomEvent::Update {
                room_code: departed_code,
                players,
            })
            .await;
        }
        self.broadcast(RoomEvent::Update {
            room_code,
            players: joined.participants.clone(),
        })
        .await;

        Ok(joined.participants)
    }

    async fn broadcast(&self, event: RoomEvent) {
        if let Err(e) = self.message_pusher.broadcast(&event).await {
            tracing::warn!("Failed to broadcast update: {}", e);
        }
    }
}
