//! UseCase: 接続の受け入れ
//!
//! 接続時点ではルームにも参加者にも紐付けません。紐付けは最初の `join` で行われます。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() / reply() メソッド
//!
//! ### なぜこのテストが必要か
//! - 接続直後はどのルームのブロードキャストも受け取らないことを保証
//! - エラー応答が発信元の接続にだけ届くことを保証

use std::sync::Arc;

use crate::domain::{ConnectionHandle, ConnectionId, MessagePushError, MessagePusher};

/// 接続受け入れのユースケース
pub struct ConnectParticipantUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 接続を MessagePusher に登録する
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 新しい接続の ID
    /// * `handle` - 送信用チャンネルと切断用トークン
    pub async fn execute(&self, connection_id: ConnectionId, handle: ConnectionHandle) {
        self.message_pusher
            .register_client(connection_id, handle)
            .await;
        tracing::info!("Connection '{}' accepted", connection_id);
    }

    /// 発信元の接続にだけメッセージ（JSON）を返す
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 送信成功
    /// * `Err(MessagePushError)` - 接続が既に閉じている
    pub async fn reply(
        &self,
        connection_id: &ConnectionId,
        message: &str,
    ) -> Result<(), MessagePushError> {
        self.message_pusher.push_to(connection_id, message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{RoomCode, RoomEvent},
        infrastructure::message_pusher::WebSocketMessagePusher,
    };
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn test_connect_registers_unbound_connection() {
        // テスト項目: 接続直後の接続はどのルームのブロードキャストも受け取らない
        // given (前提条件):
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = ConnectParticipantUseCase::new(message_pusher.clone());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let connection_id = ConnectionId::generate();

        // when (操作):
        usecase
            .execute(
                connection_id,
                ConnectionHandle {
                    sender: tx,
                    closer: CancellationToken::new(),
                },
            )
            .await;
        let delivered = message_pusher
            .broadcast(&RoomEvent::QuestionStart {
                room_code: RoomCode::new("ABCD".to_string()).unwrap(),
            })
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(message_pusher.connection_count().await, 1);
        assert_eq!(delivered, 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_reply_reaches_only_origin() {
        // テスト項目: reply は指定した接続にだけ届く
        // given (前提条件):
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = ConnectParticipantUseCase::new(message_pusher.clone());
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let origin = ConnectionId::generate();
        let other = ConnectionId::generate();
        for (id, tx) in [(origin, tx1), (other, tx2)] {
            usecase
                .execute(
                    id,
                    ConnectionHandle {
                        sender: tx,
                        closer: CancellationToken::new(),
                    },
                )
                .await;
        }

        // when (操作):
        let result = usecase.reply(&origin, r#"{"type":"error"}"#).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx1.recv().await, Some(r#"{"type":"error"}"#.to_string()));
        assert!(rx2.try_recv().is_err());
    }
}
