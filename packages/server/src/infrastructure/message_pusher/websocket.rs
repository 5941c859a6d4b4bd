//! WebSocket を使った MessagePusher 実装（ブロードキャスト・ファンアウト）
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` と切断用トークンを管理
//! - 接続とルーム・参加者のバインディングを管理
//! - クライアントへのメッセージ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された sender を受け取り、メッセージ送信に使用します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{
        BindOutcome, Binding, ConnectionHandle, ConnectionId, MessagePushError, MessagePusher,
        RoomEvent,
    },
    infrastructure::dto::websocket::encode_room_event,
};

/// A registered connection and its current binding.
struct ConnectedClient {
    handle: ConnectionHandle,
    binding: Option<Binding>,
}

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new();
/// pusher.register_client(connection_id, handle).await;
/// pusher.bind(&connection_id, binding).await?;
/// pusher.broadcast(&RoomEvent::QuestionStart { room_code }).await?;
/// ```
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// Key: connection id, Value: sender と現在のバインディング
    clients: Mutex<HashMap<ConnectionId, ConnectedClient>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 登録中の接続数
    pub async fn connection_count(&self) -> usize {
        self.clients.lock().await.len()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, handle: ConnectionHandle) {
        let mut clients = self.clients.lock().await;
        clients.insert(
            connection_id,
            ConnectedClient {
                handle,
                binding: None,
            },
        );
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) -> Option<Binding> {
        let mut clients = self.clients.lock().await;
        let removed = clients.remove(connection_id)?;
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id
        );
        removed.binding
    }

    async fn bind(
        &self,
        connection_id: &ConnectionId,
        binding: Binding,
    ) -> Result<BindOutcome, MessagePushError> {
        let mut clients = self.clients.lock().await;
        if !clients.contains_key(connection_id) {
            return Err(MessagePushError::ClientNotFound(connection_id.to_string()));
        }

        // Last writer wins on identity: close whoever held it before
        let displaced = clients
            .iter()
            .find(|(id, client)| {
                *id != connection_id && client.binding.as_ref() == Some(&binding)
            })
            .map(|(id, _)| *id);
        if let Some(old_id) = displaced
            && let Some(old) = clients.remove(&old_id)
        {
            old.handle.closer.cancel();
            tracing::info!(
                "Connection '{}' replaced by '{}' for participant '{}' in room '{}'",
                old_id,
                connection_id,
                binding.participant_id,
                binding.room_code
            );
        }

        let Some(client) = clients.get_mut(connection_id) else {
            return Err(MessagePushError::ClientNotFound(connection_id.to_string()));
        };
        let previous = client.binding.replace(binding);

        Ok(BindOutcome {
            previous,
            displaced,
        })
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        if let Some(client) = clients.get(connection_id) {
            client
                .handle
                .sender
                .send(content.to_string())
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed message to connection '{}'", connection_id);
            Ok(())
        } else {
            Err(MessagePushError::ClientNotFound(connection_id.to_string()))
        }
    }

    async fn broadcast(&self, event: &RoomEvent) -> Result<usize, MessagePushError> {
        let content =
            encode_room_event(event).map_err(|e| MessagePushError::Encode(e.to_string()))?;
        let room_code = event.room_code();
        let clients = self.clients.lock().await;

        let mut delivered = 0;
        for (id, client) in clients.iter() {
            let bound_here = client
                .binding
                .as_ref()
                .is_some_and(|binding| &binding.room_code == room_code);
            if !bound_here {
                continue;
            }
            // ブロードキャストでは一部の送信失敗を許容
            if let Err(e) = client.handle.sender.send(content.clone()) {
                tracing::warn!("Failed to push message to connection '{}': {}", id, e);
            } else {
                delivered += 1;
            }
        }
        tracing::debug!(
            "Broadcasted event to {} connection(s) in room '{}'",
            delivered,
            room_code
        );

        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Participant, ParticipantId, RoomCode};
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - broadcast: 同じルームに紐付いた接続にだけ届くこと
    // - bind: 同一 ID の再接続で古い接続が閉じられること（後勝ち）
    // - unregister_client: バインディングが返ること
    // ========================================

    fn code(value: &str) -> RoomCode {
        RoomCode::new(value.to_string()).unwrap()
    }

    fn binding(room: &str, participant: &str) -> Binding {
        Binding {
            room_code: code(room),
            participant_id: ParticipantId::new(participant.to_string()).unwrap(),
        }
    }

    async fn register(
        pusher: &WebSocketMessagePusher,
    ) -> (
        ConnectionId,
        mpsc::UnboundedReceiver<String>,
        CancellationToken,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let closer = CancellationToken::new();
        let id = ConnectionId::generate();
        pusher
            .register_client(
                id,
                ConnectionHandle {
                    sender: tx,
                    closer: closer.clone(),
                },
            )
            .await;
        (id, rx, closer)
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続にメッセージを送信できる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (id, mut rx, _closer) = register(&pusher).await;

        // when (操作):
        let result = pusher.push_to(&id, "Hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 存在しない接続への送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher.push_to(&ConnectionId::generate(), "Hello").await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
    }

    #[tokio::test]
    async fn test_broadcast_reaches_only_bound_room() {
        // テスト項目: ブロードキャストは同じルームに紐付いた接続にだけ届く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (alice, mut alice_rx, _a) = register(&pusher).await;
        let (bob, mut bob_rx, _b) = register(&pusher).await;
        let (_unbound, mut unbound_rx, _u) = register(&pusher).await;
        pusher.bind(&alice, binding("ABCD", "alice")).await.unwrap();
        pusher.bind(&bob, binding("WXYZ", "bob")).await.unwrap();

        // when (操作):
        let delivered = pusher
            .broadcast(&RoomEvent::QuestionStart {
                room_code: code("ABCD"),
            })
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(delivered, 1);
        let received = alice_rx.recv().await.unwrap();
        assert!(received.contains("\"questionStart\""));
        assert!(bob_rx.try_recv().is_err());
        assert!(unbound_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_skips_closed_connection() {
        // テスト項目: 受信側が閉じた接続はスキップされ、エラーにならない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (alice, alice_rx, _a) = register(&pusher).await;
        let (bob, mut bob_rx, _b) = register(&pusher).await;
        pusher.bind(&alice, binding("ABCD", "alice")).await.unwrap();
        pusher.bind(&bob, binding("ABCD", "bob")).await.unwrap();
        drop(alice_rx);

        // when (操作):
        let result = pusher
            .broadcast(&RoomEvent::Buzzed {
                room_code: code("ABCD"),
                player: Participant::new(
                    ParticipantId::new("bob".to_string()).unwrap(),
                    "Bob".to_string(),
                ),
            })
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(1));
        assert!(bob_rx.recv().await.unwrap().contains("\"buzzed\""));
    }

    #[tokio::test]
    async fn test_bind_replaces_previous_connection_with_same_identity() {
        // テスト項目: 同じルーム・参加者で再接続すると古い接続が閉じられる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (old, _old_rx, old_closer) = register(&pusher).await;
        let (new, _new_rx, new_closer) = register(&pusher).await;
        pusher.bind(&old, binding("ABCD", "alice")).await.unwrap();

        // when (操作):
        let outcome = pusher.bind(&new, binding("ABCD", "alice")).await.unwrap();

        // then (期待する結果):
        assert_eq!(outcome.displaced, Some(old));
        assert_eq!(outcome.previous, None);
        assert!(old_closer.is_cancelled());
        assert!(!new_closer.is_cancelled());
        // 置き換えられた接続の登録解除では退出処理が走らない
        assert_eq!(pusher.unregister_client(&old).await, None);
        assert_eq!(pusher.connection_count().await, 1);
    }

    #[tokio::test]
    async fn test_bind_returns_previous_binding() {
        // テスト項目: 同じ接続で別のルームに参加すると以前のバインディングが返る
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (id, _rx, _closer) = register(&pusher).await;
        pusher.bind(&id, binding("AAAA", "alice")).await.unwrap();

        // when (操作):
        let outcome = pusher.bind(&id, binding("BBBB", "alice")).await.unwrap();

        // then (期待する結果):
        assert_eq!(outcome.previous, Some(binding("AAAA", "alice")));
        assert_eq!(outcome.displaced, None);
    }

    #[tokio::test]
    async fn test_bind_unknown_connection() {
        // テスト項目: 登録されていない接続の紐付けはエラーになる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher
            .bind(&ConnectionId::generate(), binding("ABCD", "alice"))
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
    }

    #[tokio::test]
    async fn test_unregister_returns_binding() {
        // テスト項目: 登録解除すると紐付いていたバインディングが返る
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (id, _rx, _closer) = register(&pusher).await;
        pusher.bind(&id, binding("ABCD", "alice")).await.unwrap();

        // when (操作):
        let first = pusher.unregister_client(&id).await;
        let second = pusher.unregister_client(&id).await;

        // then (期待する結果):
        assert_eq!(first, Some(binding("ABCD", "alice")));
        assert_eq!(second, None);
    }
}
