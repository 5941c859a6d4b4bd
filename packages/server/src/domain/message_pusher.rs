//! MessagePusher trait 定義
//!
//! 接続中のクライアントへのメッセージ送信（通知）を抽象化します。
//! 接続とルーム・参加者の紐付け（バインディング）もここで管理します。
//! バインディングはルーム状態への逆参照であり、所有関係ではありません。

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{ConnectionId, MessagePushError, ParticipantId, RoomCode, RoomEvent};

/// Outbound channel of a single connection
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Everything fanout needs to reach (or close) a connection.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    pub sender: PusherChannel,
    /// Cancelling this token tears the connection down
    pub closer: CancellationToken,
}

/// The room/participant identity a connection is bound to after `join`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binding {
    pub room_code: RoomCode,
    pub participant_id: ParticipantId,
}

/// Result of binding a connection to an identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindOutcome {
    /// This connection's binding before the call, if any
    pub previous: Option<Binding>,
    /// Another connection that held the same identity and has been closed
    pub displaced: Option<ConnectionId>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録（まだどのルームにも紐付かない）
    async fn register_client(&self, connection_id: ConnectionId, handle: ConnectionHandle);

    /// 接続の登録を解除し、紐付いていたバインディングを返す
    ///
    /// 別の接続に ID を引き継がれて既に解除されている場合は `None`
    async fn unregister_client(&self, connection_id: &ConnectionId) -> Option<Binding>;

    /// 接続をルーム・参加者に紐付ける
    ///
    /// 同じバインディングを持つ別の接続があれば、その接続を閉じて置き換える（後勝ち）
    async fn bind(
        &self,
        connection_id: &ConnectionId,
        binding: Binding,
    ) -> Result<BindOutcome, MessagePushError>;

    /// 特定の接続にメッセージを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// イベントのルームに紐付いた全ての接続へ送信し、送信できた数を返す
    async fn broadcast(&self, event: &RoomEvent) -> Result<usize, MessagePushError>;
}
