//! 状態更新と通知の直列化
//!
//! ルームの状態を変更するユースケースは、Repository の更新からブロードキャストの
//! 送信キュー投入までを `UpdateSequencer::enter` のガードを保持したまま行います。
//! 各接続の送信キューに積まれるイベントの順序は、状態が変わった順序と一致します。
//!
//! ブロードキャストは接続ごとの unbounded チャネルへの送信だけなので、
//! ガードの保持中に遅いクライアントを待つことはありません。

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

/// 状態変更 + 通知を 1 つの単位として直列化するロック
#[derive(Debug, Clone, Default)]
pub struct UpdateSequencer {
    lock: Arc<Mutex<()>>,
}

impl UpdateSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 直列化区間に入る。ガードを drop すると次の更新が進む
    pub async fn enter(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}
