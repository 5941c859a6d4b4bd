//! UseCase: 空ルームの掃除
//!
//! 参加者が 0 人のルームだけを削除します。退出時にはルームを削除しないため、
//! ルームが消えるのはこの掃除のときだけです。

use std::sync::Arc;

use crate::domain::{RoomCode, RoomRepository};

/// 空ルーム掃除のユースケース
pub struct SweepEmptyRoomsUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl SweepEmptyRoomsUseCase {
    /// 新しい SweepEmptyRoomsUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 掃除を実行し、削除したルームコードを返す
    pub async fn execute(&self) -> Vec<RoomCode> {
        let removed = self.repository.remove_empty_rooms().await;
        for room_code in &removed {
            tracing::info!("Room '{}' removed (no participants)", room_code);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Participant, ParticipantId},
        infrastructure::repository::InMemoryRoomRepository,
    };
    use hayaoshi_shared::time::FixedClock;

    fn code(value: &str) -> RoomCode {
        RoomCode::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_sweep_removes_only_empty_rooms() {
        // テスト項目: 参加者が 0 人のルームだけが削除される
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new(Arc::new(FixedClock::new(0))));
        let p1 = Participant::new(ParticipantId::new("p1".to_string()).unwrap(), "A".to_string());
        let p2 = Participant::new(ParticipantId::new("p2".to_string()).unwrap(), "B".to_string());
        repository.join(code("FULL"), p1).await;
        repository.join(code("GONE"), p2.clone()).await;
        repository.leave(&code("GONE"), &p2.id).await;
        let p3 = Participant::new(ParticipantId::new("p3".to_string()).unwrap(), "C".to_string());
        repository.join(code("IDLE"), p3.clone()).await;
        repository.leave(&code("IDLE"), &p3.id).await;
        let usecase = SweepEmptyRoomsUseCase::new(repository.clone());

        // when (操作):
        let removed = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(removed, vec![code("GONE"), code("IDLE")]);
        let remaining: Vec<RoomCode> = repository
            .get_rooms()
            .await
            .iter()
            .map(|room| room.code().clone())
            .collect();
        assert_eq!(remaining, vec![code("FULL")]);
    }

    #[tokio::test]
    async fn test_join_after_sweep_creates_fresh_room() {
        // テスト項目: 掃除されたルームコードへの join では新しいルームが作られる
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new(Arc::new(FixedClock::new(0))));
        let p1 = Participant::new(ParticipantId::new("p1".to_string()).unwrap(), "A".to_string());
        repository.join(code("ABCD"), p1.clone()).await;
        repository.start_question(&code("ABCD")).await.unwrap();
        repository.leave(&code("ABCD"), &p1.id).await;
        let usecase = SweepEmptyRoomsUseCase::new(repository.clone());
        usecase.execute().await;

        // when (操作):
        repository.join(code("ABCD"), p1).await;

        // then (期待する結果):
        let room = repository.get_room(&code("ABCD")).await.unwrap();
        assert!(!room.question_active());
        assert_eq!(room.participant_count(), 1);
    }
}
