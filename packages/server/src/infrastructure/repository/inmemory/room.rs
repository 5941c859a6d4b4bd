//! InMemory Room Repository 実装（ルームレジストリ）
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! プロセス全体で 1 つの `Mutex<HashMap<RoomCode, Room>>` を持ち、
//! 全ての状態遷移をこのロックの中で完結させます。
//! ロックを保持したまま `.await` することはありません。

use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};

use async_trait::async_trait;
use hayaoshi_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{
    BuzzOutcome, JoinOutcome, Participant, ParticipantId, RepositoryError, Room, RoomCode,
    RoomRepository, Timestamp, arbitrate,
};

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    /// ルームコード → ルーム状態
    rooms: Mutex<HashMap<RoomCode, Room>>,
    /// ルーム作成時刻の取得に使う時計
    clock: Arc<dyn Clock>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// 既存のルームを返す。存在しなければ WaitingRoom 状態で新規作成して登録する
    fn get_or_create<'a>(
        &self,
        rooms: &'a mut HashMap<RoomCode, Room>,
        room_code: RoomCode,
    ) -> &'a mut Room {
        rooms.entry(room_code).or_insert_with_key(|code| {
            tracing::info!("Room '{}' created", code);
            Room::new(code.clone(), Timestamp::new(self.clock.now_millis()))
        })
    }

    fn join_locked(
        &self,
        rooms: &mut HashMap<RoomCode, Room>,
        room_code: RoomCode,
        participant: Participant,
        previous: Option<&ParticipantId>,
    ) -> JoinOutcome {
        // A participant lives in at most one room at a time
        let mut touched = BTreeSet::new();
        for (code, room) in rooms.iter_mut() {
            if code != &room_code && room.remove_participant(&participant.id).is_some() {
                tracing::debug!(
                    "Participant '{}' moved out of room '{}'",
                    participant.id,
                    code
                );
                touched.insert(code.clone());
            }
            if let Some(previous) = previous
                && previous != &participant.id
                && room.remove_participant(previous).is_some()
            {
                tracing::debug!("Participant '{}' replaced in room '{}'", previous, code);
                touched.insert(code.clone());
            }
        }

        let departed = touched
            .into_iter()
            .filter(|code| code != &room_code)
            .filter_map(|code| {
                let players = rooms.get(&code)?.participant_list();
                Some((code, players))
            })
            .collect();

        let room = self.get_or_create(rooms, room_code);
        room.upsert_participant(participant);

        JoinOutcome {
            participants: room.participant_list(),
            departed,
        }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn join(&self, room_code: RoomCode, participant: Participant) -> JoinOutcome {
        let mut rooms = self.rooms.lock().await;
        self.join_locked(&mut rooms, room_code, participant, None)
    }

    async fn join_replacing(
        &self,
        room_code: RoomCode,
        participant: Participant,
        previous: &ParticipantId,
    ) -> JoinOutcome {
        let mut rooms = self.rooms.lock().await;
        self.join_locked(&mut rooms, room_code, participant, Some(previous))
    }

    async fn leave(
        &self,
        room_code: &RoomCode,
        participant_id: &ParticipantId,
    ) -> Option<Vec<Participant>> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(room_code)?;
        room.remove_participant(participant_id);
        Some(room.participant_list())
    }

    async fn start_question(&self, room_code: &RoomCode) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(room_code)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_code.to_string()))?;
        room.start_question();
        Ok(())
    }

    async fn game_start(&self, room_code: &RoomCode) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(room_code)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_code.to_string()))?;
        room.game_start();
        Ok(())
    }

    async fn buzz(
        &self,
        room_code: &RoomCode,
        participant: Participant,
    ) -> Result<BuzzOutcome, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(room_code)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_code.to_string()))?;
        Ok(arbitrate(room, participant))
    }

    async fn update_score(
        &self,
        room_code: &RoomCode,
        participant_id: &ParticipantId,
        score: i64,
    ) -> Result<Option<Vec<Participant>>, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(room_code)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_code.to_string()))?;
        if room.update_score(participant_id, score) {
            Ok(Some(room.participant_list()))
        } else {
            Ok(None)
        }
    }

    async fn remove_empty_rooms(&self) -> Vec<RoomCode> {
        let mut rooms = self.rooms.lock().await;
        let mut removed: Vec<RoomCode> = rooms
            .iter()
            .filter(|(_, room)| room.is_empty())
            .map(|(code, _)| code.clone())
            .collect();
        for code in &removed {
            rooms.remove(code);
        }
        removed.sort();
        removed
    }

    async fn get_room(&self, room_code: &RoomCode) -> Result<Room, RepositoryError> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_code)
            .cloned()
            .ok_or_else(|| RepositoryError::RoomNotFound(room_code.to_string()))
    }

    async fn get_rooms(&self) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        let mut snapshot: Vec<Room> = rooms.values().cloned().collect();
        snapshot.sort_by(|a, b| a.code().cmp(b.code()));
        snapshot
    }
}
