//! UseCase: ルーム詳細取得

use std::sync::Arc;

use crate::domain::{Room, RoomCode, RoomRepository};

use super::error::RoomQueryError;

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    /// 新しい GetRoomDetailUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ルーム詳細を取得
    ///
    /// # Arguments
    ///
    /// * `room_code` - パスから受け取った生のルームコード
    ///
    /// # Returns
    ///
    /// * `Ok(Room)` - ルームのスナップショット
    /// * `Err(RoomQueryError::InvalidRoomCode)` - ルームコードが不正
    /// * `Err(RoomQueryError::RoomNotFound)` - ルームが存在しない
    pub async fn execute(&self, room_code: String) -> Result<Room, RoomQueryError> {
        let room_code = RoomCode::new(room_code)?;
        Ok(self.repository.get_room(&room_code).await?)
    }
}
