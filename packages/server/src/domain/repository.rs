//! Repository trait 定義
//!
//! ドメイン層が必要とするルームレジストリへのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! 各メソッドは 1 回の呼び出しで完結するアトミックな操作です。
//! 「読んでから書く」複合操作（早押し判定など）も実装側の 1 つのロック範囲内で行われ、
//! 途中の状態が他の呼び出しから観測されることはありません。

use async_trait::async_trait;

use super::{
    BuzzOutcome, Participant, ParticipantId, RepositoryError, Room, RoomCode,
};

/// Result of a join: the target room's participant list plus every room the
/// participant was moved out of, with that room's remaining participants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    pub participants: Vec<Participant>,
    pub departed: Vec<(RoomCode, Vec<Participant>)>,
}

/// Room Repository trait (Room Registry)
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 参加者をルームに登録する（他のルームからは取り除く）
    ///
    /// ルームが存在しなければ WaitingRoom 状態で新規作成する
    async fn join(&self, room_code: RoomCode, participant: Participant) -> JoinOutcome;

    /// 以前の参加者 ID を取り除き、新しい参加者をルームに登録する
    ///
    /// 同じ接続が別の参加者として join し直したときに使う。取り除く処理と登録は
    /// 1 つのロック範囲内で行われ、どちらのルームにもいない瞬間は観測されない
    async fn join_replacing(
        &self,
        room_code: RoomCode,
        participant: Participant,
        previous: &ParticipantId,
    ) -> JoinOutcome;

    /// 参加者をルームから取り除く。ルームが空になっても削除しない
    ///
    /// ルームが存在しない場合は `None`、存在する場合は残りの参加者リスト
    async fn leave(
        &self,
        room_code: &RoomCode,
        participant_id: &ParticipantId,
    ) -> Option<Vec<Participant>>;

    /// 出題を開始する（QuestionActive へ遷移、早押し勝者をクリア）
    async fn start_question(&self, room_code: &RoomCode) -> Result<(), RepositoryError>;

    /// ゲームをリセットする（WaitingRoom へ遷移、早押し勝者をクリア）
    async fn game_start(&self, room_code: &RoomCode) -> Result<(), RepositoryError>;

    /// 早押しを判定する
    async fn buzz(
        &self,
        room_code: &RoomCode,
        participant: Participant,
    ) -> Result<BuzzOutcome, RepositoryError>;

    /// スコアを上書きする
    ///
    /// 参加者が存在しない場合は `Ok(None)`、更新した場合は参加者リスト
    async fn update_score(
        &self,
        room_code: &RoomCode,
        participant_id: &ParticipantId,
        score: i64,
    ) -> Result<Option<Vec<Participant>>, RepositoryError>;

    /// 参加者が 0 人のルームを全て削除し、削除したルームコードを返す
    async fn remove_empty_rooms(&self) -> Vec<RoomCode>;

    /// ルームのスナップショットを取得
    async fn get_room(&self, room_code: &RoomCode) -> Result<Room, RepositoryError>;

    /// 全ルームのスナップショットを取得（ルームコード順）
    async fn get_rooms(&self) -> Vec<Room>;
}
