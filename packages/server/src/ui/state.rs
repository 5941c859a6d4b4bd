//! Shared application state.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::usecase::{
    BuzzUseCase, ConnectParticipantUseCase, DisconnectParticipantUseCase, GameStartUseCase,
    GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase, StartQuestionUseCase,
    SweepEmptyRoomsUseCase, UpdateScoreUseCase,
};

use super::config::ServerConfig;

/// Shared application state
pub struct AppState {
    /// ConnectParticipantUseCase（接続受け入れ・エラー応答のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// JoinRoomUseCase（ルーム参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// StartQuestionUseCase（出題開始のユースケース）
    pub start_question_usecase: Arc<StartQuestionUseCase>,
    /// GameStartUseCase（ゲーム開始のユースケース）
    pub game_start_usecase: Arc<GameStartUseCase>,
    /// BuzzUseCase（早押しのユースケース）
    pub buzz_usecase: Arc<BuzzUseCase>,
    /// UpdateScoreUseCase（スコア更新のユースケース）
    pub update_score_usecase: Arc<UpdateScoreUseCase>,
    /// SweepEmptyRoomsUseCase（空ルーム掃除のユースケース）
    pub sweep_empty_rooms_usecase: Arc<SweepEmptyRoomsUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    pub config: ServerConfig,
    /// Process shutdown token; every connection token is a child of it
    pub shutdown: CancellationToken,
}
