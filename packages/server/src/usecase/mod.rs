//! UseCase 層
//!
//! 1 ファイル 1 ユースケース。各ユースケースは `RoomRepository` と `MessagePusher`
//! の trait オブジェクトに依存します。状態を変更するユースケースは
//! `UpdateSequencer` のガードを保持したまま、状態変更とブロードキャストを行います。

mod buzz;
mod connect_participant;
mod disconnect_participant;
mod error;
mod game_start;
mod get_room_detail;
mod get_rooms;
mod join_room;
mod sequencer;
mod start_question;
mod sweep_empty_rooms;
mod update_score;

pub use buzz::BuzzUseCase;
pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{GameError, RoomQueryError};
pub use game_start::GameStartUseCase;
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::JoinRoomUseCase;
pub use sequencer::UpdateSequencer;
pub use start_question::StartQuestionUseCase;
pub use sweep_empty_rooms::SweepEmptyRoomsUseCase;
pub use update_score::UpdateScoreUseCase;
