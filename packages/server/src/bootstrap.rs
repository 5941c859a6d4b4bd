//! Dependency wiring.

use std::sync::Arc;

use hayaoshi_shared::time::Clock;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{MessagePusher, RoomRepository},
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::{AppState, Server, ServerConfig},
    usecase::{
        BuzzUseCase, ConnectParticipantUseCase, DisconnectParticipantUseCase, GameStartUseCase,
        GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase, StartQuestionUseCase,
        SweepEmptyRoomsUseCase, UpdateScoreUseCase, UpdateSequencer,
    },
};

/// Build a server backed by the in-memory registry and the WebSocket fanout.
///
/// Initialize dependencies in order:
/// 1. Repository
/// 2. MessagePusher
/// 3. UseCases (AppState)
/// 4. Server
pub fn build_server(config: ServerConfig, clock: Arc<dyn Clock>) -> Server {
    // 1. Create Repository (in-memory room registry)
    let repository = Arc::new(InMemoryRoomRepository::new(clock));

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create UseCases
    let state = build_app_state(repository, message_pusher, config);

    // 4. Create the server
    Server::new(state)
}

/// Create every usecase over the given ports.
///
/// Every usecase that changes room state shares one `UpdateSequencer`, so
/// events reach each connection in the order the state changed.
pub fn build_app_state(
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    config: ServerConfig,
) -> AppState {
    let sequencer = UpdateSequencer::new();

    AppState {
        connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
            message_pusher.clone(),
        )),
        disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            sequencer.clone(),
        )),
        join_room_usecase: Arc::new(JoinRoomUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            sequencer.clone(),
        )),
        start_question_usecase: Arc::new(StartQuestionUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            sequencer.clone(),
        )),
        game_start_usecase: Arc::new(GameStartUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            sequencer.clone(),
        )),
        buzz_usecase: Arc::new(BuzzUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            sequencer.clone(),
        )),
        update_score_usecase: Arc::new(UpdateScoreUseCase::new(
            repository.clone(),
            message_pusher,
            sequencer,
        )),
        sweep_empty_rooms_usecase: Arc::new(SweepEmptyRoomsUseCase::new(repository.clone())),
        get_rooms_usecase: Arc::new(GetRoomsUseCase::new(repository.clone())),
        get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(repository)),
        config,
        shutdown: CancellationToken::new(),
    }
}
