//! WebSocket connection handlers.
//!
//! Each connection runs two tasks:
//! - `pusher_loop`: outbound messages from the fanout plus the heartbeat probe
//! - `receiver_loop`: inbound frames, rate limiting and dispatch
//!
//! When either task finishes the other is aborted, the connection token is
//! cancelled and disconnect cleanup runs exactly once.

use std::{sync::Arc, time::Duration};

use axum::{
    body::Bytes,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::{
    sync::mpsc,
    time::{Instant, MissedTickBehavior},
};

use crate::{
    domain::{ConnectionHandle, ConnectionId},
    infrastructure::dto::websocket::ErrorMessage,
    ui::state::AppState,
    usecase::GameError,
};

use super::{connection::ConnectionContext, dispatch::dispatch};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, StatusCode> {
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok());
    if !state.config.is_origin_allowed(origin) {
        tracing::warn!(
            "Rejected WebSocket upgrade from origin '{}'",
            origin.unwrap_or_default()
        );
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();
    let closer = state.shutdown.child_token();
    let context = Arc::new(ConnectionContext::new(connection_id, closer.clone()));

    // Create a channel for this connection to receive broadcasts
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .connect_participant_usecase
        .execute(
            connection_id,
            ConnectionHandle {
                sender: tx,
                closer: closer.clone(),
            },
        )
        .await;

    let (sender, receiver) = socket.split();
    let mut send_task = pusher_loop(
        rx,
        sender,
        context.clone(),
        state.config.heartbeat_interval,
    );
    let mut recv_task = receiver_loop(receiver, context.clone(), state.clone());

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };
    closer.cancel();

    match state
        .disconnect_participant_usecase
        .execute(&connection_id)
        .await
    {
        Some(binding) => tracing::info!(
            "Connection '{}' closed; '{}' left room '{}'",
            connection_id,
            binding.participant_id,
            binding.room_code
        ),
        None => tracing::info!("Connection '{}' closed", connection_id),
    }
}

/// Spawns the outbound task.
///
/// Forwards fanout messages to the socket and probes liveness every
/// `heartbeat_interval`, starting one full interval after accept. On
/// cancellation (replacement or shutdown) it sends a close frame and exits.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
    context: Arc<ConnectionContext>,
    heartbeat_interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut heartbeat =
            tokio::time::interval_at(Instant::now() + heartbeat_interval, heartbeat_interval);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = context.closer().cancelled() => {
                    if let Err(e) = sender.send(Message::Close(None)).await {
                        tracing::debug!("Failed to send close to '{}': {}", context.id(), e);
                    }
                    break;
                }
                msg = rx.recv() => {
                    let Some(msg) = msg else { break };
                    if sender.send(Message::Text(msg.into())).await.is_err() {
                        break;
                    }
                }
                _ = heartbeat.tick() => {
                    if !context.probe() {
                        tracing::info!(
                            "Connection '{}' missed heartbeat; terminating",
                            context.id()
                        );
                        break;
                    }
                    if sender.send(Message::Ping(Bytes::new())).await.is_err() {
                        break;
                    }
                }
            }
        }
    })
}

/// Spawns the inbound task.
///
/// Every frame marks the connection alive. Text frames count against the
/// rate limit; those over the limit are dropped without a reply.
fn receiver_loop(
    mut receiver: SplitStream<WebSocket>,
    context: Arc<ConnectionContext>,
    state: Arc<AppState>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let connection_id = context.id();
        let window = state.config.rate_limit_window;
        let mut window_reset = tokio::time::interval_at(Instant::now() + window, window);
        window_reset.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let msg = tokio::select! {
                msg = receiver.next() => msg,
                _ = window_reset.tick() => {
                    context.reset_window();
                    continue;
                }
            };
            let msg = match msg {
                Some(Ok(msg)) => msg,
                Some(Err(e)) => {
                    tracing::error!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
                None => break,
            };
            context.mark_alive();

            match msg {
                Message::Text(text) => {
                    if !context.record_message(state.config.rate_limit) {
                        tracing::debug!(
                            "Rate limit exceeded on '{}'; message dropped",
                            connection_id
                        );
                        continue;
                    }
                    tracing::debug!("Received from '{}': {}", connection_id, text);

                    if let Err(e) = dispatch(&state, &connection_id, text.as_str()).await {
                        tracing::warn!("Request from '{}' failed: {}", connection_id, e);
                        report_error(&state, &connection_id, &e).await;
                    }
                }
                Message::Binary(_) => {
                    tracing::debug!("Ignored binary frame from '{}'", connection_id);
                }
                Message::Ping(_) | Message::Pong(_) => {}
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
            }
        }
    })
}

/// Send an `error` event to the originating connection only.
async fn report_error(state: &AppState, connection_id: &ConnectionId, error: &GameError) {
    let message = match serde_json::to_string(&ErrorMessage::new(error.to_string())) {
        Ok(message) => message,
        Err(e) => {
            tracing::error!("Failed to encode error message: {}", e);
            return;
        }
    };
    if let Err(e) = state
        .connect_participant_usecase
        .reply(connection_id, &message)
        .await
    {
        tracing::debug!("Failed to report error to '{}': {}", connection_id, e);
    }
}
