//! Server execution logic.

use std::sync::Arc;

use axum::{Router, http::HeaderValue, routing::get};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use super::{
    config::ServerConfig,
    handler::{get_room_detail, get_rooms, health_check, websocket_handler},
    signal::spawn_signal_listener,
    state::AppState,
    sweeper::spawn_sweeper,
};

pub type ServerError = Box<dyn std::error::Error + Send + Sync>;

/// Buzzer quiz room server
///
/// # Example
///
/// ```ignore
/// let server = bootstrap::build_server(ServerConfig::default(), Arc::new(SystemClock));
/// server.run().await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Token that stops the server (and every connection) when cancelled
    pub fn shutdown_token(&self) -> CancellationToken {
        self.state.shutdown.clone()
    }

    /// Bind to the configured host and port, and serve until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address or
    /// if there's an error during server execution.
    pub async fn run(self) -> Result<(), ServerError> {
        let bind_addr = format!("{}:{}", self.state.config.host, self.state.config.port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");
        spawn_signal_listener(self.shutdown_token());

        self.serve(listener).await
    }

    /// Serve on an already bound listener until the shutdown token is cancelled.
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        let shutdown = self.shutdown_token();
        let sweeper = spawn_sweeper(
            self.state.sweep_empty_rooms_usecase.clone(),
            self.state.config.cleanup_interval,
            shutdown.clone(),
        );
        let app = build_router(self.state);

        tracing::info!(
            "Hayaoshi room server listening on {}",
            listener.local_addr()?
        );

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown.clone().cancelled_owned())
            .await;

        // Stop the sweeper and every live connection even if serving failed
        shutdown.cancel();
        if let Err(e) = sweeper.await {
            tracing::warn!("Cleanup sweeper ended abnormally: {}", e);
        }
        result?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms))
        .route("/api/rooms/{room_code}", get(get_room_detail))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    if config.allowed_origins.is_empty() {
        return CorsLayer::new().allow_origin(Any).allow_methods(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid allowed origin '{}': {}", origin, e);
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
}
