//! Room server UI layer: HTTP/WebSocket endpoints, configuration and
//! background tasks.

pub mod config;
mod handler;
mod server;
mod signal;
pub mod state;
mod sweeper;

pub use config::ServerConfig;
pub use server::{Server, ServerError};
pub use state::AppState;
