//! Hayaoshi buzzer quiz room server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hayaoshi-server
//! cargo run --bin hayaoshi-server -- --host 0.0.0.0 --port 3000
//! PORT=3000 ALLOWED_ORIGINS=https://quiz.example cargo run --bin hayaoshi-server
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use hayaoshi_server::{
    bootstrap::build_server,
    ui::{ServerConfig, config::parse_origins},
};
use hayaoshi_shared::{
    logger::{LogFormat, setup_logger},
    time::SystemClock,
};

#[derive(Parser, Debug)]
#[command(name = "hayaoshi-server")]
#[command(about = "Room server for the Hayaoshi buzzer quiz", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "8080")]
    port: u16,

    /// Text messages accepted per connection per window
    #[arg(long, env = "RATE_LIMIT", default_value = "100")]
    rate_limit: u32,

    /// Rate-limit window in seconds
    #[arg(long, env = "RATE_LIMIT_WINDOW_SECS", default_value = "60")]
    rate_limit_window_secs: u64,

    /// Heartbeat probe interval in seconds
    #[arg(long, env = "HEARTBEAT_INTERVAL_SECS", default_value = "30")]
    heartbeat_interval_secs: u64,

    /// Empty-room sweep interval in seconds
    #[arg(long, env = "CLEANUP_INTERVAL_SECS", default_value = "300")]
    cleanup_interval_secs: u64,

    /// Comma separated list of allowed origins (empty allows any)
    #[arg(long, env = "ALLOWED_ORIGINS", default_value = "")]
    allowed_origins: String,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log output format (full or compact)
    #[arg(long, env = "LOG_FORMAT", default_value = "full")]
    log_format: LogFormat,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            rate_limit: args.rate_limit,
            rate_limit_window: Duration::from_secs(args.rate_limit_window_secs.max(1)),
            heartbeat_interval: Duration::from_secs(args.heartbeat_interval_secs.max(1)),
            cleanup_interval: Duration::from_secs(args.cleanup_interval_secs.max(1)),
            allowed_origins: parse_origins(&args.allowed_origins),
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_BIN_NAME"),
        &args.log_level,
        args.log_format,
    );

    let config = ServerConfig::from(args);
    tracing::debug!("Starting with {:?}", config);

    let server = build_server(config, Arc::new(SystemClock));
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
