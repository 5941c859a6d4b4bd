//! Per-connection liveness and rate-limit bookkeeping.
//!
//! Shared by `Arc` between a connection's inbound and outbound tasks.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use tokio_util::sync::CancellationToken;

use crate::domain::ConnectionId;

#[derive(Debug)]
pub struct ConnectionContext {
    id: ConnectionId,
    /// Set by any inbound frame, cleared by each heartbeat probe
    alive: AtomicBool,
    /// Text messages received in the current rate-limit window
    message_count: AtomicU32,
    /// Cancelled when the connection closes for any reason
    closer: CancellationToken,
}

impl ConnectionContext {
    pub fn new(id: ConnectionId, closer: CancellationToken) -> Self {
        Self {
            id,
            alive: AtomicBool::new(true),
            message_count: AtomicU32::new(0),
            closer,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn closer(&self) -> &CancellationToken {
        &self.closer
    }

    pub fn mark_alive(&self) {
        self.alive.store(true, Ordering::Release);
    }

    /// Heartbeat probe.
    ///
    /// Returns `false` when nothing arrived since the previous probe, meaning
    /// the connection should be terminated.
    pub fn probe(&self) -> bool {
        self.alive.swap(false, Ordering::AcqRel)
    }

    /// Count one inbound text message against `limit`.
    ///
    /// Returns `false` for the message that goes over the limit and every
    /// message after it until [`reset_window`](Self::reset_window).
    pub fn record_message(&self, limit: u32) -> bool {
        let previous = self
            .message_count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                Some(count.saturating_add(1))
            })
            .unwrap_or(u32::MAX);
        previous < limit
    }

    pub fn reset_window(&self) {
        self.message_count.store(0, Ordering::Release);
    }
}
