//! Periodic eviction of empty rooms.

use std::{sync::Arc, time::Duration};

use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::usecase::SweepEmptyRoomsUseCase;

/// Spawn the cleanup sweeper.
///
/// The first sweep runs one full `period` after start. The task ends when
/// `shutdown` is cancelled.
pub fn spawn_sweeper(
    usecase: Arc<SweepEmptyRoomsUseCase>,
    period: Duration,
    shutdown: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    let removed = usecase.execute().await;
                    tracing::debug!("Cleanup sweep removed {} room(s)", removed.len());
                }
            }
        }
        tracing::debug!("Cleanup sweeper stopped");
    })
}
