//! Periodic stale-room sweep.

use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::services::rooms::RoomService;

/// Run `RoomService::reap` on a fixed interval until `shutdown` fires. The
/// first tick is consumed immediately so the sweep starts one interval in.
pub fn spawn_reaper(
    service: Arc<RoomService>,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("reaper shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    match service.reap(OffsetDateTime::now_utc()).await {
                        Ok(0) => {}
                        Ok(count) => info!(count, "reaper closed stale rooms"),
                        Err(err) => error!(error = %err, "reaper sweep failed"),
                    }
                }
            }
        }
    })
}
