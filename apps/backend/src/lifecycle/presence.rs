//! Disconnect grace timers.
//!
//! A player who loses their connection keeps their seat for a grace period.
//! Reconnecting cancels the pending removal; if the timer runs out the
//! player is removed through the coordinator's serialized path, which
//! re-checks membership first.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::domain::room::PlayerId;
use crate::services::rooms::RoomService;

struct PresenceInner {
    service: Arc<RoomService>,
    grace_period: Duration,
    timers: DashMap<PlayerId, CancellationToken>,
}

#[derive(Clone)]
pub struct PresenceTracker {
    inner: Arc<PresenceInner>,
}

impl PresenceTracker {
    pub fn new(service: Arc<RoomService>, grace_period: Duration) -> Self {
        Self {
            inner: Arc::new(PresenceInner {
                service,
                grace_period,
                timers: DashMap::new(),
            }),
        }
    }

    /// Start (or restart) the grace timer for a player who just dropped.
    pub fn player_disconnected(&self, player_id: PlayerId) {
        let token = CancellationToken::new();
        if let Some(previous) = self.inner.timers.insert(player_id, token.clone()) {
            previous.cancel();
        }
        debug!(player = %player_id, "grace timer started");

        let inner = self.inner.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!(player = %player_id, "grace timer cancelled");
                }
                _ = tokio::time::sleep(inner.grace_period) => {
                    inner.timers.remove(&player_id);
                    if let Err(err) = inner.service.handle_grace_expiry(player_id).await {
                        error!(player = %player_id, error = %err, "grace expiry handling failed");
                    }
                }
            }
        });
    }

    /// Cancel a pending removal after a reconnect.
    pub fn player_connected(&self, player_id: PlayerId) {
        if let Some((_, token)) = self.inner.timers.remove(&player_id) {
            token.cancel();
        }
    }

    /// Whether a grace timer is currently pending for this player.
    pub fn is_pending(&self, player_id: PlayerId) -> bool {
        self.inner.timers.contains_key(&player_id)
    }
}
