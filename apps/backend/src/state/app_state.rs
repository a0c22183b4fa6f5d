//! Composition root wiring the store, hub, coordinator and lifecycle pieces
//! together for an embedding transport.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::game::GameConfig;
use crate::lifecycle::presence::PresenceTracker;
use crate::lifecycle::reaper::spawn_reaper;
use crate::realtime::hub::RoomHub;
use crate::services::rooms::RoomService;
use crate::store::{InMemoryRoomStore, RoomStore};

pub struct AppState {
    store: Arc<dyn RoomStore>,
    hub: Arc<RoomHub>,
    service: Arc<RoomService>,
    presence: PresenceTracker,
    shutdown: CancellationToken,
}

impl AppState {
    pub fn new(config: GameConfig) -> Self {
        let store: Arc<dyn RoomStore> = Arc::new(InMemoryRoomStore::new());
        Self::with_store(config, store)
    }

    pub fn with_store(config: GameConfig, store: Arc<dyn RoomStore>) -> Self {
        let hub = Arc::new(RoomHub::new());
        let service = Arc::new(RoomService::new(store.clone(), hub.clone(), config.clone()));
        let presence = PresenceTracker::new(service.clone(), config.grace_period);
        Self {
            store,
            hub,
            service,
            presence,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn store(&self) -> Arc<dyn RoomStore> {
        self.store.clone()
    }

    pub fn hub(&self) -> Arc<RoomHub> {
        self.hub.clone()
    }

    pub fn service(&self) -> Arc<RoomService> {
        self.service.clone()
    }

    pub fn presence(&self) -> &PresenceTracker {
        &self.presence
    }

    /// Start the background sweep; the handle completes on `shutdown`.
    pub fn spawn_reaper(&self) -> JoinHandle<()> {
        spawn_reaper(
            self.service.clone(),
            self.service.config().sweep_interval,
            self.shutdown.clone(),
        )
    }

    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
