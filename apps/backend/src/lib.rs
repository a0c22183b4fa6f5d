#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod domain;
pub mod errors;
pub mod lifecycle;
pub mod realtime;
pub mod services;
pub mod state;
pub mod store;
pub mod test_bootstrap;
pub mod utils;

// Re-exports for public API
pub use config::game::{GameConfig, StartPolicy};
pub use domain::deck::Difficulty;
pub use domain::room::{GamePhase, Player, PlayerId, Room};
pub use domain::scoring::FoxyVariant;
pub use domain::snapshot::RoomSnapshot;
pub use errors::DomainError;
pub use lifecycle::presence::PresenceTracker;
pub use lifecycle::reaper::spawn_reaper;
pub use realtime::hub::RoomHub;
pub use realtime::protocol::ServerMsg;
pub use services::rooms::{ActionReply, GameAction, RoomService};
pub use state::app_state::AppState;
pub use store::{InMemoryRoomStore, RoomStore};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
