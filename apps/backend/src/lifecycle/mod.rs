pub mod presence;
pub mod reaper;

pub use presence::PresenceTracker;
pub use reaper::spawn_reaper;
