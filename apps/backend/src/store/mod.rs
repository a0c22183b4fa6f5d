//! Persistence port for rooms.

pub mod memory;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::domain::room::{PlayerId, Room};
use crate::errors::DomainError;

pub use memory::InMemoryRoomStore;

/// Room persistence operations. Implementations must make `update` an
/// atomic compare-and-swap on `version` so concurrent writers cannot both
/// win; under the coordinator's per-room lock a conflict indicates a writer
/// bypassing the lock.
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Persist a new room. Fails if the code is already taken.
    async fn insert(&self, room: Room) -> Result<Room, DomainError>;

    async fn find_by_code(&self, code: &str) -> Result<Option<Room>, DomainError>;

    /// The room this player is currently a member of, if any.
    async fn find_by_player(&self, player_id: PlayerId) -> Result<Option<Room>, DomainError>;

    async fn find_by_host(&self, host_id: PlayerId) -> Result<Option<Room>, DomainError>;

    /// Persist a mutation. `expected_version` must match the stored room's
    /// version; the stored version is bumped and the updated room returned.
    async fn update(&self, room: Room, expected_version: i32) -> Result<Room, DomainError>;

    async fn delete(&self, code: &str) -> Result<(), DomainError>;

    /// Codes of rooms whose `last_activity` is strictly before `cutoff`.
    async fn stale_rooms(&self, cutoff: OffsetDateTime) -> Result<Vec<String>, DomainError>;
}
