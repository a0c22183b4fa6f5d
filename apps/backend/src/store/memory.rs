//! In-memory `RoomStore` adapter keyed by room code.

use async_trait::async_trait;
use dashmap::DashMap;
use time::OffsetDateTime;

use crate::domain::room::{PlayerId, Room};
use crate::errors::{DomainError, InfraErrorKind, NotFoundKind};
use crate::store::RoomStore;

#[derive(Default)]
pub struct InMemoryRoomStore {
    rooms: DashMap<String, Room>,
}

impl InMemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn insert(&self, room: Room) -> Result<Room, DomainError> {
        let code = room.code.clone();
        match self.rooms.entry(code) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(DomainError::infra(
                InfraErrorKind::OptimisticLock,
                "room code already taken",
            )),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(room.clone());
                Ok(room)
            }
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Room>, DomainError> {
        Ok(self.rooms.get(code).map(|entry| entry.clone()))
    }

    async fn find_by_player(&self, player_id: PlayerId) -> Result<Option<Room>, DomainError> {
        Ok(self
            .rooms
            .iter()
            .find(|entry| entry.players.iter().any(|p| p.id == player_id))
            .map(|entry| entry.clone()))
    }

    async fn find_by_host(&self, host_id: PlayerId) -> Result<Option<Room>, DomainError> {
        Ok(self
            .rooms
            .iter()
            .find(|entry| entry.host_id == host_id)
            .map(|entry| entry.clone()))
    }

    async fn update(&self, mut room: Room, expected_version: i32) -> Result<Room, DomainError> {
        let mut stored = self.rooms.get_mut(&room.code).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Room, "room no longer exists")
        })?;
        if stored.version != expected_version {
            return Err(DomainError::infra(
                InfraErrorKind::OptimisticLock,
                format!(
                    "version mismatch: stored {} expected {expected_version}",
                    stored.version
                ),
            ));
        }
        room.version = expected_version + 1;
        *stored = room.clone();
        Ok(room)
    }

    async fn delete(&self, code: &str) -> Result<(), DomainError> {
        self.rooms.remove(code);
        Ok(())
    }

    async fn stale_rooms(&self, cutoff: OffsetDateTime) -> Result<Vec<String>, DomainError> {
        Ok(self
            .rooms
            .iter()
            .filter(|entry| entry.last_activity < cutoff)
            .map(|entry| entry.code.clone())
            .collect())
    }
}
