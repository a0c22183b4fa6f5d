//! Per-room subscriber registry.
//!
//! The transport layer registers an unbounded sender per connected player;
//! the coordinator fans events out through here. Senders whose receiving
//! half is gone are pruned on the next delivery attempt.

use dashmap::DashMap;
use tokio::sync::mpsc::UnboundedSender;

use crate::domain::room::PlayerId;
use crate::realtime::protocol::ServerMsg;

#[derive(Default)]
pub struct RoomHub {
    rooms: DashMap<String, DashMap<PlayerId, UnboundedSender<ServerMsg>>>,
}

impl RoomHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, code: &str, player_id: PlayerId, sender: UnboundedSender<ServerMsg>) {
        let entry = self.rooms.entry(code.to_string()).or_default();
        entry.insert(player_id, sender);
    }

    pub fn unsubscribe(&self, code: &str, player_id: PlayerId) {
        if let Some(entry) = self.rooms.get(code) {
            entry.remove(&player_id);
            if entry.is_empty() {
                drop(entry);
                self.rooms.remove_if(code, |_, subs| subs.is_empty());
            }
        }
    }

    /// Drop every subscription for a room that no longer exists.
    pub fn drop_room(&self, code: &str) {
        self.rooms.remove(code);
    }

    pub fn broadcast(&self, code: &str, message: &ServerMsg) {
        if let Some(entry) = self.rooms.get(code) {
            let mut dead: Vec<PlayerId> = Vec::new();
            for sub in entry.iter() {
                if sub.value().send(message.clone()).is_err() {
                    dead.push(*sub.key());
                }
            }
            // Removal happens after iteration so the shard lock is not
            // re-entered while held.
            for player_id in dead {
                entry.remove(&player_id);
            }
        }
    }

    pub fn send_to(&self, code: &str, player_id: PlayerId, message: ServerMsg) {
        if let Some(entry) = self.rooms.get(code) {
            if let Some(sub) = entry.get(&player_id) {
                let _ = sub.send(message);
            }
        }
    }
}
