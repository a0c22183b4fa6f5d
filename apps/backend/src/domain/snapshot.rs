//! Serializable room snapshots for the realtime surface.
//!
//! The full deck is included; hiding unrevealed cards is a presentation
//! concern of the consumer, which only reveals up to the current round.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::cards::Card;
use crate::domain::deck::Difficulty;
use crate::domain::room::{GamePhase, Player, Room};
use crate::domain::scoring::FoxyVariant;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub id: Uuid,
    pub name: String,
    pub is_bot: bool,
    pub guesses: Vec<Option<u32>>,
    pub bets: Vec<bool>,
    pub score: u32,
    pub total_score: u32,
    pub is_ready: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomSnapshot {
    pub code: String,
    pub host_id: Uuid,
    pub phase: GamePhase,
    pub round: u8,
    pub deck: Vec<Card>,
    pub players: Vec<PlayerSnapshot>,
    pub difficulty: Difficulty,
    pub foxy_variant: FoxyVariant,
    pub max_players: usize,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

fn player_snapshot(player: &Player) -> PlayerSnapshot {
    PlayerSnapshot {
        id: player.id,
        name: player.name.clone(),
        is_bot: player.is_bot,
        guesses: player.guesses.clone(),
        bets: player.bets.clone(),
        score: player.score,
        total_score: player.total_score,
        is_ready: player.is_ready,
    }
}

pub fn snapshot(room: &Room) -> RoomSnapshot {
    RoomSnapshot {
        code: room.code.clone(),
        host_id: room.host_id,
        phase: room.phase,
        round: room.round,
        deck: room.deck.clone(),
        players: room.players.iter().map(player_snapshot).collect(),
        difficulty: room.difficulty,
        foxy_variant: room.foxy_variant,
        max_players: room.max_players,
        created_at: room.created_at,
    }
}
