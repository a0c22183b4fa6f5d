//! Domain layer: pure game logic types and helpers.

pub mod bot;
pub mod cards;
pub mod deck;
pub mod room;
pub mod rules;
pub mod scoring;
pub mod snapshot;

#[cfg(test)]
mod tests_room;
#[cfg(test)]
mod tests_scoring;

// Re-exports for ergonomics
pub use cards::{AnimalType, Card, Environment};
pub use deck::Difficulty;
pub use room::{GamePhase, Player, PlayerId, RemovalOutcome, Room, SubmitOutcome};
pub use scoring::{correct_answer, round_score, standings, FoxyVariant, PlayerStanding};
pub use snapshot::{snapshot, RoomSnapshot};
