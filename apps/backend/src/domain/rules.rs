//! Fixed game rules and limits.

/// Cards in every deck, Foxy included.
pub const DECK_SIZE: usize = 20;

/// Non-Foxy cards in every deck.
pub const REGULAR_CARDS: usize = 19;

/// Upper bound accepted for a submitted guess. The largest answer any deck
/// can produce is well below this.
pub const MAX_GUESS: u32 = 99;

/// Seats in a room, bots included.
pub const DEFAULT_MAX_PLAYERS: usize = 5;

/// Minimum players required before a game may start.
pub const DEFAULT_MIN_PLAYERS: usize = 2;
