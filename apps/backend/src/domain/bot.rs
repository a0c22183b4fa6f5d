//! Bot guess heuristic.
//!
//! Bots remember imperfectly: on easier difficulties they misremember more
//! often, drifting one or two off the true count. A bot only bets when it is
//! sure of its answer, and rarely even then.

use rand::Rng;

use crate::domain::cards::Card;
use crate::domain::deck::Difficulty;
use crate::domain::scoring::{correct_answer, FoxyVariant};

/// Produce a bot's `(guess, bet)` for the given round.
///
/// `allow_bet` is false once the bot has spent its one bet for the game.
pub fn guess_for(
    round_index: usize,
    deck: &[Card],
    variant: FoxyVariant,
    difficulty: Difficulty,
    allow_bet: bool,
    rng: &mut impl Rng,
) -> (u32, bool) {
    let true_count = correct_answer(round_index, deck, variant);

    let roll = rng.random::<f64>();
    let mut guess = true_count;

    let error_chance = match difficulty {
        Difficulty::Hard => 0.1,
        Difficulty::Medium => 0.3,
        Difficulty::Easy => 0.5,
    };

    if roll < error_chance {
        let offset: i64 = if rng.random::<f64>() > 0.5 { 1 } else { -1 };
        let mut miss = i64::from(true_count) + offset;
        if rng.random::<f64>() < 0.2 {
            miss += offset;
        }
        guess = miss.max(0) as u32;
    }

    let bet = allow_bet && roll > 0.8 && guess == true_count;
    (guess, bet)
}
