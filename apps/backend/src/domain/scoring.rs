//! Scoring: per-round correct answers, round scores and final standings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::cards::{AnimalType, Card};
use crate::domain::room::Room;

/// Rule governing what the Foxy card asks for when it is revealed, and
/// whether Foxy itself counts toward regular-card answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FoxyVariant {
    /// Foxy asks for the number of distinct animal types seen so far.
    Standard,
    /// Foxy asks for the appearance count of the most repeated animal.
    MostSeen,
    /// Foxy asks for the number of single-animal cards seen so far.
    Solitary,
    /// Foxy counts as one more cat, both on its own round and whenever the
    /// current card shows a cat.
    CatFox,
}

/// The correct answer for the card at `round_index`, judged over the
/// inclusive history `deck[..=round_index]`.
pub fn correct_answer(round_index: usize, deck: &[Card], variant: FoxyVariant) -> u32 {
    let current = &deck[round_index];
    let history = &deck[..=round_index];

    if current.is_foxy {
        return match variant {
            FoxyVariant::Standard => {
                let mut seen: Vec<AnimalType> = Vec::new();
                for card in history {
                    for &animal in &card.animals {
                        if !seen.contains(&animal) {
                            seen.push(animal);
                        }
                    }
                }
                seen.len() as u32
            }
            FoxyVariant::MostSeen => {
                let mut counts: HashMap<AnimalType, u32> = HashMap::new();
                for card in history {
                    for &animal in &card.animals {
                        *counts.entry(animal).or_insert(0) += 1;
                    }
                }
                counts.values().copied().max().unwrap_or(0)
            }
            FoxyVariant::Solitary => history
                .iter()
                .filter(|card| !card.is_foxy && card.animals.len() == 1)
                .count() as u32,
            FoxyVariant::CatFox => history
                .iter()
                .map(|card| {
                    if card.is_foxy {
                        1
                    } else {
                        card.animals.iter().filter(|&&a| a == AnimalType::Cat).count() as u32
                    }
                })
                .sum(),
        };
    }

    let targets = &current.animals;
    let mut count = 0;
    for card in history {
        if variant == FoxyVariant::CatFox && card.is_foxy && targets.contains(&AnimalType::Cat) {
            count += 1;
        } else {
            count += card.animals.iter().filter(|a| targets.contains(a)).count() as u32;
        }
    }
    count
}

/// Score a single guess against the correct answer.
///
/// An absent guess scores zero. A bet pays double on an exact match and zero
/// otherwise; without a bet an undershoot pays the guess itself.
pub fn round_score(guess: Option<u32>, actual: u32, bet: bool) -> u32 {
    let Some(guess) = guess else {
        return 0;
    };
    if bet {
        if guess == actual {
            guess * 2
        } else {
            0
        }
    } else if guess <= actual {
        guess
    } else {
        0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerStanding {
    pub player_id: Uuid,
    pub name: String,
    pub total_score: u32,
    pub bet_score: u32,
    pub fail_count: u32,
    pub rank: usize,
}

/// Rank all players over the rounds completed so far.
///
/// Sort order: total score descending, then bet score descending, then fail
/// count ascending. Ranks are sorted positions starting at 1; players still
/// tied after all three keys get distinct consecutive ranks.
pub fn standings(room: &Room) -> Vec<PlayerStanding> {
    let completed = usize::from(room.round).min(room.deck.len());
    let answers: Vec<u32> = (0..completed)
        .map(|r| correct_answer(r, &room.deck, room.foxy_variant))
        .collect();

    let mut stats: Vec<PlayerStanding> = room
        .players
        .iter()
        .map(|player| {
            let mut total_score = 0;
            let mut bet_score = 0;
            let mut fail_count = 0;
            for (r, &actual) in answers.iter().enumerate() {
                let guess = player.guesses.get(r).copied().flatten();
                let bet = player.bets.get(r).copied().unwrap_or(false);
                let score = round_score(guess, actual, bet);
                total_score += score;
                if bet && score > 0 {
                    bet_score += score;
                }
                if score == 0 && guess.is_some() {
                    fail_count += 1;
                }
            }
            PlayerStanding {
                player_id: player.id,
                name: player.name.clone(),
                total_score,
                bet_score,
                fail_count,
                rank: 0,
            }
        })
        .collect();

    stats.sort_by(|a, b| {
        b.total_score
            .cmp(&a.total_score)
            .then(b.bet_score.cmp(&a.bet_score))
            .then(a.fail_count.cmp(&b.fail_count))
    });
    for (idx, stat) in stats.iter_mut().enumerate() {
        stat.rank = idx + 1;
    }
    stats
}
