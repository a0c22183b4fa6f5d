//! Weighted deck generation.
//!
//! A deck is 19 regular cards drawn without replacement from a fixed template
//! pool, plus the single Foxy card. The split between one-, two- and
//! three-animal cards follows difficulty base fractions perturbed by a
//! per-category multiplicative jitter.

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::cards::{AnimalType, Card, Environment};
use crate::domain::rules::REGULAR_CARDS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Base fractions of the 19 regular cards showing one, two and three
    /// animals respectively.
    fn base_fractions(self) -> [f64; 3] {
        match self {
            Difficulty::Easy => [0.70, 0.25, 0.05],
            Difficulty::Medium => [0.50, 0.30, 0.20],
            Difficulty::Hard => [0.40, 0.35, 0.25],
        }
    }
}

/// A card blueprint in the template pool. Cloned with a fresh id for every
/// deck instance.
#[derive(Debug, Clone)]
struct Template {
    environment: Environment,
    animals: Vec<AnimalType>,
}

/// Template pool grouped by animal count: `pools[0]` holds single-animal
/// templates, `pools[1]` pairs, `pools[2]` trios.
///
/// Per environment: each exclusive tag solo x4, the cat solo x2, each of the
/// three unordered pairs x2, the trio x1. Capacities are therefore
/// [40, 24, 4].
static TEMPLATE_POOLS: Lazy<[Vec<Template>; 3]> = Lazy::new(|| {
    let mut singles = Vec::new();
    let mut pairs = Vec::new();
    let mut trios = Vec::new();

    for env in Environment::ALL {
        let [a, b, cat] = env.animals();

        for animal in [a, b] {
            for _ in 0..4 {
                singles.push(Template {
                    environment: env,
                    animals: vec![animal],
                });
            }
        }
        for _ in 0..2 {
            singles.push(Template {
                environment: env,
                animals: vec![cat],
            });
        }

        for pair in [[a, b], [a, cat], [b, cat]] {
            for _ in 0..2 {
                pairs.push(Template {
                    environment: env,
                    animals: pair.to_vec(),
                });
            }
        }

        trios.push(Template {
            environment: env,
            animals: vec![a, b, cat],
        });
    }

    [singles, pairs, trios]
});

/// Generate a complete shuffled deck: exactly 19 regular cards plus one Foxy.
///
/// `variance` scales the jitter applied to each category fraction; 0.0 makes
/// the split deterministic for a given difficulty.
pub fn generate(difficulty: Difficulty, variance: f64, rng: &mut impl Rng) -> Vec<Card> {
    let counts = category_counts(difficulty, variance, rng);

    let mut deck: Vec<Card> = Vec::with_capacity(REGULAR_CARDS + 1);
    for (pool, count) in TEMPLATE_POOLS.iter().zip(counts) {
        let mut templates = pool.clone();
        templates.shuffle(rng);
        deck.extend(
            templates
                .into_iter()
                .take(count)
                .map(|t| Card::regular(t.environment, t.animals)),
        );
    }

    deck.push(Card::foxy());
    deck.shuffle(rng);
    deck
}

/// Resolve jittered fractions into per-category card counts that sum to 19
/// and respect pool capacities.
fn category_counts(difficulty: Difficulty, variance: f64, rng: &mut impl Rng) -> [usize; 3] {
    let mut weights = difficulty.base_fractions();
    for w in &mut weights {
        let jitter = 1.0 + (rng.random::<f64>() - 0.5) * 2.0 * variance;
        *w *= jitter;
    }
    let sum: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }

    let one = (weights[0] * REGULAR_CARDS as f64).round() as i64;
    let two = (weights[1] * REGULAR_CARDS as f64).round() as i64;
    let mut counts = [one, two, REGULAR_CARDS as i64 - one - two];

    // Rounding can push the residual category negative; pull back from the
    // larger rounded categories first.
    while counts[2] < 0 {
        if counts[1] > 0 {
            counts[1] -= 1;
        } else {
            counts[0] -= 1;
        }
        counts[2] += 1;
    }

    let caps: [i64; 3] = [
        TEMPLATE_POOLS[0].len() as i64,
        TEMPLATE_POOLS[1].len() as i64,
        TEMPLATE_POOLS[2].len() as i64,
    ];

    // A target above pool capacity (reachable for trios: only 4 exist) is
    // clamped and the shortfall moved into categories with spare capacity so
    // the regular-card count stays exactly 19.
    let mut overflow = 0i64;
    for i in 0..3 {
        if counts[i] > caps[i] {
            overflow += counts[i] - caps[i];
            warn!(
                category = i + 1,
                target = counts[i],
                capacity = caps[i],
                "deck category target clamped to pool capacity"
            );
            counts[i] = caps[i];
        }
    }
    for i in 0..3 {
        if overflow == 0 {
            break;
        }
        let spare = caps[i] - counts[i];
        let moved = overflow.min(spare);
        counts[i] += moved;
        overflow -= moved;
    }

    [counts[0] as usize, counts[1] as usize, counts[2] as usize]
}
