use time::macros::datetime;

use crate::domain::cards::{AnimalType, Card, Environment};
use crate::domain::deck::Difficulty;
use crate::domain::room::{Player, Room};
use crate::domain::scoring::{correct_answer, round_score, standings, FoxyVariant};

fn farm(animals: &[AnimalType]) -> Card {
    Card::regular(Environment::Farm, animals.to_vec())
}

#[test]
fn regular_card_counts_target_appearances_inclusively() {
    use AnimalType::{Cat, Pig};
    let deck = vec![farm(&[Pig]), farm(&[Cat, Pig]), farm(&[Pig, Cat])];
    // Targets {pig, cat}: card 0 contributes 1, cards 1 and 2 contribute 2.
    assert_eq!(correct_answer(2, &deck, FoxyVariant::Standard), 5);
}

#[test]
fn standard_foxy_counts_distinct_types() {
    use AnimalType::{Cat, Pig, Rooster};
    let deck = vec![
        farm(&[Pig]),
        farm(&[Pig, Rooster]),
        farm(&[Cat]),
        Card::foxy(),
    ];
    assert_eq!(correct_answer(3, &deck, FoxyVariant::Standard), 3);
}

#[test]
fn most_seen_foxy_counts_top_repeat() {
    use AnimalType::{Cat, Pig, Rooster};
    let deck = vec![
        farm(&[Pig]),
        farm(&[Pig, Rooster]),
        farm(&[Pig, Cat]),
        Card::foxy(),
    ];
    assert_eq!(correct_answer(3, &deck, FoxyVariant::MostSeen), 3);
}

#[test]
fn most_seen_foxy_with_empty_history_is_zero() {
    let deck = vec![Card::foxy()];
    assert_eq!(correct_answer(0, &deck, FoxyVariant::MostSeen), 0);
}

#[test]
fn solitary_foxy_counts_single_animal_cards() {
    use AnimalType::{Cat, Giraffe, Pig, Zebra};
    let deck = vec![
        farm(&[Pig]),
        Card::regular(Environment::Savanna, vec![Zebra, Giraffe]),
        farm(&[Cat]),
        Card::foxy(),
    ];
    assert_eq!(correct_answer(3, &deck, FoxyVariant::Solitary), 2);
}

#[test]
fn cat_fox_foxy_counts_cats_plus_itself() {
    use AnimalType::{Cat, Pig};
    let deck = vec![farm(&[Cat]), farm(&[Pig, Cat]), Card::foxy()];
    assert_eq!(correct_answer(2, &deck, FoxyVariant::CatFox), 3);
}

#[test]
fn cat_fox_foxy_in_history_counts_toward_cat_targets() {
    use AnimalType::{Cat, Pig};
    let deck = vec![farm(&[Cat]), Card::foxy(), farm(&[Pig, Cat])];
    // Targets {pig, cat}: cat card 1, Foxy counts as a cat 1, current 2.
    assert_eq!(correct_answer(2, &deck, FoxyVariant::CatFox), 4);
    // Without the variant the Foxy contributes nothing.
    assert_eq!(correct_answer(2, &deck, FoxyVariant::Standard), 3);
}

#[test]
fn cat_fox_does_not_apply_when_target_has_no_cat() {
    use AnimalType::Pig;
    let deck = vec![farm(&[Pig]), Card::foxy(), farm(&[Pig])];
    assert_eq!(correct_answer(2, &deck, FoxyVariant::CatFox), 2);
}

#[test]
fn round_score_covers_bet_and_no_bet_cases() {
    assert_eq!(round_score(Some(5), 5, true), 10);
    assert_eq!(round_score(Some(5), 6, true), 0);
    assert_eq!(round_score(Some(4), 5, false), 4);
    assert_eq!(round_score(Some(6), 5, false), 0);
    assert_eq!(round_score(Some(0), 2, false), 0);
    assert_eq!(round_score(None, 5, true), 0);
    assert_eq!(round_score(None, 5, false), 0);
}

fn room_with_two_rounds(players: Vec<Player>) -> Room {
    use AnimalType::Pig;
    let now = datetime!(2026-01-01 0:00 UTC);
    let host = players[0].clone();
    let mut room = Room::new(
        "TEST01".into(),
        host,
        Difficulty::Medium,
        FoxyVariant::Standard,
        5,
        now,
    );
    room.players = players;
    // Answers: round 0 -> 1, round 1 -> 2.
    room.deck = vec![farm(&[Pig]), farm(&[Pig])];
    room.round = 2;
    room
}

fn player(name: &str, guesses: Vec<Option<u32>>, bets: Vec<bool>) -> Player {
    let mut p = Player::new(name.into(), false, datetime!(2026-01-01 0:00 UTC));
    p.guesses = guesses;
    p.bets = bets;
    p
}

#[test]
fn standings_sort_by_total_then_bet_then_fails() {
    let a = player("a", vec![Some(1), Some(2)], vec![false, false]); // 3, bet 0
    let b = player("b", vec![Some(1), Some(2)], vec![true, false]); // 2+2=4, bet 2
    let c = player("c", vec![Some(1), Some(2)], vec![false, true]); // 1+4=5, bet 4
    let room = room_with_two_rounds(vec![a, b, c]);

    let ranked = standings(&room);
    assert_eq!(
        ranked.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
        ["c", "b", "a"]
    );
    assert_eq!(
        ranked.iter().map(|s| s.rank).collect::<Vec<_>>(),
        [1, 2, 3]
    );
    assert_eq!(ranked[0].total_score, 5);
    assert_eq!(ranked[0].bet_score, 4);
}

#[test]
fn standings_tiebreaker_prefers_bet_score() {
    // e and f both total 3; f carries bet score 2 and wins the tie.
    let e = player("e", vec![Some(1), Some(2)], vec![false, false]);
    let f = player("f", vec![Some(1), Some(1)], vec![true, false]);
    let room = room_with_two_rounds(vec![e, f]);

    let ranked = standings(&room);
    assert_eq!(
        ranked.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
        ["f", "e"]
    );
    assert_eq!(ranked[0].bet_score, 2);
    assert_eq!(ranked[1].bet_score, 0);
}

#[test]
fn standings_tiebreaker_prefers_fewer_fails() {
    // Both total 2 with no bets; the overshoot in round 0 costs g the tie.
    let h = player("h", vec![None, Some(2)], vec![false, false]);
    let g = player("g", vec![Some(3), Some(2)], vec![false, false]);
    let room = room_with_two_rounds(vec![g, h]);

    let ranked = standings(&room);
    assert_eq!(
        ranked.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
        ["h", "g"]
    );
    assert_eq!(ranked[0].fail_count, 0);
    assert_eq!(ranked[1].fail_count, 1);
}

#[test]
fn standings_ignore_absent_guesses_in_fail_count() {
    let h = player("h", vec![None, Some(2)], vec![false, false]);
    let room = room_with_two_rounds(vec![h]);
    let ranked = standings(&room);
    assert_eq!(ranked[0].total_score, 2);
    assert_eq!(ranked[0].fail_count, 0);
}
