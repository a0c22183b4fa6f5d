use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use time::macros::datetime;
use time::OffsetDateTime;

use crate::config::game::StartPolicy;
use crate::domain::deck::{self, Difficulty};
use crate::domain::room::{GamePhase, Player, RemovalOutcome, Room, SubmitOutcome};
use crate::domain::rules::DECK_SIZE;
use crate::domain::scoring::FoxyVariant;
use crate::errors::{CapacityKind, DomainError, ValidationKind};

fn now() -> OffsetDateTime {
    datetime!(2026-01-01 0:00 UTC)
}

fn make_room(max_players: usize) -> Room {
    let host = Player::new("host".into(), false, now());
    Room::new(
        "ROOM01".into(),
        host,
        Difficulty::Medium,
        FoxyVariant::Standard,
        max_players,
        now(),
    )
}

fn deal() -> Vec<crate::domain::cards::Card> {
    let mut rng = ChaCha12Rng::seed_from_u64(42);
    deck::generate(Difficulty::Medium, 0.0, &mut rng)
}

fn join(room: &mut Room, name: &str) -> Player {
    let p = Player::new(name.into(), false, now());
    room.add_player(p.clone(), now()).unwrap();
    p
}

fn start(room: &mut Room) {
    let host = room.host_id;
    for p in &mut room.players {
        p.is_ready = true;
    }
    room.ensure_can_start(host, StartPolicy::AllReady, 2).unwrap();
    room.begin(deal(), now());
}

#[test]
fn join_rejects_when_full() {
    let mut room = make_room(2);
    join(&mut room, "p2");
    let err = room
        .add_player(Player::new("p3".into(), false, now()), now())
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Capacity(CapacityKind::RoomFull, _)
    ));
}

#[test]
fn join_rejects_outside_lobby() {
    let mut room = make_room(5);
    join(&mut room, "p2");
    start(&mut room);
    let err = room
        .add_player(Player::new("late".into(), false, now()), now())
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Capacity(CapacityKind::NotInLobby, _)
    ));
}

#[test]
fn join_rejects_duplicate_member() {
    let mut room = make_room(5);
    let p = join(&mut room, "p2");
    let err = room.add_player(p, now()).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::AlreadyInRoom, _)
    ));
}

#[test]
fn start_requires_host() {
    let mut room = make_room(5);
    let guest = join(&mut room, "p2");
    let err = room
        .ensure_can_start(guest.id, StartPolicy::MinPlayers, 2)
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
}

#[test]
fn start_requires_min_players() {
    let room = make_room(5);
    let err = room
        .ensure_can_start(room.host_id, StartPolicy::MinPlayers, 2)
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::NotEnoughPlayers, _)
    ));
}

#[test]
fn all_ready_policy_waits_for_everyone_but_host() {
    let mut room = make_room(5);
    let guest = join(&mut room, "p2");
    let err = room
        .ensure_can_start(room.host_id, StartPolicy::AllReady, 2)
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::PlayersNotReady, _)
    ));

    room.mark_ready(guest.id, now()).unwrap();
    room.ensure_can_start(room.host_id, StartPolicy::AllReady, 2)
        .unwrap();
}

#[test]
fn min_players_policy_ignores_readiness() {
    let mut room = make_room(5);
    join(&mut room, "p2");
    room.ensure_can_start(room.host_id, StartPolicy::MinPlayers, 2)
        .unwrap();
}

#[test]
fn begin_resets_players_and_enters_playing() {
    let mut room = make_room(5);
    let guest = join(&mut room, "p2");
    room.mark_ready(guest.id, now()).unwrap();
    room.begin(deal(), now());
    assert_eq!(room.phase, GamePhase::Playing);
    assert_eq!(room.round, 0);
    assert_eq!(room.deck.len(), DECK_SIZE);
    assert!(room.players.iter().all(|p| p.guesses.is_empty()));
    assert!(room.players.iter().all(|p| !p.is_ready));
}

#[test]
fn record_guess_rejects_outside_playing() {
    let mut room = make_room(5);
    let host = room.host_id;
    let err = room.record_guess(host, 1, false, now()).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::PhaseMismatch, _)
    ));
}

#[test]
fn record_guess_rejects_out_of_range() {
    let mut room = make_room(5);
    join(&mut room, "p2");
    start(&mut room);
    let host = room.host_id;
    let err = room.record_guess(host, 100, false, now()).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::GuessOutOfRange, _)
    ));
}

#[test]
fn record_guess_rejects_duplicate_submission() {
    let mut room = make_room(5);
    join(&mut room, "p2");
    start(&mut room);
    let host = room.host_id;
    assert_eq!(
        room.record_guess(host, 1, false, now()).unwrap(),
        SubmitOutcome::Waiting
    );
    let err = room.record_guess(host, 2, false, now()).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::DuplicateSubmission, _)
    ));
}

#[test]
fn record_guess_rejects_second_bet() {
    let mut room = make_room(5);
    let guest = join(&mut room, "p2");
    start(&mut room);
    let host = room.host_id;
    room.record_guess(host, 1, true, now()).unwrap();
    room.record_guess(guest.id, 1, false, now()).unwrap();
    // Round advanced; host tries to bet again next round.
    let err = room.record_guess(host, 1, true, now()).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::BetAlreadyUsed, _)
    ));
    // A non-bet guess is still fine.
    room.record_guess(host, 1, false, now()).unwrap();
}

#[test]
fn last_submission_advances_round_and_scores_players() {
    let mut room = make_room(5);
    let guest = join(&mut room, "p2");
    start(&mut room);
    let host = room.host_id;

    assert_eq!(
        room.record_guess(host, 0, false, now()).unwrap(),
        SubmitOutcome::Waiting
    );
    assert_eq!(room.round, 0);
    assert_eq!(
        room.record_guess(guest.id, 1, false, now()).unwrap(),
        SubmitOutcome::RoundComplete
    );
    assert_eq!(room.round, 1);
    // Running totals reflect the completed round.
    let total: u32 = room.players.iter().map(|p| p.total_score).sum();
    let scores: u32 = room.players.iter().map(|p| p.score).sum();
    assert_eq!(total, scores);
}

#[test]
fn twentieth_round_completes_the_game() {
    let mut room = make_room(5);
    let guest = join(&mut room, "p2");
    start(&mut room);
    let host = room.host_id;

    for round in 0..DECK_SIZE as u8 {
        assert_eq!(room.round, round);
        assert_eq!(
            room.record_guess(host, 0, false, now()).unwrap(),
            SubmitOutcome::Waiting
        );
        let outcome = room.record_guess(guest.id, 0, false, now()).unwrap();
        if usize::from(round) == DECK_SIZE - 1 {
            assert_eq!(outcome, SubmitOutcome::GameComplete);
        } else {
            assert_eq!(outcome, SubmitOutcome::RoundComplete);
        }
    }
    assert_eq!(room.phase, GamePhase::Scoring);
}

#[test]
fn restart_requires_finished_game() {
    let mut room = make_room(5);
    join(&mut room, "p2");
    start(&mut room);
    let err = room.reset_to_lobby(room.host_id, now()).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::PhaseMismatch, _)
    ));
}

#[test]
fn restart_keeps_roster_and_clears_game_state() {
    let mut room = make_room(5);
    let guest = join(&mut room, "p2");
    start(&mut room);
    let host = room.host_id;
    for _ in 0..DECK_SIZE {
        room.record_guess(host, 0, false, now()).unwrap();
        room.record_guess(guest.id, 0, false, now()).unwrap();
    }
    assert_eq!(room.phase, GamePhase::Scoring);

    room.reset_to_lobby(host, now()).unwrap();
    assert_eq!(room.phase, GamePhase::Lobby);
    assert_eq!(room.round, 0);
    assert!(room.deck.is_empty());
    assert_eq!(room.players.len(), 2);
    assert!(room.players.iter().all(|p| p.guesses.is_empty()));
}

#[test]
fn removing_host_migrates_to_earliest_joined() {
    let mut room = make_room(5);
    let p2 = join(&mut room, "p2");
    let p3 = join(&mut room, "p3");
    let host = room.host_id;

    match room.remove_player(host, now()) {
        RemovalOutcome::Removed { new_host, .. } => assert_eq!(new_host, Some(p2.id)),
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(room.host_id, p2.id);
    assert_eq!(room.players[0].id, p2.id);
    assert_eq!(room.players[1].id, p3.id);
}

#[test]
fn removing_last_player_reports_empty() {
    let mut room = make_room(5);
    let host = room.host_id;
    assert_eq!(room.remove_player(host, now()), RemovalOutcome::Empty);
}

#[test]
fn removing_unknown_player_is_not_member() {
    let mut room = make_room(5);
    let stranger = Player::new("x".into(), false, now());
    assert_eq!(
        room.remove_player(stranger.id, now()),
        RemovalOutcome::NotMember
    );
    assert_eq!(room.players.len(), 1);
}

#[test]
fn removal_of_last_holdout_completes_the_round() {
    let mut room = make_room(5);
    let p2 = join(&mut room, "p2");
    let p3 = join(&mut room, "p3");
    start(&mut room);
    let host = room.host_id;

    room.record_guess(host, 0, false, now()).unwrap();
    room.record_guess(p2.id, 0, false, now()).unwrap();
    // p3 never answers and leaves; the round closes behind them.
    match room.remove_player(p3.id, now()) {
        RemovalOutcome::Removed { advance, .. } => {
            assert_eq!(advance, Some(SubmitOutcome::RoundComplete));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(room.round, 1);
}

#[test]
fn bots_join_ready() {
    let mut room = make_room(5);
    let bot = Player::new("Bot 1".into(), true, now());
    assert!(bot.is_ready);
    room.add_player(bot, now()).unwrap();
    room.ensure_can_start(room.host_id, StartPolicy::AllReady, 2)
        .unwrap();
}
