//! Room aggregate: players, phase machine and guard-checked transitions.
//!
//! Everything here is pure state manipulation. Persistence, locking and
//! broadcasting live in the coordinator; time is passed in so transitions
//! stay deterministic under test.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::config::game::StartPolicy;
use crate::domain::cards::Card;
use crate::domain::deck::Difficulty;
use crate::domain::rules::{DECK_SIZE, MAX_GUESS};
use crate::domain::scoring::{self, FoxyVariant};
use crate::errors::{CapacityKind, DomainError, NotFoundKind, ValidationKind};

pub type PlayerId = Uuid;

/// Session phases.
///
/// `GameOver` is part of the published phase vocabulary but no transition
/// produces it; games rest in `Scoring` until restarted or reaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    Lobby,
    Playing,
    Scoring,
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_bot: bool,
    /// One entry per submitted round; `None` marks an absent submission.
    pub guesses: Vec<Option<u32>>,
    pub bets: Vec<bool>,
    /// Score earned in the most recently completed round.
    pub score: u32,
    pub total_score: u32,
    pub is_ready: bool,
    pub last_seen: OffsetDateTime,
}

impl Player {
    pub fn new(name: String, is_bot: bool, now: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            is_bot,
            guesses: Vec::new(),
            bets: Vec::new(),
            score: 0,
            total_score: 0,
            // Bots never mark themselves ready, so they start ready.
            is_ready: is_bot,
            last_seen: now,
        }
    }

    pub fn has_submitted(&self, round: u8) -> bool {
        self.guesses.len() > usize::from(round)
    }

    pub fn has_bet(&self) -> bool {
        self.bets.iter().any(|&b| b)
    }

    fn reset_for_new_game(&mut self) {
        self.guesses.clear();
        self.bets.clear();
        self.score = 0;
        self.total_score = 0;
        self.is_ready = self.is_bot;
    }
}

/// Result of accepting a guess (or of a removal that completed the round).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Other players still owe a guess for the current round.
    Waiting,
    /// The round closed and a new one opened.
    RoundComplete,
    /// The final round closed; the room moved to `Scoring`.
    GameComplete,
}

/// Result of removing a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// The id was not a member; the room is untouched.
    NotMember,
    /// The last member left; the caller should delete the room.
    Empty,
    Removed {
        /// Set when the departing player was host; the earliest-joined
        /// remaining player inherits.
        new_host: Option<PlayerId>,
        /// Set when the departure completed the current round mid-game.
        advance: Option<SubmitOutcome>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub code: String,
    pub host_id: PlayerId,
    pub phase: GamePhase,
    /// Index of the round currently being guessed; equals the number of
    /// completed rounds.
    pub round: u8,
    pub deck: Vec<Card>,
    /// Join order; index 0 is the earliest member still present.
    pub players: Vec<Player>,
    pub difficulty: Difficulty,
    pub foxy_variant: FoxyVariant,
    pub created_at: OffsetDateTime,
    pub last_activity: OffsetDateTime,
    pub max_players: usize,
    /// Optimistic lock counter, bumped by the store on every update.
    pub version: i32,
}

impl Room {
    pub fn new(
        code: String,
        host: Player,
        difficulty: Difficulty,
        foxy_variant: FoxyVariant,
        max_players: usize,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            code,
            host_id: host.id,
            phase: GamePhase::Lobby,
            round: 0,
            deck: Vec::new(),
            players: vec![host],
            difficulty,
            foxy_variant,
            created_at: now,
            last_activity: now,
            max_players,
            version: 0,
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, DomainError> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, "player not in room"))
    }

    pub fn touch(&mut self, now: OffsetDateTime) {
        self.last_activity = now;
    }

    /// Admit a player into the lobby.
    pub fn add_player(&mut self, player: Player, now: OffsetDateTime) -> Result<(), DomainError> {
        if self.phase != GamePhase::Lobby {
            return Err(DomainError::capacity(
                CapacityKind::NotInLobby,
                "game already started",
            ));
        }
        if self.players.len() >= self.max_players {
            return Err(DomainError::capacity(CapacityKind::RoomFull, "room is full"));
        }
        if self.players.iter().any(|p| p.id == player.id) {
            return Err(DomainError::validation(
                ValidationKind::AlreadyInRoom,
                "already a member of this room",
            ));
        }
        self.players.push(player);
        self.touch(now);
        Ok(())
    }

    pub fn mark_ready(&mut self, player_id: PlayerId, now: OffsetDateTime) -> Result<(), DomainError> {
        let player = self.player_mut(player_id)?;
        player.is_ready = true;
        player.last_seen = now;
        self.touch(now);
        Ok(())
    }

    /// Start guard, checked before any deck is generated so a rejected start
    /// consumes no randomness.
    pub fn ensure_can_start(
        &self,
        caller: PlayerId,
        policy: StartPolicy,
        min_players: usize,
    ) -> Result<(), DomainError> {
        if caller != self.host_id {
            return Err(DomainError::forbidden("only the host can start the game"));
        }
        if self.phase != GamePhase::Lobby {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                "game already started",
            ));
        }
        if self.players.len() < min_players {
            return Err(DomainError::validation(
                ValidationKind::NotEnoughPlayers,
                format!("need at least {min_players} players"),
            ));
        }
        if policy == StartPolicy::AllReady {
            let all_ready = self
                .players
                .iter()
                .all(|p| p.is_ready || p.id == self.host_id);
            if !all_ready {
                return Err(DomainError::validation(
                    ValidationKind::PlayersNotReady,
                    "not all players are ready",
                ));
            }
        }
        Ok(())
    }

    /// Move to `Playing` with a fresh deck. Call `ensure_can_start` first.
    pub fn begin(&mut self, deck: Vec<Card>, now: OffsetDateTime) {
        self.deck = deck;
        self.phase = GamePhase::Playing;
        self.round = 0;
        for p in &mut self.players {
            p.reset_for_new_game();
        }
        self.touch(now);
    }

    /// Accept one guess for the current round.
    pub fn record_guess(
        &mut self,
        player_id: PlayerId,
        guess: u32,
        bet: bool,
        now: OffsetDateTime,
    ) -> Result<SubmitOutcome, DomainError> {
        if self.phase != GamePhase::Playing {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                "game is not in progress",
            ));
        }
        if guess > MAX_GUESS {
            return Err(DomainError::validation(
                ValidationKind::GuessOutOfRange,
                format!("guess must be at most {MAX_GUESS}"),
            ));
        }
        let round = self.round;
        let player = self.player_mut(player_id)?;
        if player.has_submitted(round) {
            return Err(DomainError::validation(
                ValidationKind::DuplicateSubmission,
                "guess already submitted for this round",
            ));
        }
        if bet && player.has_bet() {
            return Err(DomainError::validation(
                ValidationKind::BetAlreadyUsed,
                "only one bet per game",
            ));
        }
        player.guesses.push(Some(guess));
        player.bets.push(bet);
        player.last_seen = now;
        self.touch(now);
        Ok(self.advance_if_round_complete())
    }

    /// Close the round if every member has submitted, updating running
    /// scores and moving to `Scoring` after the final round.
    fn advance_if_round_complete(&mut self) -> SubmitOutcome {
        let round = self.round;
        if !self.players.iter().all(|p| p.has_submitted(round)) {
            return SubmitOutcome::Waiting;
        }

        let actual = scoring::correct_answer(usize::from(round), &self.deck, self.foxy_variant);
        for p in &mut self.players {
            let guess = p.guesses.get(usize::from(round)).copied().flatten();
            let bet = p.bets.get(usize::from(round)).copied().unwrap_or(false);
            p.score = scoring::round_score(guess, actual, bet);
            p.total_score += p.score;
        }

        self.round += 1;
        if usize::from(self.round) >= DECK_SIZE {
            self.phase = GamePhase::Scoring;
            SubmitOutcome::GameComplete
        } else {
            SubmitOutcome::RoundComplete
        }
    }

    /// Return the whole roster to the lobby, keeping membership but clearing
    /// game state. Host only, and only once a game has finished.
    pub fn reset_to_lobby(
        &mut self,
        caller: PlayerId,
        now: OffsetDateTime,
    ) -> Result<(), DomainError> {
        if caller != self.host_id {
            return Err(DomainError::forbidden("only the host can restart the game"));
        }
        if !matches!(self.phase, GamePhase::Scoring | GamePhase::GameOver) {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                "game has not finished",
            ));
        }
        self.phase = GamePhase::Lobby;
        self.round = 0;
        self.deck.clear();
        for p in &mut self.players {
            p.reset_for_new_game();
        }
        self.touch(now);
        Ok(())
    }

    /// Drop a member, migrating the host to the earliest-joined survivor and
    /// closing the current round if the departure was the last submission
    /// outstanding.
    pub fn remove_player(&mut self, player_id: PlayerId, now: OffsetDateTime) -> RemovalOutcome {
        let Some(idx) = self.players.iter().position(|p| p.id == player_id) else {
            return RemovalOutcome::NotMember;
        };
        self.players.remove(idx);

        if self.players.is_empty() {
            return RemovalOutcome::Empty;
        }

        let new_host = if self.host_id == player_id {
            self.host_id = self.players[0].id;
            Some(self.host_id)
        } else {
            None
        };

        let advance = if self.phase == GamePhase::Playing {
            match self.advance_if_round_complete() {
                SubmitOutcome::Waiting => None,
                outcome => Some(outcome),
            }
        } else {
            None
        };

        self.touch(now);
        RemovalOutcome::Removed { new_host, advance }
    }
}
