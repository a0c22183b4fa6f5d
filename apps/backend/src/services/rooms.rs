//! Room coordinator: the single serialized mutation path.
//!
//! Every mutation of a room runs under that room's async mutex, covering the
//! whole load, mutate, persist, broadcast sequence. Actions fail atomically:
//! nothing is persisted or broadcast when a guard rejects.

use std::sync::Arc;

use dashmap::DashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::config::game::GameConfig;
use crate::domain::bot;
use crate::domain::deck::{self, Difficulty};
use crate::domain::room::{GamePhase, Player, PlayerId, RemovalOutcome, Room, SubmitOutcome};
use crate::domain::scoring::FoxyVariant;
use crate::domain::snapshot::{snapshot, RoomSnapshot};
use crate::errors::{DomainError, NotFoundKind, ValidationKind};
use crate::realtime::hub::RoomHub;
use crate::realtime::protocol::ServerMsg;
use crate::store::RoomStore;
use crate::utils::room_code::{generate_room_code, normalize_room_code};

/// Every inbound mutation, as data. `dispatch` matches exhaustively, so a
/// new action fails to compile until every arm handles it.
#[derive(Debug, Clone)]
pub enum GameAction {
    CreateRoom {
        player_name: String,
        difficulty: Difficulty,
        foxy_variant: FoxyVariant,
    },
    JoinRoom {
        room_code: String,
        player_name: String,
    },
    MarkReady {
        room_code: String,
        player_id: PlayerId,
    },
    AddBot {
        room_code: String,
        player_id: PlayerId,
    },
    StartGame {
        room_code: String,
        player_id: PlayerId,
    },
    SubmitGuess {
        room_code: String,
        player_id: PlayerId,
        guess: u32,
        bet: bool,
    },
    RestartGame {
        room_code: String,
        player_id: PlayerId,
    },
    LeaveRoom {
        room_code: String,
        player_id: PlayerId,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionReply {
    RoomCreated {
        room_code: String,
        player_id: PlayerId,
        room: RoomSnapshot,
    },
    RoomJoined {
        player_id: PlayerId,
        room: RoomSnapshot,
    },
    Ack,
}

pub struct RoomService {
    store: Arc<dyn RoomStore>,
    hub: Arc<RoomHub>,
    config: GameConfig,
    /// Seeded from the OS in production; tests inject a fixed seed. Held
    /// only inside non-async scopes, never across an await.
    rng: parking_lot::Mutex<ChaCha12Rng>,
    locks: DashMap<String, Arc<tokio::sync::Mutex<()>>>,
}

impl RoomService {
    pub fn new(store: Arc<dyn RoomStore>, hub: Arc<RoomHub>, config: GameConfig) -> Self {
        Self::with_rng(store, hub, config, ChaCha12Rng::from_os_rng())
    }

    pub fn with_rng(
        store: Arc<dyn RoomStore>,
        hub: Arc<RoomHub>,
        config: GameConfig,
        rng: ChaCha12Rng,
    ) -> Self {
        Self {
            store,
            hub,
            config,
            rng: parking_lot::Mutex::new(rng),
            locks: DashMap::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Handle one action end to end.
    pub async fn dispatch(&self, action: GameAction) -> Result<ActionReply, DomainError> {
        match action {
            GameAction::CreateRoom {
                player_name,
                difficulty,
                foxy_variant,
            } => self.create_room(player_name, difficulty, foxy_variant).await,
            GameAction::JoinRoom {
                room_code,
                player_name,
            } => self.join_room(room_code, player_name).await,
            GameAction::MarkReady {
                room_code,
                player_id,
            } => self.mark_ready(room_code, player_id).await,
            GameAction::AddBot {
                room_code,
                player_id,
            } => self.add_bot(room_code, player_id).await,
            GameAction::StartGame {
                room_code,
                player_id,
            } => self.start_game(room_code, player_id).await,
            GameAction::SubmitGuess {
                room_code,
                player_id,
                guess,
                bet,
            } => self.submit_guess(room_code, player_id, guess, bet).await,
            GameAction::RestartGame {
                room_code,
                player_id,
            } => self.restart_game(room_code, player_id).await,
            GameAction::LeaveRoom {
                room_code,
                player_id,
            } => self.leave_room(room_code, player_id).await,
        }
    }

    async fn create_room(
        &self,
        player_name: String,
        difficulty: Difficulty,
        foxy_variant: FoxyVariant,
    ) -> Result<ActionReply, DomainError> {
        let name = validated_name(&player_name)?;
        let now = OffsetDateTime::now_utc();
        let host = Player::new(name, false, now);
        let player_id = host.id;

        // Regenerate on the rare code collision.
        let room = loop {
            let code = {
                let mut rng = self.rng.lock();
                generate_room_code(&mut *rng)
            };
            if self.store.find_by_code(&code).await?.is_some() {
                debug!(%code, "room code collision, regenerating");
                continue;
            }
            let room = Room::new(
                code,
                host.clone(),
                difficulty,
                foxy_variant,
                self.config.max_players,
                now,
            );
            break self.store.insert(room).await?;
        };

        info!(code = %room.code, host = %player_id, "room created");
        Ok(ActionReply::RoomCreated {
            room_code: room.code.clone(),
            player_id,
            room: snapshot(&room),
        })
    }

    async fn join_room(
        &self,
        room_code: String,
        player_name: String,
    ) -> Result<ActionReply, DomainError> {
        let name = validated_name(&player_name)?;
        let code = normalize_room_code(&room_code)?;
        let lock = self.room_lock(&code);
        let _guard = lock.lock().await;

        let mut room = self.load(&code).await?;
        let now = OffsetDateTime::now_utc();
        let player = Player::new(name, false, now);
        let player_id = player.id;
        room.add_player(player, now)?;
        let room = self.persist(room).await?;

        info!(%code, player = %player_id, "player joined");
        let snap = snapshot(&room);
        if let Some(player) = snap.players.iter().find(|p| p.id == player_id).cloned() {
            self.hub.broadcast(&code, &ServerMsg::PlayerJoined { player });
        }
        self.hub
            .broadcast(&code, &ServerMsg::RoomState { room: snap.clone() });
        Ok(ActionReply::RoomJoined {
            player_id,
            room: snap,
        })
    }

    async fn mark_ready(
        &self,
        room_code: String,
        player_id: PlayerId,
    ) -> Result<ActionReply, DomainError> {
        let code = normalize_room_code(&room_code)?;
        let lock = self.room_lock(&code);
        let _guard = lock.lock().await;

        let mut room = self.load(&code).await?;
        room.mark_ready(player_id, OffsetDateTime::now_utc())?;
        let room = self.persist(room).await?;

        self.hub
            .broadcast(&code, &ServerMsg::RoomState { room: snapshot(&room) });
        Ok(ActionReply::Ack)
    }

    async fn add_bot(
        &self,
        room_code: String,
        player_id: PlayerId,
    ) -> Result<ActionReply, DomainError> {
        let code = normalize_room_code(&room_code)?;
        let lock = self.room_lock(&code);
        let _guard = lock.lock().await;

        let mut room = self.load(&code).await?;
        if player_id != room.host_id {
            return Err(DomainError::forbidden("only the host can add bots"));
        }
        let now = OffsetDateTime::now_utc();
        let bot_number = room.players.iter().filter(|p| p.is_bot).count() + 1;
        let bot = Player::new(format!("Bot {bot_number}"), true, now);
        let bot_id = bot.id;
        room.add_player(bot, now)?;
        let room = self.persist(room).await?;

        info!(%code, bot = %bot_id, "bot added");
        self.hub
            .broadcast(&code, &ServerMsg::RoomState { room: snapshot(&room) });
        Ok(ActionReply::Ack)
    }

    async fn start_game(
        &self,
        room_code: String,
        player_id: PlayerId,
    ) -> Result<ActionReply, DomainError> {
        let code = normalize_room_code(&room_code)?;
        let lock = self.room_lock(&code);
        let _guard = lock.lock().await;

        let mut room = self.load(&code).await?;
        // Guard first so a rejected start consumes no randomness.
        room.ensure_can_start(player_id, self.config.start_policy, self.config.min_players)?;

        let now = OffsetDateTime::now_utc();
        let deck = {
            let mut rng = self.rng.lock();
            deck::generate(room.difficulty, self.config.deck_variance, &mut *rng)
        };
        room.begin(deck, now);
        let bot_outcome = self.run_bots(&mut room, now)?;
        let room = self.persist(room).await?;

        info!(%code, "game started");
        self.hub
            .broadcast(&code, &ServerMsg::GameStarted { room: snapshot(&room) });
        self.broadcast_outcome(&code, &room, bot_outcome);
        Ok(ActionReply::Ack)
    }

    async fn submit_guess(
        &self,
        room_code: String,
        player_id: PlayerId,
        guess: u32,
        bet: bool,
    ) -> Result<ActionReply, DomainError> {
        let code = normalize_room_code(&room_code)?;
        let lock = self.room_lock(&code);
        let _guard = lock.lock().await;

        let mut room = self.load(&code).await?;
        let now = OffsetDateTime::now_utc();
        let mut outcome = room.record_guess(player_id, guess, bet, now)?;
        if outcome != SubmitOutcome::Waiting {
            // A new round just opened; bots answer before any human sees it.
            if let Some(later) = self.run_bots(&mut room, now)? {
                outcome = later;
            }
        }
        let room = self.persist(room).await?;

        debug!(%code, player = %player_id, round = room.round, ?outcome, "guess accepted");
        match outcome {
            SubmitOutcome::Waiting => self
                .hub
                .broadcast(&code, &ServerMsg::RoomState { room: snapshot(&room) }),
            _ => self.broadcast_outcome(&code, &room, Some(outcome)),
        }
        Ok(ActionReply::Ack)
    }

    async fn restart_game(
        &self,
        room_code: String,
        player_id: PlayerId,
    ) -> Result<ActionReply, DomainError> {
        let code = normalize_room_code(&room_code)?;
        let lock = self.room_lock(&code);
        let _guard = lock.lock().await;

        let mut room = self.load(&code).await?;
        room.reset_to_lobby(player_id, OffsetDateTime::now_utc())?;
        let room = self.persist(room).await?;

        info!(%code, "game restarted");
        self.hub
            .broadcast(&code, &ServerMsg::RoomState { room: snapshot(&room) });
        Ok(ActionReply::Ack)
    }

    async fn leave_room(
        &self,
        room_code: String,
        player_id: PlayerId,
    ) -> Result<ActionReply, DomainError> {
        let code = normalize_room_code(&room_code)?;
        let lock = self.room_lock(&code);
        let _guard = lock.lock().await;

        let mut room = self.load(&code).await?;
        let now = OffsetDateTime::now_utc();
        match room.remove_player(player_id, now) {
            RemovalOutcome::NotMember => Err(DomainError::not_found(
                NotFoundKind::Player,
                "not a member of this room",
            )),
            RemovalOutcome::Empty => {
                self.store.delete(&code).await?;
                self.hub.drop_room(&code);
                drop(_guard);
                self.locks.remove(&code);
                info!(%code, "empty room deleted");
                Ok(ActionReply::Ack)
            }
            RemovalOutcome::Removed { new_host, advance } => {
                let advance = match advance {
                    // The departure may have left only bots outstanding.
                    Some(outcome) => self.run_bots(&mut room, now)?.or(Some(outcome)),
                    None => None,
                };
                let room = self.persist(room).await?;
                self.hub.unsubscribe(&code, player_id);
                if let Some(host) = new_host {
                    info!(%code, new_host = %host, "host migrated");
                }
                self.hub
                    .broadcast(&code, &ServerMsg::PlayerLeft { player_id });
                match advance {
                    None => self
                        .hub
                        .broadcast(&code, &ServerMsg::RoomState { room: snapshot(&room) }),
                    outcome => self.broadcast_outcome(&code, &room, outcome),
                }
                Ok(ActionReply::Ack)
            }
        }
    }

    /// Called by the presence tracker when a disconnect grace period runs
    /// out. Membership is re-checked under the room lock; a player who
    /// reconnected into another action in the meantime is left alone by the
    /// token cancellation, and one who already left is a no-op here.
    pub async fn handle_grace_expiry(&self, player_id: PlayerId) -> Result<(), DomainError> {
        let Some(room) = self.store.find_by_player(player_id).await? else {
            return Ok(());
        };
        let code = room.code.clone();
        warn!(%code, player = %player_id, "disconnect grace expired, removing player");
        match self.leave_room(code, player_id).await {
            Ok(_) => Ok(()),
            // Lost a race with an explicit leave; nothing left to do.
            Err(DomainError::NotFound(_, _)) => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// One reaper sweep: close rooms idle past the threshold (LOBBY and
    /// PLAYING only) and any room past the hard TTL regardless of phase.
    pub async fn reap(&self, now: OffsetDateTime) -> Result<usize, DomainError> {
        let idle_cutoff = now - self.config.idle_threshold;
        let hard_cutoff = now - self.config.hard_ttl;
        let candidates = self.store.stale_rooms(idle_cutoff).await?;

        let mut reaped = 0;
        for code in candidates {
            let lock = self.room_lock(&code);
            let guard = lock.lock().await;
            // Re-check under the lock; the room may have seen activity or
            // been deleted since the scan.
            let Some(room) = self.store.find_by_code(&code).await? else {
                continue;
            };
            let expired_hard = room.last_activity < hard_cutoff;
            let expired_idle = room.last_activity < idle_cutoff
                && matches!(room.phase, GamePhase::Lobby | GamePhase::Playing);
            if !expired_hard && !expired_idle {
                continue;
            }

            self.hub.broadcast(
                &code,
                &ServerMsg::RoomClosed {
                    reason: "room closed due to inactivity".to_string(),
                },
            );
            self.store.delete(&code).await?;
            self.hub.drop_room(&code);
            drop(guard);
            self.locks.remove(&code);
            info!(%code, phase = ?room.phase, "stale room reaped");
            reaped += 1;
        }
        Ok(reaped)
    }

    /// Record a guess for every bot still owing one, repeating while new
    /// rounds keep opening (an all-bot roster plays the game out in one
    /// call). Returns the last round-closing outcome, if any.
    fn run_bots(
        &self,
        room: &mut Room,
        now: OffsetDateTime,
    ) -> Result<Option<SubmitOutcome>, DomainError> {
        let mut last = None;
        while room.phase == GamePhase::Playing {
            let round = room.round;
            let pending: Vec<(PlayerId, bool)> = room
                .players
                .iter()
                .filter(|p| p.is_bot && !p.has_submitted(round))
                .map(|p| (p.id, !p.has_bet()))
                .collect();
            if pending.is_empty() {
                break;
            }
            for (bot_id, allow_bet) in pending {
                if room.phase != GamePhase::Playing {
                    break;
                }
                let (guess, bet) = {
                    let mut rng = self.rng.lock();
                    bot::guess_for(
                        usize::from(room.round),
                        &room.deck,
                        room.foxy_variant,
                        room.difficulty,
                        allow_bet,
                        &mut *rng,
                    )
                };
                match room.record_guess(bot_id, guess, bet, now)? {
                    SubmitOutcome::Waiting => {}
                    outcome => last = Some(outcome),
                }
            }
        }
        Ok(last)
    }

    fn broadcast_outcome(&self, code: &str, room: &Room, outcome: Option<SubmitOutcome>) {
        match outcome {
            Some(SubmitOutcome::RoundComplete) => self.hub.broadcast(
                code,
                &ServerMsg::RoundCompleted { room: snapshot(room) },
            ),
            Some(SubmitOutcome::GameComplete) => self.hub.broadcast(
                code,
                &ServerMsg::GameCompleted { room: snapshot(room) },
            ),
            Some(SubmitOutcome::Waiting) | None => {}
        }
    }

    fn room_lock(&self, code: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.locks.entry(code.to_string()).or_default().clone()
    }

    async fn load(&self, code: &str) -> Result<Room, DomainError> {
        self.store
            .find_by_code(code)
            .await?
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Room, "room not found"))
    }

    async fn persist(&self, room: Room) -> Result<Room, DomainError> {
        let expected = room.version;
        self.store.update(room, expected).await
    }
}

fn validated_name(raw: &str) -> Result<String, DomainError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::EmptyName,
            "player name is required",
        ));
    }
    Ok(name.to_string())
}
