//! Runtime configuration, read from the environment with sensible defaults.

use std::time::Duration;

use thiserror::Error;

use crate::domain::rules::{DEFAULT_MAX_PLAYERS, DEFAULT_MIN_PLAYERS};

/// Lobby start gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartPolicy {
    /// Every non-host player must have marked ready.
    AllReady,
    /// Reaching the minimum headcount is enough.
    MinPlayers,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub max_players: usize,
    pub min_players: usize,
    pub start_policy: StartPolicy,
    /// Jitter applied to deck category fractions.
    pub deck_variance: f64,
    /// How long a disconnected player keeps their seat.
    pub grace_period: Duration,
    /// How often the reaper scans for stale rooms.
    pub sweep_interval: Duration,
    /// Idle time after which a LOBBY or PLAYING room is reaped.
    pub idle_threshold: Duration,
    /// Idle time after which any room is reaped regardless of phase.
    pub hard_ttl: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_players: DEFAULT_MAX_PLAYERS,
            min_players: DEFAULT_MIN_PLAYERS,
            start_policy: StartPolicy::AllReady,
            deck_variance: 0.10,
            grace_period: Duration::from_secs(30),
            sweep_interval: Duration::from_secs(5 * 60),
            idle_threshold: Duration::from_secs(5 * 60),
            hard_ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl GameConfig {
    /// Build a config from `FOXY_*` environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = read_env("FOXY_MAX_PLAYERS")? {
            config.max_players = v;
        }
        if let Some(v) = read_env("FOXY_MIN_PLAYERS")? {
            config.min_players = v;
        }
        if let Ok(raw) = std::env::var("FOXY_START_POLICY") {
            config.start_policy = match raw.as_str() {
                "all_ready" => StartPolicy::AllReady,
                "min_players" => StartPolicy::MinPlayers,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: "FOXY_START_POLICY".into(),
                        value: raw,
                    })
                }
            };
        }
        if let Some(v) = read_env::<f64>("FOXY_DECK_VARIANCE")? {
            config.deck_variance = v;
        }
        if let Some(v) = read_env("FOXY_GRACE_PERIOD_SECS")? {
            config.grace_period = Duration::from_secs(v);
        }
        if let Some(v) = read_env("FOXY_SWEEP_INTERVAL_SECS")? {
            config.sweep_interval = Duration::from_secs(v);
        }
        if let Some(v) = read_env("FOXY_IDLE_THRESHOLD_SECS")? {
            config.idle_threshold = Duration::from_secs(v);
        }
        if let Some(v) = read_env("FOXY_HARD_TTL_SECS")? {
            config.hard_ttl = Duration::from_secs(v);
        }

        Ok(config)
    }
}

fn read_env<T: std::str::FromStr>(var: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                var: var.to_string(),
                value: raw,
            }),
        Err(_) => Ok(None),
    }
}
