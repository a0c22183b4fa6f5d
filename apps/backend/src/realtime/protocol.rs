//! Outbound realtime protocol.
//!
//! Messages are tagged JSON objects. Recoverable errors are only ever sent
//! to the acting player, never broadcast to the room.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::snapshot::{PlayerSnapshot, RoomSnapshot};
use crate::errors::DomainError;

/// Wire-level error classification for the acting player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BadRequest,
    Forbidden,
    NotFound,
    RoomUnavailable,
    Internal,
}

impl From<&DomainError> for ErrorCode {
    fn from(err: &DomainError) -> Self {
        match err {
            DomainError::Validation(_, _) => ErrorCode::BadRequest,
            DomainError::Forbidden(_) => ErrorCode::Forbidden,
            DomainError::NotFound(_, _) => ErrorCode::NotFound,
            DomainError::Capacity(_, _) => ErrorCode::RoomUnavailable,
            DomainError::Infra(_, _) => ErrorCode::Internal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// Full room snapshot; sent after any accepted mutation that does not
    /// have a more specific event.
    RoomState { room: RoomSnapshot },
    PlayerJoined { player: PlayerSnapshot },
    PlayerLeft { player_id: Uuid },
    GameStarted { room: RoomSnapshot },
    RoundCompleted { room: RoomSnapshot },
    GameCompleted { room: RoomSnapshot },
    /// The room was deleted by the reaper; no further messages will follow.
    RoomClosed { reason: String },
    /// Actor-only error reply.
    Error { code: ErrorCode, message: String },
}

impl ServerMsg {
    pub fn error(err: &DomainError) -> Self {
        ServerMsg::Error {
            code: ErrorCode::from(err),
            message: err.to_string(),
        }
    }
}
