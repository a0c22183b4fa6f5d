//! Domain-level error type used across the coordinator, store and lifecycle
//! layers.
//!
//! This error type is transport-agnostic. The realtime layer converts it to a
//! wire-level error code when replying to the acting player; recoverable
//! errors are never broadcast to the room.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Validation error kinds (extend as needed)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    EmptyName,
    MalformedRoomCode,
    AlreadyInRoom,
    PhaseMismatch,
    NotEnoughPlayers,
    PlayersNotReady,
    DuplicateSubmission,
    BetAlreadyUsed,
    GuessOutOfRange,
}

/// Domain-level not found entities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Room,
    Player,
}

/// Capacity / admission error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum CapacityKind {
    RoomFull,
    NotInLobby,
}

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    StoreUnavailable,
    OptimisticLock,
    DataCorruption,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input/user validation or business rule violation
    Validation(ValidationKind, String),
    /// Actor lacks the authority for the action (e.g. non-host start)
    Forbidden(String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// Admission refused: room full or not accepting members
    Capacity(CapacityKind, String),
    /// Infrastructure/operational failures
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation {kind:?}: {d}"),
            DomainError::Forbidden(d) => write!(f, "forbidden: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Capacity(kind, d) => write!(f, "capacity {kind:?}: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::Forbidden(detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn capacity(kind: CapacityKind, detail: impl Into<String>) -> Self {
        Self::Capacity(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }
}
