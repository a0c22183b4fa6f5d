//! Room code generation and normalization.
//!
//! Room codes are 6-character strings using Crockford's Base32 alphabet,
//! drawn from the caller's RNG so tests stay deterministic.

use rand::Rng;

use crate::errors::{DomainError, ValidationKind};

const CROCKFORD: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ"; // no I, L, O, U

pub const ROOM_CODE_LEN: usize = 6;

pub fn generate_room_code(rng: &mut impl Rng) -> String {
    let mut s = String::with_capacity(ROOM_CODE_LEN);
    for _ in 0..ROOM_CODE_LEN {
        let idx = rng.random_range(0..CROCKFORD.len());
        s.push(CROCKFORD[idx] as char);
    }
    s
}

/// Canonicalize user-supplied room codes: trim, uppercase, check shape.
pub fn normalize_room_code(raw: &str) -> Result<String, DomainError> {
    let code = raw.trim().to_ascii_uppercase();
    if code.len() != ROOM_CODE_LEN || !code.bytes().all(|b| CROCKFORD.contains(&b)) {
        return Err(DomainError::validation(
            ValidationKind::MalformedRoomCode,
            "room code must be 6 characters",
        ));
    }
    Ok(code)
}
