//! Cryptographically secure random generation.
//!
//! Used for correlation nonces and AEAD nonces. All functions use the
//! thread-local random number generator, which is cryptographically secure
//! by default.

use rand::distr::{Alphanumeric, SampleString};
use rand::Rng;

/// Length of a correlation nonce in characters.
pub const CORRELATION_NONCE_LEN: usize = 32;

/// Generates `len` cryptographically secure random bytes.
#[must_use]
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut rng = rand::rng();
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes[..]);
    bytes
}

/// Generates a random string of `len` alphanumeric characters.
#[must_use]
pub fn random_alphanumeric(len: usize) -> String {
    let mut rng = rand::rng();
    Alphanumeric.sample_string(&mut rng, len)
}

/// Generates a correlation nonce for a challenge/callback round trip.
///
/// A 32-character alphanumeric nonce carries roughly 190 bits of entropy,
/// comfortably above the 128-bit minimum for an unguessable token.
#[must_use]
pub fn correlation_nonce() -> String {
    random_alphanumeric(CORRELATION_NONCE_LEN)
}
