//! CAS protocol error types.
//!
//! Per-callback failure modes that are part of the normal handshake
//! (a rejected ticket, a correlation mismatch) are not errors; they are
//! reported through [`crate::handler::CallbackOutcome::Rejected`]. The
//! variants here cover state protection and backchannel transport.

use thiserror::Error;

use cas_core::ConfigError;
use cas_crypto::CryptoError;

/// Result type for CAS protocol operations.
pub type CasResult<T> = Result<T, CasError>;

/// CAS protocol errors.
#[derive(Debug, Error)]
pub enum CasError {
    /// A state token failed to decode or authenticate.
    #[error("the state was missing or invalid")]
    InvalidState,

    /// State data could not be serialized for protection.
    #[error("failed to protect state data: {0}")]
    StateProtection(String),

    /// A cryptographic operation failed.
    #[error("crypto failure: {0}")]
    Crypto(#[from] CryptoError),

    /// The backchannel call failed at the transport level.
    #[error("backchannel transport error: {0}")]
    Transport(String),

    /// The CAS server answered the backchannel call with a non-success
    /// status.
    #[error("remote server returned status {0}")]
    RemoteStatus(u16),

    /// The configuration was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
