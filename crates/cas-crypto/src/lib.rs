//! # cas-crypto
//!
//! Cryptographic operations for the CAS client using aws-lc-rs.
//!
//! Provides the two primitives the handshake needs:
//!
//! - [`aead`] - AES-256-GCM sealing for the tamper-evident state token
//! - [`random`] - cryptographically secure correlation nonces
//!
//! Key material is supplied by the host's configuration; key lifecycle and
//! rotation are outside this crate.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod aead;
pub mod random;

pub use aead::{CryptoError, StateCipher};
pub use random::{correlation_nonce, random_alphanumeric, random_bytes};
