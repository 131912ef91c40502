//! Tamper-evident state token.
//!
//! The state token carries the caller's return URI and a correlation nonce
//! across the browser redirect to the CAS server and back. It is sealed
//! with authenticated encryption: a token produced by one codec instance
//! can only be decoded by a codec holding the same key, and any
//! modification makes decoding fail as a unit. No expiry is enforced here;
//! correlation freshness is the orchestrator's concern.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cas_crypto::StateCipher;

use crate::error::{CasError, CasResult};

/// Data protected inside a state token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateProperties {
    /// Where to send the caller after the handshake completes.
    pub return_uri: String,

    /// Nonce tying the callback to the challenge that issued it.
    pub correlation_nonce: String,

    /// When the challenge was issued. Carried for hosts that apply their
    /// own freshness window; the codec itself does not expire tokens.
    pub created_at: DateTime<Utc>,
}

impl StateProperties {
    /// Creates properties stamped with the current time.
    #[must_use]
    pub fn new(return_uri: impl Into<String>, correlation_nonce: impl Into<String>) -> Self {
        Self {
            return_uri: return_uri.into(),
            correlation_nonce: correlation_nonce.into(),
            created_at: Utc::now(),
        }
    }
}

/// Encodes and decodes state tokens.
///
/// The encoded form is URL-safe base64 over the sealed JSON payload, so a
/// token can ride in a query parameter without further escaping.
pub struct StateCodec {
    cipher: StateCipher,
}

impl StateCodec {
    /// Creates a codec around an existing cipher.
    #[must_use]
    pub fn new(cipher: StateCipher) -> Self {
        Self { cipher }
    }

    /// Creates a codec keyed by a configuration secret.
    pub fn from_secret(secret: &[u8]) -> CasResult<Self> {
        Ok(Self::new(StateCipher::from_secret(secret)?))
    }

    /// Encodes properties into an opaque state token.
    pub fn encode(&self, properties: &StateProperties) -> CasResult<String> {
        let payload = serde_json::to_vec(properties)
            .map_err(|e| CasError::StateProtection(e.to_string()))?;
        let sealed = self.cipher.seal(&payload)?;
        Ok(URL_SAFE_NO_PAD.encode(sealed))
    }

    /// Decodes a state token.
    ///
    /// Fails closed with [`CasError::InvalidState`] on any malformed,
    /// tampered, or foreign-key token; no partial fields are ever returned.
    pub fn decode(&self, token: &str) -> CasResult<StateProperties> {
        let sealed = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| CasError::InvalidState)?;
        let payload = self
            .cipher
            .open(&sealed)
            .map_err(|_| CasError::InvalidState)?;
        serde_json::from_slice(&payload).map_err(|_| CasError::InvalidState)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> StateCodec {
        StateCodec::from_secret(b"state codec test secret").unwrap()
    }

    #[test]
    fn encode_decode_round_trip() {
        let codec = codec();
        let properties = StateProperties::new("https://app.example.com/return", "nonce-123");
        let token = codec.encode(&properties).unwrap();
        let decoded = codec.decode(&token).unwrap();
        assert_eq!(decoded, properties);
    }

    #[test]
    fn token_is_query_safe() {
        let codec = codec();
        let token = codec
            .encode(&StateProperties::new("https://a/b?c=d&e=f", "n"))
            .unwrap();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn flipping_any_byte_invalidates_the_token() {
        let codec = codec();
        let token = codec
            .encode(&StateProperties::new("https://app/", "nonce"))
            .unwrap();
        let sealed = URL_SAFE_NO_PAD.decode(&token).unwrap();
        for i in 0..sealed.len() {
            let mut tampered = sealed.clone();
            tampered[i] ^= 0x01;
            let tampered_token = URL_SAFE_NO_PAD.encode(&tampered);
            assert!(
                matches!(codec.decode(&tampered_token), Err(CasError::InvalidState)),
                "byte {i} survived tampering"
            );
        }
    }

    #[test]
    fn token_from_a_different_key_is_rejected() {
        let token = codec()
            .encode(&StateProperties::new("https://app/", "nonce"))
            .unwrap();
        let other = StateCodec::from_secret(b"a different secret").unwrap();
        assert!(matches!(other.decode(&token), Err(CasError::InvalidState)));
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        let codec = codec();
        assert!(matches!(codec.decode(""), Err(CasError::InvalidState)));
        assert!(matches!(
            codec.decode("not!base64!!"),
            Err(CasError::InvalidState)
        ));
        assert!(matches!(codec.decode("AAAA"), Err(CasError::InvalidState)));
    }
}
