//! Authenticated encryption for state tokens.
//!
//! [`StateCipher`] seals small payloads with AES-256-GCM so that any
//! modification of the sealed blob is detected on open. Decryption failures
//! are deliberately uniform: truncation, a flipped byte, and a wrong key all
//! surface as [`CryptoError::Open`] with no partial plaintext.

use aws_lc_rs::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use aws_lc_rs::digest;
use rand::Rng;
use thiserror::Error;

/// Errors raised by [`StateCipher`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// The key material was rejected by the cipher.
    #[error("invalid key material")]
    InvalidKey,

    /// Encryption failed.
    #[error("encryption failure")]
    Seal,

    /// Decryption or authentication failed.
    #[error("decryption failure")]
    Open,
}

/// AES-256-GCM cipher for sealing state tokens.
///
/// The sealed form is `nonce || ciphertext || tag` with a fresh random
/// 96-bit nonce per seal.
pub struct StateCipher {
    key: LessSafeKey,
}

impl StateCipher {
    /// Creates a cipher from a raw 256-bit key.
    pub fn new(key: &[u8; 32]) -> Result<Self, CryptoError> {
        let unbound = UnboundKey::new(&AES_256_GCM, key).map_err(|_| CryptoError::InvalidKey)?;
        Ok(Self {
            key: LessSafeKey::new(unbound),
        })
    }

    /// Derives a cipher key from an arbitrary configuration secret.
    ///
    /// The secret is hashed with SHA-384 and the first 32 bytes key the
    /// cipher, so secrets of any length are accepted.
    pub fn from_secret(secret: &[u8]) -> Result<Self, CryptoError> {
        let digest = digest::digest(&digest::SHA384, secret);
        let mut key = [0u8; 32];
        key.copy_from_slice(&digest.as_ref()[..32]);
        Self::new(&key)
    }

    /// Seals a payload, returning `nonce || ciphertext || tag`.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::rng().fill(&mut nonce_bytes[..]);

        let nonce = Nonce::assume_unique_for_key(nonce_bytes);
        let mut in_out = plaintext.to_vec();
        self.key
            .seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| CryptoError::Seal)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + in_out.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&in_out);
        Ok(sealed)
    }

    /// Opens a sealed payload, failing closed on any tampering.
    pub fn open(&self, sealed: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if sealed.len() < NONCE_LEN + AES_256_GCM.tag_len() {
            return Err(CryptoError::Open);
        }
        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
        let nonce =
            Nonce::try_assume_unique_for_key(nonce_bytes).map_err(|_| CryptoError::Open)?;

        let mut in_out = ciphertext.to_vec();
        let plaintext = self
            .key
            .open_in_place(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| CryptoError::Open)?;
        Ok(plaintext.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_open_round_trip() {
        let cipher = StateCipher::from_secret(b"round trip secret").unwrap();
        let sealed = cipher.seal(b"hello cas").unwrap();
        assert_eq!(cipher.open(&sealed).unwrap(), b"hello cas");
    }

    #[test]
    fn sealed_output_differs_per_call() {
        let cipher = StateCipher::from_secret(b"nonce secret").unwrap();
        let a = cipher.seal(b"payload").unwrap();
        let b = cipher.seal(b"payload").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn flipping_any_byte_fails_open() {
        let cipher = StateCipher::from_secret(b"tamper secret").unwrap();
        let sealed = cipher.seal(b"tamper me").unwrap();
        for i in 0..sealed.len() {
            let mut tampered = sealed.clone();
            tampered[i] ^= 0x01;
            assert_eq!(cipher.open(&tampered), Err(CryptoError::Open), "byte {i}");
        }
    }

    #[test]
    fn wrong_key_fails_open() {
        let sealer = StateCipher::from_secret(b"key one").unwrap();
        let opener = StateCipher::from_secret(b"key two").unwrap();
        let sealed = sealer.seal(b"cross key").unwrap();
        assert_eq!(opener.open(&sealed), Err(CryptoError::Open));
    }

    #[test]
    fn truncated_input_fails_open() {
        let cipher = StateCipher::from_secret(b"short secret").unwrap();
        assert_eq!(cipher.open(b""), Err(CryptoError::Open));
        assert_eq!(cipher.open(&[0u8; 8]), Err(CryptoError::Open));
    }

    #[test]
    fn empty_payload_round_trips() {
        let cipher = StateCipher::from_secret(b"empty secret").unwrap();
        let sealed = cipher.seal(b"").unwrap();
        assert_eq!(cipher.open(&sealed).unwrap(), b"");
    }
}
