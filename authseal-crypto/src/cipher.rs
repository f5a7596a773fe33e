//! Authenticated-encryption primitives selectable by a stable identifier.
//!
//! Each variant fixes a key length, a nonce length and a sealed-box layout.
//! The numeric identifier is part of the stored configuration, so existing
//! identifiers must never be renumbered.

use crate::error::{CryptoError, CryptoResult};
use crypto_secretbox::aead::{AeadInPlace, KeyInit, Nonce, Tag};
use crypto_secretbox::XSalsa20Poly1305;
use serde::{Deserialize, Serialize};

/// Poly1305 tag size, prepended to every XSalsa20-Poly1305 box.
pub const TAG_SIZE: usize = 16;

/// Supported encryption algorithms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum Cipher {
    /// NaCl `secretbox`: XSalsa20 stream cipher with a Poly1305 tag.
    #[default]
    #[serde(rename = "xsalsa20-poly1305")]
    XSalsa20Poly1305 = 0,
}

impl Cipher {
    /// Returns the stable identifier of this cipher.
    pub fn id(self) -> i32 {
        self as i32
    }

    /// Key length in bytes.
    pub fn key_length(self) -> usize {
        match self {
            Cipher::XSalsa20Poly1305 => 32,
        }
    }

    /// Nonce length in bytes.
    pub fn nonce_length(self) -> usize {
        match self {
            Cipher::XSalsa20Poly1305 => 24,
        }
    }

    /// Seals `message` into a box laid out as `tag || ciphertext`.
    ///
    /// `key` and `nonce` must already have this cipher's lengths.
    pub fn seal(self, key: &[u8], nonce: &[u8], message: &[u8]) -> CryptoResult<Vec<u8>> {
        match self {
            Cipher::XSalsa20Poly1305 => seal_xsalsa20poly1305(key, nonce, message),
        }
    }

    /// Opens a box produced by [`Cipher::seal`].
    ///
    /// Returns `None` on any failure: bad lengths, truncated box or a tag
    /// that does not verify.
    pub fn open(self, key: &[u8], nonce: &[u8], sealed: &[u8]) -> Option<Vec<u8>> {
        match self {
            Cipher::XSalsa20Poly1305 => open_xsalsa20poly1305(key, nonce, sealed),
        }
    }
}

impl TryFrom<i32> for Cipher {
    type Error = CryptoError;

    fn try_from(id: i32) -> CryptoResult<Self> {
        match id {
            0 => Ok(Cipher::XSalsa20Poly1305),
            other => Err(CryptoError::UnknownCipher(other)),
        }
    }
}

fn seal_xsalsa20poly1305(key: &[u8], nonce: &[u8], message: &[u8]) -> CryptoResult<Vec<u8>> {
    let cipher = XSalsa20Poly1305::new_from_slice(key).map_err(|_| {
        CryptoError::KeyLengthMismatch {
            expected: Cipher::XSalsa20Poly1305.key_length(),
            actual: key.len(),
        }
    })?;
    if nonce.len() != Cipher::XSalsa20Poly1305.nonce_length() {
        return Err(CryptoError::Encryption(format!(
            "nonce must be {} bytes, got {}",
            Cipher::XSalsa20Poly1305.nonce_length(),
            nonce.len()
        )));
    }

    let mut sealed = vec![0u8; TAG_SIZE];
    sealed.extend_from_slice(message);
    let tag = cipher
        .encrypt_in_place_detached(
            Nonce::<XSalsa20Poly1305>::from_slice(nonce),
            b"",
            &mut sealed[TAG_SIZE..],
        )
        .map_err(|e| CryptoError::Encryption(format!("secretbox seal failed: {e}")))?;
    sealed[..TAG_SIZE].copy_from_slice(tag.as_slice());

    Ok(sealed)
}

fn open_xsalsa20poly1305(key: &[u8], nonce: &[u8], sealed: &[u8]) -> Option<Vec<u8>> {
    if nonce.len() != Cipher::XSalsa20Poly1305.nonce_length() || sealed.len() < TAG_SIZE {
        return None;
    }
    let cipher = XSalsa20Poly1305::new_from_slice(key).ok()?;

    let (tag, body) = sealed.split_at(TAG_SIZE);
    let mut plaintext = body.to_vec();
    cipher
        .decrypt_in_place_detached(
            Nonce::<XSalsa20Poly1305>::from_slice(nonce),
            b"",
            &mut plaintext,
            Tag::<XSalsa20Poly1305>::from_slice(tag),
        )
        .ok()?;

    Some(plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 32] = [7u8; 32];
    const NONCE: [u8; 24] = [9u8; 24];

    #[test]
    fn seal_then_open() {
        let sealed = Cipher::XSalsa20Poly1305.seal(&KEY, &NONCE, b"payload").unwrap();
        assert_eq!(sealed.len(), b"payload".len() + TAG_SIZE);

        let opened = Cipher::XSalsa20Poly1305.open(&KEY, &NONCE, &sealed).unwrap();
        assert_eq!(opened, b"payload");
    }

    #[test]
    fn open_rejects_flipped_tag() {
        let mut sealed = Cipher::XSalsa20Poly1305.seal(&KEY, &NONCE, b"payload").unwrap();
        sealed[0] ^= 0x01;
        assert!(Cipher::XSalsa20Poly1305.open(&KEY, &NONCE, &sealed).is_none());
    }

    #[test]
    fn open_rejects_truncated_box() {
        assert!(Cipher::XSalsa20Poly1305.open(&KEY, &NONCE, &[0u8; 15]).is_none());
    }

    #[test]
    fn seal_rejects_short_key() {
        let err = Cipher::XSalsa20Poly1305.seal(&KEY[..16], &NONCE, b"x").unwrap_err();
        assert_eq!(err, CryptoError::KeyLengthMismatch { expected: 32, actual: 16 });
    }

    #[test]
    fn identifier_round_trips() {
        let id = Cipher::XSalsa20Poly1305.id();
        assert_eq!(id, 0);
        assert_eq!(Cipher::try_from(id).unwrap(), Cipher::XSalsa20Poly1305);
        assert_eq!(Cipher::try_from(7), Err(CryptoError::UnknownCipher(7)));
    }
}
