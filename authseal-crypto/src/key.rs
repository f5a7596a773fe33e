//! Deterministic key derivation with HKDF-SHA256.
//!
//! A [`KeyGenerator`] extracts a pseudorandom key from the root secret once,
//! then expands any number of purpose-labelled subkeys from it. The output
//! for a given `(secret, info, length)` triple is a permanent compatibility
//! contract: data encrypted by older deployments is decrypted with keys
//! re-derived at startup.

use crate::cipher::Cipher;
use crate::error::{CryptoError, CryptoResult};
use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroizing;

/// Label under which the platform derives its field-encryption key.
pub const FIELD_ENCRYPTOR_LABEL: &str = "FieldEncryptor/Xsalsa20Poly1305";

/// Largest output HKDF-SHA256 can expand to (255 blocks of 32 bytes).
pub const MAX_DERIVED_LENGTH: usize = 255 * 32;

const EXTRACT_SALT: [u8; 32] = [0u8; 32];

/// Derives subkeys from a root secret.
#[derive(Clone)]
pub struct KeyGenerator {
    hkdf: Hkdf<Sha256>,
}

impl KeyGenerator {
    /// Runs HKDF-Extract over `secret` with a 32-byte zero salt.
    ///
    /// Any secret length is accepted, including empty.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            hkdf: Hkdf::<Sha256>::new(Some(&EXTRACT_SALT), secret),
        }
    }

    /// Expands `length` bytes bound to `info`.
    pub fn derive(&self, info: &str, length: usize) -> CryptoResult<DerivedKey> {
        if length > MAX_DERIVED_LENGTH {
            return Err(CryptoError::KeyDerivation {
                info: info.to_string(),
                length,
            });
        }
        let mut okm = Zeroizing::new(vec![0u8; length]);
        self.hkdf
            .expand(info.as_bytes(), okm.as_mut_slice())
            .map_err(|_| CryptoError::KeyDerivation {
                info: info.to_string(),
                length,
            })?;
        Ok(DerivedKey { bytes: okm })
    }

    /// Derives a key sized for `cipher`.
    pub fn derive_key(&self, info: &str, cipher: Cipher) -> CryptoResult<Key> {
        let derived = self.derive(info, cipher.key_length())?;
        Ok(Key {
            bytes: derived.bytes,
            cipher,
        })
    }
}

impl std::fmt::Debug for KeyGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyGenerator")
            .field("prk", &"[REDACTED]")
            .finish()
    }
}

/// Output of [`KeyGenerator::derive`]. Zeroed on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedKey {
    bytes: Zeroizing<Vec<u8>>,
}

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("len", &self.bytes.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Key material paired with the cipher it is used with.
#[derive(Clone)]
pub struct Key {
    bytes: Zeroizing<Vec<u8>>,
    cipher: Cipher,
}

impl Key {
    /// Wraps raw key bytes, checking them against the cipher's key length.
    pub fn new(bytes: &[u8], cipher: Cipher) -> CryptoResult<Self> {
        if bytes.len() != cipher.key_length() {
            return Err(CryptoError::KeyLengthMismatch {
                expected: cipher.key_length(),
                actual: bytes.len(),
            });
        }
        Ok(Self {
            bytes: Zeroizing::new(bytes.to_vec()),
            cipher,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn cipher(&self) -> Cipher {
        self.cipher
    }
}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Key")
            .field("cipher", &self.cipher)
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}
