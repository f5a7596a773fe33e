//! Configuration secrets that never print their value.

use crate::error::{CryptoError, CryptoResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

const MASK_PREFIX: &str = "SHA256(secret):";

/// A secret string, typically hex-encoded key material.
///
/// `Display`, `Debug` and `Serialize` all render a salted SHA-256 digest so
/// that logs and dumped configuration can tell secrets apart without
/// revealing them. Use [`SecretString::expose`] to read the value.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretString {
    value: Zeroizing<String>,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Zeroizing::new(value.into()),
        }
    }

    /// Returns the unmasked value.
    pub fn expose(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Masked form: `SHA256(secret):<hex digest>`, or empty for an empty secret.
    pub fn masked(&self) -> String {
        if self.value.is_empty() {
            return String::new();
        }
        let mut hasher = Sha256::new();
        hasher.update(MASK_PREFIX.as_bytes());
        hasher.update(self.value.as_bytes());
        format!("{MASK_PREFIX}{}", hex::encode(hasher.finalize()))
    }

    /// Hex-decodes the secret.
    pub fn secret_bytes(&self) -> CryptoResult<Zeroizing<Vec<u8>>> {
        hex::decode(self.value.as_str())
            .map(Zeroizing::new)
            .map_err(|e| CryptoError::InvalidSecret(format!("invalid hex value: {e}")))
    }

    /// Hex-decodes a 128-bit secret.
    pub fn secret_bytes16(&self) -> CryptoResult<Zeroizing<[u8; 16]>> {
        self.fixed_bytes::<16>()
    }

    /// Hex-decodes a 256-bit secret.
    pub fn secret_bytes32(&self) -> CryptoResult<Zeroizing<[u8; 32]>> {
        self.fixed_bytes::<32>()
    }

    fn fixed_bytes<const N: usize>(&self) -> CryptoResult<Zeroizing<[u8; N]>> {
        let bytes = self.secret_bytes()?;
        if bytes.len() != N {
            return Err(CryptoError::InvalidSecret(format!("secret is not {N} bytes")));
        }
        let mut out = Zeroizing::new([0u8; N]);
        out.copy_from_slice(&bytes);
        Ok(out)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.masked())
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SecretString").field(&self.masked()).finish()
    }
}

impl Serialize for SecretString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.masked())
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}
