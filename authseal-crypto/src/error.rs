//! Error types for key derivation and message encryption.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur while deriving keys or encrypting messages.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Key material does not match the cipher's key length.
    #[error("key length mismatch: expected {expected}, got {actual}")]
    KeyLengthMismatch { expected: usize, actual: usize },

    /// Requested derived key is longer than HKDF-SHA256 can produce.
    #[error("cannot derive {length}-byte key for {info:?}")]
    KeyDerivation { info: String, length: usize },

    /// The ciphertext could not be opened by any key for the given purpose.
    ///
    /// Deliberately carries no detail about which key or which step failed.
    #[error("decryption failed")]
    Decryption,

    /// Sealing a message failed.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// An encryptor needs at least one key.
    #[error("encryptor requires at least one key")]
    EmptyKeyRing,

    /// A stored cipher identifier has no matching [`crate::Cipher`].
    #[error("unknown cipher identifier: {0}")]
    UnknownCipher(i32),

    /// Secret material from configuration is malformed.
    #[error("invalid secret: {0}")]
    InvalidSecret(String),
}
