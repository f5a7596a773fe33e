//! Encryptor configuration.

use crate::cipher::Cipher;
use crate::encryptor::MessageEncryptor;
use crate::error::{CryptoError, CryptoResult};
use crate::key::{Key, KeyGenerator, FIELD_ENCRYPTOR_LABEL};
use crate::secret::SecretString;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Minimum decoded length of a root secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Settings for building the platform's field encryptor at startup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EncryptorConfig {
    /// Hex-encoded root secret for the active key.
    pub secret_key_base: SecretString,

    /// Hex-encoded secrets of retired keys, newest first.
    #[serde(default)]
    pub legacy_secret_key_bases: Vec<SecretString>,

    /// HKDF info label for the encryption subkey.
    #[serde(default = "default_key_label")]
    pub key_label: String,

    #[serde(default)]
    pub cipher: Cipher,
}

fn default_key_label() -> String {
    FIELD_ENCRYPTOR_LABEL.to_string()
}

impl EncryptorConfig {
    /// Config with a single root secret and default label and cipher.
    pub fn new(secret_key_base: impl Into<SecretString>) -> Self {
        Self {
            secret_key_base: secret_key_base.into(),
            legacy_secret_key_bases: Vec::new(),
            key_label: default_key_label(),
            cipher: Cipher::default(),
        }
    }

    /// Adds a retired secret that should still decrypt stored data.
    pub fn with_legacy_secret(mut self, secret: impl Into<SecretString>) -> Self {
        self.legacy_secret_key_bases.push(secret.into());
        self
    }

    /// Derives every configured key and returns a ready encryptor.
    ///
    /// The active key comes from `secret_key_base`; legacy keys follow in
    /// listed order.
    pub fn build_encryptor(&self) -> CryptoResult<MessageEncryptor> {
        let active = self.derive_from(&self.secret_key_base)?;
        let mut builder = MessageEncryptor::builder(active.as_bytes(), self.cipher)?;
        for legacy in &self.legacy_secret_key_bases {
            builder = builder.add_key(self.derive_from(legacy)?);
        }
        debug!(
            legacy_keys = self.legacy_secret_key_bases.len(),
            label = %self.key_label,
            "building field encryptor"
        );
        Ok(builder.build())
    }

    fn derive_from(&self, secret: &SecretString) -> CryptoResult<Key> {
        let bytes = secret.secret_bytes()?;
        if bytes.len() < MIN_SECRET_LEN {
            return Err(CryptoError::InvalidSecret(format!(
                "secret must be a hex string of at least {MIN_SECRET_LEN} bytes"
            )));
        }
        KeyGenerator::new(&bytes).derive_key(&self.key_label, self.cipher)
    }
}
