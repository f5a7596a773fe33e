//! Purpose-bound message encryption with key rotation.
//!
//! A [`MessageEncryptor`] seals every message with its active key and opens
//! ciphertexts by trying each configured key in order. The purpose is packed
//! inside the authenticated payload together with the plaintext, so a
//! ciphertext only opens under the exact purpose it was sealed with.
//!
//! # Wire format
//!
//! ```text
//! base64url_nopad( nonce[24] || secretbox( msgpack([plaintext, purpose]) ) )
//! ```
//!
//! Stored ciphertexts depend on this layout; it must not change.

use crate::cipher::Cipher;
use crate::error::{CryptoError, CryptoResult};
use crate::key::Key;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use serde_bytes::{ByteBuf, Bytes};
use tracing::debug;

/// Purpose-bound encryption of opaque byte strings.
///
/// Consumers such as the field codec depend on `&dyn DataEncryptor` and
/// never see key material.
pub trait DataEncryptor: Send + Sync {
    /// Encrypts `plaintext` for `purpose`, returning a printable token.
    fn encrypt(&self, plaintext: &[u8], purpose: &[u8]) -> CryptoResult<String>;

    /// Decrypts a token produced by [`DataEncryptor::encrypt`] with the same purpose.
    fn decrypt(&self, ciphertext: &str, purpose: &[u8]) -> CryptoResult<Vec<u8>>;
}

/// Encrypts with the first key, decrypts with any of them.
///
/// Immutable once built: rotation keys are supplied through
/// [`MessageEncryptorBuilder`] or [`MessageEncryptor::from_keys`].
#[derive(Clone, Debug)]
pub struct MessageEncryptor {
    keys: Vec<Key>,
}

impl MessageEncryptor {
    /// Creates an encryptor with a single active key.
    pub fn new(key: &[u8], cipher: Cipher) -> CryptoResult<Self> {
        Ok(Self::builder(key, cipher)?.build())
    }

    /// Starts an encryptor whose active key is `key`; older keys are added
    /// with [`MessageEncryptorBuilder::add_old_key`].
    pub fn builder(key: &[u8], cipher: Cipher) -> CryptoResult<MessageEncryptorBuilder> {
        Ok(MessageEncryptorBuilder {
            keys: vec![Key::new(key, cipher)?],
        })
    }

    /// Creates an encryptor from a full key list. Index 0 is the active key.
    pub fn from_keys(keys: Vec<Key>) -> CryptoResult<Self> {
        if keys.is_empty() {
            return Err(CryptoError::EmptyKeyRing);
        }
        Ok(Self::ready(keys))
    }

    fn ready(keys: Vec<Key>) -> Self {
        debug!(
            key_count = keys.len(),
            cipher = ?keys[0].cipher(),
            "message encryptor ready"
        );
        Self { keys }
    }

    /// Number of keys tried during decryption.
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Cipher of the key used for new encryptions.
    pub fn active_cipher(&self) -> Cipher {
        self.active_key().cipher()
    }

    fn active_key(&self) -> &Key {
        // Both constructors guarantee at least one key.
        &self.keys[0]
    }

    /// Encrypts `plaintext` with the active key, binding it to `purpose`.
    pub fn encrypt(&self, plaintext: &[u8], purpose: &[u8]) -> CryptoResult<String> {
        seal(self.active_key(), plaintext, purpose)
    }

    /// Decrypts `ciphertext`, trying every key in order.
    ///
    /// Every failure mode collapses into [`CryptoError::Decryption`].
    pub fn decrypt(&self, ciphertext: &str, purpose: &[u8]) -> CryptoResult<Vec<u8>> {
        for (index, key) in self.keys.iter().enumerate() {
            if let Some(plaintext) = open(key, ciphertext, purpose) {
                if index > 0 {
                    debug!(key_index = index, "ciphertext opened with a legacy key");
                }
                return Ok(plaintext);
            }
        }
        Err(CryptoError::Decryption)
    }
}

impl DataEncryptor for MessageEncryptor {
    fn encrypt(&self, plaintext: &[u8], purpose: &[u8]) -> CryptoResult<String> {
        MessageEncryptor::encrypt(self, plaintext, purpose)
    }

    fn decrypt(&self, ciphertext: &str, purpose: &[u8]) -> CryptoResult<Vec<u8>> {
        MessageEncryptor::decrypt(self, ciphertext, purpose)
    }
}

/// Collects rotation keys before the encryptor is shared.
#[derive(Debug)]
pub struct MessageEncryptorBuilder {
    keys: Vec<Key>,
}

impl MessageEncryptorBuilder {
    /// Appends a legacy key, tried after every key added before it.
    pub fn add_old_key(mut self, key: &[u8], cipher: Cipher) -> CryptoResult<Self> {
        self.keys.push(Key::new(key, cipher)?);
        Ok(self)
    }

    /// Appends an already validated legacy key.
    pub fn add_key(mut self, key: Key) -> Self {
        self.keys.push(key);
        self
    }

    pub fn build(self) -> MessageEncryptor {
        MessageEncryptor::ready(self.keys)
    }
}

fn seal(key: &Key, plaintext: &[u8], purpose: &[u8]) -> CryptoResult<String> {
    let cipher = key.cipher();

    let mut nonce = vec![0u8; cipher.nonce_length()];
    rand::rng().fill_bytes(&mut nonce);

    let packed = rmp_serde::to_vec(&(Bytes::new(plaintext), Bytes::new(purpose)))
        .map_err(|e| CryptoError::Encryption(format!("cannot pack payload: {e}")))?;
    let sealed = cipher.seal(key.as_bytes(), &nonce, &packed)?;

    let mut raw = nonce;
    raw.extend_from_slice(&sealed);
    Ok(URL_SAFE_NO_PAD.encode(raw))
}

fn open(key: &Key, ciphertext: &str, purpose: &[u8]) -> Option<Vec<u8>> {
    let cipher = key.cipher();

    let raw = URL_SAFE_NO_PAD.decode(ciphertext).ok()?;
    if raw.len() < cipher.nonce_length() {
        return None;
    }
    let (nonce, sealed) = raw.split_at(cipher.nonce_length());

    let packed = cipher.open(key.as_bytes(), nonce, sealed)?;
    // Nil entries decode as empty byte strings.
    let mut entries: Vec<Option<ByteBuf>> = rmp_serde::from_slice(&packed).ok()?;
    if entries.len() < 2 {
        return None;
    }
    let sealed_purpose = entries[1].as_ref().map_or(&[][..], |p| p.as_slice());
    if sealed_purpose != purpose {
        return None;
    }
    Some(entries.swap_remove(0).map(ByteBuf::into_vec).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> Key {
        Key::new(&[byte; 32], Cipher::XSalsa20Poly1305).unwrap()
    }

    #[test]
    fn packed_payload_is_array_of_bins() {
        let packed = rmp_serde::to_vec(&(Bytes::new(b"hi"), Bytes::new(b"p"))).unwrap();
        assert_eq!(packed, vec![0x92, 0xc4, 0x02, b'h', b'i', 0xc4, 0x01, b'p']);
    }

    #[test]
    fn open_accepts_str_encoded_entries() {
        let k = key(1);
        let packed = vec![0x92, 0xa2, b'h', b'i', 0xa1, b'p'];
        let nonce = [3u8; 24];
        let mut raw = nonce.to_vec();
        raw.extend(Cipher::XSalsa20Poly1305.seal(k.as_bytes(), &nonce, &packed).unwrap());

        let plaintext = open(&k, &URL_SAFE_NO_PAD.encode(raw), b"p").unwrap();
        assert_eq!(plaintext, b"hi");
    }

    #[test]
    fn open_rejects_single_entry_payload() {
        let k = key(1);
        let packed = vec![0x91, 0xc4, 0x02, b'h', b'i'];
        let nonce = [3u8; 24];
        let mut raw = nonce.to_vec();
        raw.extend(Cipher::XSalsa20Poly1305.seal(k.as_bytes(), &nonce, &packed).unwrap());

        assert!(open(&k, &URL_SAFE_NO_PAD.encode(raw), b"").is_none());
    }

    #[test]
    fn open_treats_nil_entries_as_empty() {
        let k = key(1);
        let packed = vec![0x92, 0xc0, 0xc0];
        let nonce = [5u8; 24];
        let mut raw = nonce.to_vec();
        raw.extend(Cipher::XSalsa20Poly1305.seal(k.as_bytes(), &nonce, &packed).unwrap());

        let plaintext = open(&k, &URL_SAFE_NO_PAD.encode(raw), b"").unwrap();
        assert!(plaintext.is_empty());
    }

    #[test]
    fn open_rejects_ciphertext_shorter_than_nonce() {
        assert!(open(&key(1), &URL_SAFE_NO_PAD.encode([0u8; 10]), b"p").is_none());
    }

    #[test]
    fn output_is_nonce_plus_box() {
        let encryptor = MessageEncryptor::from_keys(vec![key(1)]).unwrap();
        let ciphertext = encryptor.encrypt(b"hello world", b"additional_data").unwrap();
        let raw = URL_SAFE_NO_PAD.decode(&ciphertext).unwrap();

        // nonce + tag + fixarray + 2 * bin8 header + payloads
        assert_eq!(raw.len(), 24 + 16 + 1 + 2 + 11 + 2 + 15);
        assert!(!ciphertext.contains('='));
    }
}
