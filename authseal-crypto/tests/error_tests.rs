use authseal_crypto::CryptoError;

#[test]
fn key_length_mismatch_display() {
    let err = CryptoError::KeyLengthMismatch { expected: 32, actual: 16 };
    assert_eq!(err.to_string(), "key length mismatch: expected 32, got 16");
}

#[test]
fn key_derivation_display() {
    let err = CryptoError::KeyDerivation { info: "FieldEncryptor/X".into(), length: 9000 };
    assert_eq!(err.to_string(), "cannot derive 9000-byte key for \"FieldEncryptor/X\"");
}

#[test]
fn decryption_display_carries_no_detail() {
    assert_eq!(CryptoError::Decryption.to_string(), "decryption failed");
}

#[test]
fn encryption_display() {
    let err = CryptoError::Encryption("pack failed".into());
    assert_eq!(err.to_string(), "encryption failed: pack failed");
}

#[test]
fn empty_key_ring_display() {
    assert_eq!(CryptoError::EmptyKeyRing.to_string(), "encryptor requires at least one key");
}

#[test]
fn unknown_cipher_display() {
    assert_eq!(CryptoError::UnknownCipher(3).to_string(), "unknown cipher identifier: 3");
}

#[test]
fn invalid_secret_display() {
    let err = CryptoError::InvalidSecret("secret is not 32 bytes".into());
    assert_eq!(err.to_string(), "invalid secret: secret is not 32 bytes");
}
