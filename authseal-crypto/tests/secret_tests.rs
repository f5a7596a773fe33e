use authseal_crypto::{CryptoError, SecretString};

#[test]
fn display_is_masked() {
    let secret = SecretString::new("hunter2");
    let shown = secret.to_string();

    assert!(shown.starts_with("SHA256(secret):"));
    assert!(!shown.contains("hunter2"));
    // prefix + 64 hex chars
    assert_eq!(shown.len(), "SHA256(secret):".len() + 64);
}

#[test]
fn debug_is_masked() {
    let secret = SecretString::new("hunter2");
    assert!(!format!("{secret:?}").contains("hunter2"));
}

#[test]
fn mask_is_stable_and_distinguishes_values() {
    assert_eq!(SecretString::new("a").masked(), SecretString::new("a").masked());
    assert_ne!(SecretString::new("a").masked(), SecretString::new("b").masked());
}

#[test]
fn empty_secret_masks_to_empty() {
    let secret = SecretString::default();
    assert!(secret.is_empty());
    assert_eq!(secret.to_string(), "");
}

#[test]
fn json_serialization_masks_but_deserialization_reads_raw() {
    let json = serde_json::to_string(&SecretString::new("hunter2")).unwrap();
    assert!(!json.contains("hunter2"));

    let parsed: SecretString = serde_json::from_str("\"hunter2\"").unwrap();
    assert_eq!(parsed.expose(), "hunter2");
}

#[test]
fn secret_bytes_decodes_hex() {
    let secret = SecretString::new("00ff10");
    assert_eq!(secret.secret_bytes().unwrap().as_slice(), &[0x00, 0xff, 0x10]);
}

#[test]
fn secret_bytes_rejects_invalid_hex() {
    let err = SecretString::new("zz").secret_bytes().unwrap_err();
    assert!(matches!(err, CryptoError::InvalidSecret(_)));
}

#[test]
fn fixed_length_accessors_check_length() {
    let sixteen = SecretString::new("000102030405060708090a0b0c0d0e0f");
    assert_eq!(sixteen.secret_bytes16().unwrap()[15], 0x0f);
    assert!(sixteen.secret_bytes32().is_err());

    let thirty_two = SecretString::new("ab".repeat(32));
    assert_eq!(*thirty_two.secret_bytes32().unwrap(), [0xab; 32]);
    assert!(matches!(
        thirty_two.secret_bytes16(),
        Err(CryptoError::InvalidSecret(ref msg)) if msg == "secret is not 16 bytes"
    ));
}
