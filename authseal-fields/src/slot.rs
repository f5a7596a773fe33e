//! Field representations the codec reads and writes.
//!
//! A bare `String` is present exactly when it is non-empty, so an empty
//! string and an absent value are stored the same way. Use `Option` types
//! where the distinction matters.

use std::string::FromUtf8Error;

/// A plaintext field.
pub trait Plaintext {
    /// Current value, or `None` when absent.
    fn plaintext(&self) -> Option<&[u8]>;

    /// Stores a decrypted value, or marks the field absent.
    fn set_plaintext(&mut self, value: Option<Vec<u8>>) -> Result<(), FromUtf8Error>;
}

/// A field holding a ciphertext token.
pub trait Ciphertext {
    fn ciphertext(&self) -> Option<&str>;

    fn set_ciphertext(&mut self, value: Option<String>);
}

impl Plaintext for String {
    fn plaintext(&self) -> Option<&[u8]> {
        (!self.is_empty()).then_some(self.as_bytes())
    }

    fn set_plaintext(&mut self, value: Option<Vec<u8>>) -> Result<(), FromUtf8Error> {
        *self = match value {
            Some(bytes) => String::from_utf8(bytes)?,
            None => String::new(),
        };
        Ok(())
    }
}

impl Plaintext for Option<String> {
    fn plaintext(&self) -> Option<&[u8]> {
        self.as_deref().map(str::as_bytes)
    }

    fn set_plaintext(&mut self, value: Option<Vec<u8>>) -> Result<(), FromUtf8Error> {
        *self = value.map(String::from_utf8).transpose()?;
        Ok(())
    }
}

impl Plaintext for Option<Vec<u8>> {
    fn plaintext(&self) -> Option<&[u8]> {
        self.as_deref()
    }

    fn set_plaintext(&mut self, value: Option<Vec<u8>>) -> Result<(), FromUtf8Error> {
        *self = value;
        Ok(())
    }
}

impl Ciphertext for String {
    fn ciphertext(&self) -> Option<&str> {
        (!self.is_empty()).then_some(self.as_str())
    }

    fn set_ciphertext(&mut self, value: Option<String>) {
        *self = value.unwrap_or_default();
    }
}

impl Ciphertext for Option<String> {
    fn ciphertext(&self) -> Option<&str> {
        self.as_deref()
    }

    fn set_ciphertext(&mut self, value: Option<String>) {
        *self = value;
    }
}
