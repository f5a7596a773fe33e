//! Field codec error types.

use authseal_crypto::CryptoError;
use thiserror::Error;

/// Result type for record encryption and decryption.
pub type CodecResult<T> = Result<T, CodecError>;

/// A record schema was declared inconsistently.
///
/// Returned once by [`crate::RecordSchemaBuilder::build`], so a schema that
/// exists is always valid.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("record type name is empty")]
    EmptyTypeName,

    #[error("field name is empty")]
    EmptyFieldName,

    #[error("cipher field name for {field} is empty")]
    EmptyCipherField { field: String },

    #[error("field {field} is declared more than once")]
    DuplicateField { field: String },

    #[error("cipher field {field} is the target of more than one field")]
    DuplicateCipherField { field: String },

    #[error("cipher field {field} is also declared as a plaintext field")]
    CipherFieldIsPlaintext { field: String },

    #[error("purpose override has no preceding encrypted field")]
    PurposeWithoutField,
}

/// Failure while transforming a record.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Encrypting or decrypting `field` failed.
    ///
    /// The source stays opaque; for decryption it is always
    /// [`CryptoError::Decryption`].
    #[error("cannot process encrypted field {field}: {source}")]
    Crypto {
        field: String,
        #[source]
        source: CryptoError,
    },

    /// Decrypted bytes destined for a string field were not valid UTF-8.
    #[error("decrypted value for {field} is not valid UTF-8")]
    InvalidUtf8 { field: String },
}

impl CodecError {
    /// Name of the field that failed, prefixed with its parents for nested
    /// records.
    pub fn field(&self) -> &str {
        match self {
            Self::Crypto { field, .. } | Self::InvalidUtf8 { field } => field,
        }
    }

    pub(crate) fn within(self, parent: &str) -> Self {
        match self {
            Self::Crypto { field, source } => Self::Crypto {
                field: format!("{parent}.{field}"),
                source,
            },
            Self::InvalidUtf8 { field } => Self::InvalidUtf8 {
                field: format!("{parent}.{field}"),
            },
        }
    }
}
