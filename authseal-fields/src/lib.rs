//! Field-level encryption for authseal records.
//!
//! A record type declares which of its fields hold secrets and where their
//! ciphertexts live. The declaration is a [`RecordSchema`], built and
//! validated once with typed accessors:
//!
//! ```
//! use authseal_crypto::{Cipher, MessageEncryptor};
//! use authseal_fields::{FieldEncryptor, RecordSchema};
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Identity {
//!     email: String,
//!     encrypted_email: String,
//! }
//!
//! let schema = RecordSchema::<Identity>::builder("Identity")
//!     .field("email", |i| &mut i.email, |i| &mut i.encrypted_email)
//!     .build()
//!     .unwrap();
//!
//! let encryptor = MessageEncryptor::new(&[7u8; 32], Cipher::XSalsa20Poly1305).unwrap();
//! let fields = FieldEncryptor::new(Arc::new(encryptor));
//!
//! let mut identity = Identity { email: "ada@example.com".into(), ..Default::default() };
//! fields.encrypt_record(&schema, &mut identity).unwrap();
//! identity.email.clear();
//! fields.decrypt_record(&schema, &mut identity).unwrap();
//! assert_eq!(identity.email, "ada@example.com");
//! ```
//!
//! Each ciphertext is bound to a purpose, `struct:<type>.<cipher field>` by
//! default, so a value copied into another field does not decrypt there.

mod codec;
mod error;
pub mod schema;
pub mod slot;

pub use codec::FieldEncryptor;
pub use error::{CodecError, CodecResult, SchemaError};
pub use schema::{Correspondence, RecordSchema, RecordSchemaBuilder, DEFAULT_CIPHER_PREFIX};
pub use slot::{Ciphertext, Plaintext};
