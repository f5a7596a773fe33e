//! Declarative plaintext ↔ ciphertext correspondences for a record type.
//!
//! A [`RecordSchema`] is built once, usually at service registration, from
//! typed accessors. Field types are checked by the compiler through the
//! [`Plaintext`] and [`Ciphertext`] traits; naming mistakes are caught by
//! [`RecordSchemaBuilder::build`]. Encrypting or decrypting a record never
//! re-validates the schema.
//!
//! ```
//! use authseal_fields::RecordSchema;
//!
//! #[derive(Default)]
//! struct Factor {
//!     secret: Option<String>,
//!     encrypted_secret: Option<String>,
//! }
//!
//! let schema = RecordSchema::<Factor>::builder("Factor")
//!     .field("secret", |f| &mut f.secret, |f| &mut f.encrypted_secret)
//!     .purpose("second_factors.content.secret")
//!     .build()
//!     .unwrap();
//! assert_eq!(schema.correspondences()[0].cipher_field, "encrypted_secret");
//! ```

use crate::codec::{Accessors, FieldAccess, Nested, NestedRecord};
use crate::error::SchemaError;
use crate::slot::{Ciphertext, Plaintext};
use std::collections::HashSet;

/// Prefix of a default cipher field name.
pub const DEFAULT_CIPHER_PREFIX: &str = "encrypted_";

/// Validated correspondence table for records of type `R`.
pub struct RecordSchema<R> {
    pub(crate) type_name: String,
    pub(crate) bindings: Vec<Binding<R>>,
}

pub(crate) enum Binding<R> {
    Field(FieldBinding<R>),
    Nested(NestedBinding<R>),
}

pub(crate) struct FieldBinding<R> {
    pub(crate) plain_field: String,
    pub(crate) cipher_field: String,
    pub(crate) purpose: Vec<u8>,
    pub(crate) access: Box<dyn FieldAccess<R>>,
}

pub(crate) struct NestedBinding<R> {
    pub(crate) field: String,
    pub(crate) record: Box<dyn NestedRecord<R>>,
}

/// One plaintext field, the field its ciphertext is stored in, and the
/// purpose the ciphertext is bound to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Correspondence {
    /// Plaintext field name; nested fields are prefixed with `parent.`.
    pub plain_field: String,
    pub cipher_field: String,
    pub purpose: Vec<u8>,
}

impl<R: 'static> RecordSchema<R> {
    /// Starts a schema. `type_name` appears in default purposes as
    /// `struct:<type_name>.<cipher_field>`.
    pub fn builder(type_name: impl Into<String>) -> RecordSchemaBuilder<R> {
        RecordSchemaBuilder {
            type_name: type_name.into(),
            bindings: Vec::new(),
            error: None,
        }
    }
}

impl<R> RecordSchema<R> {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Every encrypted field, with nested records flattened in declaration order.
    pub fn correspondences(&self) -> Vec<Correspondence> {
        let mut out = Vec::new();
        for binding in &self.bindings {
            match binding {
                Binding::Field(field) => out.push(Correspondence {
                    plain_field: field.plain_field.clone(),
                    cipher_field: field.cipher_field.clone(),
                    purpose: field.purpose.clone(),
                }),
                Binding::Nested(nested) => {
                    out.extend(nested.record.correspondences().into_iter().map(|mut c| {
                        c.plain_field = format!("{}.{}", nested.field, c.plain_field);
                        c
                    }));
                }
            }
        }
        out
    }
}

impl<R> std::fmt::Debug for RecordSchema<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordSchema")
            .field("type_name", &self.type_name)
            .field("fields", &self.bindings.len())
            .finish()
    }
}

/// Collects correspondences for [`RecordSchema`].
///
/// Declaration errors are remembered and reported by [`Self::build`].
pub struct RecordSchemaBuilder<R> {
    type_name: String,
    bindings: Vec<Binding<R>>,
    error: Option<SchemaError>,
}

impl<R: 'static> RecordSchemaBuilder<R> {
    /// Encrypts `plain_field` into `encrypted_<plain_field>`.
    ///
    /// Rows written by the earlier platform use `Encrypted<Field>` cipher
    /// names, which are also part of their default purpose; read those with
    /// [`Self::field_as`] and the stored names.
    pub fn field<P, C>(
        self,
        plain_field: &str,
        plain: impl Fn(&mut R) -> &mut P + Send + Sync + 'static,
        cipher: impl Fn(&mut R) -> &mut C + Send + Sync + 'static,
    ) -> Self
    where
        P: Plaintext + 'static,
        C: Ciphertext + 'static,
    {
        let cipher_field = format!("{DEFAULT_CIPHER_PREFIX}{plain_field}");
        self.field_as(plain_field, &cipher_field, plain, cipher)
    }

    /// Encrypts `plain_field` into an explicitly named cipher field.
    pub fn field_as<P, C>(
        mut self,
        plain_field: &str,
        cipher_field: &str,
        plain: impl Fn(&mut R) -> &mut P + Send + Sync + 'static,
        cipher: impl Fn(&mut R) -> &mut C + Send + Sync + 'static,
    ) -> Self
    where
        P: Plaintext + 'static,
        C: Ciphertext + 'static,
    {
        if plain_field.is_empty() {
            self.fail(SchemaError::EmptyFieldName);
        } else if cipher_field.is_empty() {
            self.fail(SchemaError::EmptyCipherField {
                field: plain_field.to_string(),
            });
        }

        let purpose = format!("struct:{}.{}", self.type_name, cipher_field).into_bytes();
        self.bindings.push(Binding::Field(FieldBinding {
            plain_field: plain_field.to_string(),
            cipher_field: cipher_field.to_string(),
            purpose,
            access: Box::new(Accessors::new(plain, cipher)),
        }));
        self
    }

    /// Overrides the purpose of the most recently declared field.
    pub fn purpose(mut self, purpose: impl Into<Vec<u8>>) -> Self {
        match self.bindings.last_mut() {
            Some(Binding::Field(field)) => field.purpose = purpose.into(),
            _ => self.fail(SchemaError::PurposeWithoutField),
        }
        self
    }

    /// Recurses into a nested record using that record's own schema.
    pub fn nested<N: 'static>(
        mut self,
        field: &str,
        access: impl Fn(&mut R) -> &mut N + Send + Sync + 'static,
        schema: RecordSchema<N>,
    ) -> Self {
        if field.is_empty() {
            self.fail(SchemaError::EmptyFieldName);
        }
        self.bindings.push(Binding::Nested(NestedBinding {
            field: field.to_string(),
            record: Box::new(Nested::new(access, schema)),
        }));
        self
    }

    /// Validates the declarations and returns the schema.
    pub fn build(self) -> Result<RecordSchema<R>, SchemaError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if self.type_name.is_empty() {
            return Err(SchemaError::EmptyTypeName);
        }

        let mut plain_fields = HashSet::new();
        for binding in &self.bindings {
            let name = match binding {
                Binding::Field(field) => &field.plain_field,
                Binding::Nested(nested) => &nested.field,
            };
            if !plain_fields.insert(name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    field: name.clone(),
                });
            }
        }

        let mut cipher_fields = HashSet::new();
        for binding in &self.bindings {
            let Binding::Field(field) = binding else {
                continue;
            };
            if plain_fields.contains(field.cipher_field.as_str()) {
                return Err(SchemaError::CipherFieldIsPlaintext {
                    field: field.cipher_field.clone(),
                });
            }
            if !cipher_fields.insert(field.cipher_field.as_str()) {
                return Err(SchemaError::DuplicateCipherField {
                    field: field.cipher_field.clone(),
                });
            }
        }

        Ok(RecordSchema {
            type_name: self.type_name,
            bindings: self.bindings,
        })
    }

    fn fail(&mut self, error: SchemaError) {
        self.error.get_or_insert(error);
    }
}
