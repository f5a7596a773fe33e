//! Record encryption and decryption driven by a [`RecordSchema`].

use crate::error::{CodecError, CodecResult};
use crate::schema::{Binding, Correspondence, FieldBinding, RecordSchema};
use crate::slot::{Ciphertext, Plaintext};
use authseal_crypto::{CryptoError, DataEncryptor};
use std::marker::PhantomData;
use std::string::FromUtf8Error;
use std::sync::Arc;
use tracing::trace;

/// Type-erased access to one plaintext/ciphertext field pair of `R`.
pub(crate) trait FieldAccess<R>: Send + Sync {
    fn plaintext(&self, record: &mut R) -> Option<Vec<u8>>;
    fn set_plaintext(&self, record: &mut R, value: Option<Vec<u8>>) -> Result<(), FromUtf8Error>;
    fn ciphertext(&self, record: &mut R) -> Option<String>;
    fn set_ciphertext(&self, record: &mut R, value: Option<String>);
}

/// A nested record reached from `R`, carrying its own schema.
pub(crate) trait NestedRecord<R>: Send + Sync {
    fn encrypt(&self, record: &mut R, encryptor: &dyn DataEncryptor) -> CodecResult<()>;
    fn decrypt(&self, record: &mut R, encryptor: &dyn DataEncryptor) -> CodecResult<()>;
    fn correspondences(&self) -> Vec<Correspondence>;
}

pub(crate) struct Accessors<P, C, FP, FC> {
    plain: FP,
    cipher: FC,
    _slots: PhantomData<fn() -> (P, C)>,
}

impl<P, C, FP, FC> Accessors<P, C, FP, FC> {
    pub(crate) fn new(plain: FP, cipher: FC) -> Self {
        Self {
            plain,
            cipher,
            _slots: PhantomData,
        }
    }
}

impl<R, P, C, FP, FC> FieldAccess<R> for Accessors<P, C, FP, FC>
where
    P: Plaintext,
    C: Ciphertext,
    FP: Fn(&mut R) -> &mut P + Send + Sync,
    FC: Fn(&mut R) -> &mut C + Send + Sync,
{
    fn plaintext(&self, record: &mut R) -> Option<Vec<u8>> {
        (self.plain)(record).plaintext().map(<[u8]>::to_vec)
    }

    fn set_plaintext(&self, record: &mut R, value: Option<Vec<u8>>) -> Result<(), FromUtf8Error> {
        (self.plain)(record).set_plaintext(value)
    }

    fn ciphertext(&self, record: &mut R) -> Option<String> {
        (self.cipher)(record).ciphertext().map(str::to_owned)
    }

    fn set_ciphertext(&self, record: &mut R, value: Option<String>) {
        (self.cipher)(record).set_ciphertext(value);
    }
}

pub(crate) struct Nested<N, FA> {
    access: FA,
    schema: RecordSchema<N>,
}

impl<N, FA> Nested<N, FA> {
    pub(crate) fn new(access: FA, schema: RecordSchema<N>) -> Self {
        Self { access, schema }
    }
}

impl<R, N, FA> NestedRecord<R> for Nested<N, FA>
where
    FA: Fn(&mut R) -> &mut N + Send + Sync,
{
    fn encrypt(&self, record: &mut R, encryptor: &dyn DataEncryptor) -> CodecResult<()> {
        self.schema.encrypt_record((self.access)(record), encryptor)
    }

    fn decrypt(&self, record: &mut R, encryptor: &dyn DataEncryptor) -> CodecResult<()> {
        self.schema.decrypt_record((self.access)(record), encryptor)
    }

    fn correspondences(&self) -> Vec<Correspondence> {
        self.schema.correspondences()
    }
}

impl<R> FieldBinding<R> {
    fn encrypt(&self, record: &mut R, encryptor: &dyn DataEncryptor) -> CodecResult<()> {
        let Some(plaintext) = self.access.plaintext(record) else {
            self.access.set_ciphertext(record, None);
            return Ok(());
        };

        if let Some(existing) = self.access.ciphertext(record) {
            let unchanged = encryptor
                .decrypt(&existing, &self.purpose)
                .is_ok_and(|current| current == plaintext);
            if unchanged {
                trace!(field = %self.cipher_field, "ciphertext already current");
                return Ok(());
            }
        }

        let token = encryptor
            .encrypt(&plaintext, &self.purpose)
            .map_err(|source| self.crypto_error(source))?;
        self.access.set_ciphertext(record, Some(token));
        Ok(())
    }

    fn decrypt(&self, record: &mut R, encryptor: &dyn DataEncryptor) -> CodecResult<()> {
        let value = match self.access.ciphertext(record) {
            Some(token) => Some(
                encryptor
                    .decrypt(&token, &self.purpose)
                    .map_err(|source| self.crypto_error(source))?,
            ),
            None => None,
        };
        self.access
            .set_plaintext(record, value)
            .map_err(|_| CodecError::InvalidUtf8 {
                field: self.plain_field.clone(),
            })
    }

    fn crypto_error(&self, source: CryptoError) -> CodecError {
        CodecError::Crypto {
            field: self.plain_field.clone(),
            source,
        }
    }
}

impl<R> RecordSchema<R> {
    /// Fills every cipher field from its plaintext field.
    ///
    /// Absent plaintexts clear their cipher field. A cipher field that
    /// already opens to the current plaintext is left untouched, so saving an
    /// unchanged record does not rewrite its ciphertexts. Fields are processed
    /// in declaration order; on error, fields before the failing one keep
    /// their new values.
    pub fn encrypt_record(&self, record: &mut R, encryptor: &dyn DataEncryptor) -> CodecResult<()> {
        for binding in &self.bindings {
            match binding {
                Binding::Field(field) => field.encrypt(record, encryptor)?,
                Binding::Nested(nested) => nested
                    .record
                    .encrypt(record, encryptor)
                    .map_err(|e| e.within(&nested.field))?,
            }
        }
        Ok(())
    }

    /// Fills every plaintext field from its cipher field.
    ///
    /// Absent ciphertexts clear their plaintext field.
    pub fn decrypt_record(&self, record: &mut R, encryptor: &dyn DataEncryptor) -> CodecResult<()> {
        for binding in &self.bindings {
            match binding {
                Binding::Field(field) => field.decrypt(record, encryptor)?,
                Binding::Nested(nested) => nested
                    .record
                    .decrypt(record, encryptor)
                    .map_err(|e| e.within(&nested.field))?,
            }
        }
        Ok(())
    }
}

/// Shared handle pairing record schemas with one encryptor.
///
/// Cheap to clone; every clone uses the same key ring.
#[derive(Clone)]
pub struct FieldEncryptor {
    encryptor: Arc<dyn DataEncryptor>,
}

impl FieldEncryptor {
    pub fn new(encryptor: Arc<dyn DataEncryptor>) -> Self {
        Self { encryptor }
    }

    pub fn encryptor(&self) -> &dyn DataEncryptor {
        self.encryptor.as_ref()
    }

    pub fn encrypt_record<R>(&self, schema: &RecordSchema<R>, record: &mut R) -> CodecResult<()> {
        schema.encrypt_record(record, self.encryptor.as_ref())
    }

    pub fn decrypt_record<R>(&self, schema: &RecordSchema<R>, record: &mut R) -> CodecResult<()> {
        schema.decrypt_record(record, self.encryptor.as_ref())
    }

    /// Encrypts each record in order, stopping at the first failure.
    pub fn encrypt_records<R>(&self, schema: &RecordSchema<R>, records: &mut [R]) -> CodecResult<()> {
        records
            .iter_mut()
            .try_for_each(|record| self.encrypt_record(schema, record))
    }

    /// Decrypts each record in order, stopping at the first failure.
    pub fn decrypt_records<R>(&self, schema: &RecordSchema<R>, records: &mut [R]) -> CodecResult<()> {
        records
            .iter_mut()
            .try_for_each(|record| self.decrypt_record(schema, record))
    }
}

impl std::fmt::Debug for FieldEncryptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldEncryptor").finish_non_exhaustive()
    }
}
