//! Crypto providers
//!
//! A provider owns one ciphertext format. The service picks the provider for
//! a value by asking each one, in registration order, whether it recognizes it.

mod v2;

pub use v2::{V2_PROVIDER_NAME, V2_TEMPLATE_TAG, V2CryptoProvider};

use crate::{DecryptResult, DecryptionRequest, EncryptResult, EncryptionMetaInfo, EncryptionRequest, Result};
use std::fmt;

/// Encrypts, decrypts and recognizes one ciphertext format
pub trait CryptoProvider: Send + Sync + fmt::Debug {
    /// Name requests use to address this provider
    fn name(&self) -> &str;

    /// Encrypt a request
    ///
    /// # Errors
    ///
    /// Returns an error if parameters cannot be resolved or the cipher fails.
    fn encrypt(&self, request: &EncryptionRequest) -> Result<EncryptResult>;

    /// Decrypt a request holding a template or raw `IV ‖ ciphertext`
    ///
    /// # Errors
    ///
    /// Returns an error if parameters cannot be resolved or the cipher fails.
    fn decrypt(&self, request: &DecryptionRequest) -> Result<DecryptResult>;

    /// Strict check whether `text` is in this provider's format
    fn is_known_encrypted_format(&self, text: &str) -> bool;

    /// Algorithm and alias embedded in `text`, without decrypting
    fn encrypted_meta_info(&self, text: &str) -> Option<EncryptionMetaInfo>;
}
