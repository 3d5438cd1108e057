//! Fluent request builders
//!
//! Builders only collect parameters. Resolution against keystores and
//! defaults happens once, in the terminal call.

use super::CryptoService;
use crate::request::RequestParameters;
use crate::{
    CipherError, DecryptResult, DecryptionRequest, EncryptResult, EncryptionRequest, Result,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use keycrypt_common::LoggingTransformer;
use keycrypt_key::KeyMaterial;
use std::sync::Arc;

macro_rules! dsl_setters {
    ($builder:ident) => {
        impl $builder<'_> {
            /// Use this transform instead of the configured default
            #[must_use]
            pub fn algorithm(mut self, algorithm: impl Into<String>) -> Self {
                self.parameters.set_algorithm(algorithm.into());
                self
            }

            /// Use this key; takes precedence over any alias
            #[must_use]
            pub fn key(mut self, key: impl Into<Arc<KeyMaterial>>) -> Self {
                self.parameters.set_key(key.into());
                self
            }

            /// Look the key up under this alias
            #[must_use]
            pub fn key_alias(mut self, alias: impl Into<String>) -> Self {
                self.parameters.set_key_alias(alias.into());
                self
            }

            /// Run against the named provider instead of the default one
            #[must_use]
            pub fn provider(mut self, name: impl Into<String>) -> Self {
                self.parameters.set_provider(name.into());
                self
            }

            /// Pin the initialization vector
            #[must_use]
            pub fn initialization_vector(mut self, iv: impl Into<Vec<u8>>) -> Self {
                self.parameters.set_initialization_vector(iv.into());
                self
            }
        }
    };
}

/// Encryption with explicit parameters
#[derive(Debug, Clone)]
pub struct EncryptDslRequest<'s> {
    service: &'s CryptoService,
    parameters: RequestParameters,
}

impl<'s> EncryptDslRequest<'s> {
    pub(super) fn new(service: &'s CryptoService) -> Self {
        Self {
            service,
            parameters: RequestParameters::default(),
        }
    }

    /// Encrypt UTF-8 text
    ///
    /// # Errors
    ///
    /// Returns `IllegalCryptoParameters` for an unknown provider, or the
    /// provider's error.
    pub fn encrypt(self, text: &str) -> Result<EncryptResult> {
        self.encrypt_bytes(text.as_bytes())
    }

    /// Encrypt raw bytes
    ///
    /// # Errors
    ///
    /// Returns `IllegalCryptoParameters` for an unknown provider, or the
    /// provider's error.
    pub fn encrypt_bytes(self, data: impl Into<Vec<u8>>) -> Result<EncryptResult> {
        let provider = self.service.select_provider(self.parameters.provider())?;
        LoggingTransformer::log_dispatch("encrypt", provider.name());
        provider.encrypt(&EncryptionRequest::from_parts(data, self.parameters))
    }
}

dsl_setters!(EncryptDslRequest);

/// Decryption with explicit parameters
#[derive(Debug, Clone)]
pub struct DecryptDslRequest<'s> {
    service: &'s CryptoService,
    parameters: RequestParameters,
}

impl<'s> DecryptDslRequest<'s> {
    pub(super) fn new(service: &'s CryptoService) -> Self {
        Self {
            service,
            parameters: RequestParameters::default(),
        }
    }

    /// Decrypt a template the provider recognizes, or base64 of `IV ‖ ciphertext`
    ///
    /// # Errors
    ///
    /// Returns `CryptoFailure` for text that is neither a template nor base64,
    /// `IllegalCryptoParameters` for an unknown provider, or the provider's error.
    pub fn decrypt(self, text: &str) -> Result<DecryptResult> {
        let provider = self.service.select_provider(self.parameters.provider())?;
        let ciphertext = if provider.is_known_encrypted_format(text) {
            text.as_bytes().to_vec()
        } else {
            STANDARD
                .decode(text.trim())
                .map_err(|_| CipherError::failure("value is neither a template nor base64"))?
        };
        LoggingTransformer::log_dispatch("decrypt", provider.name());
        provider.decrypt(&DecryptionRequest::from_parts(ciphertext, self.parameters))
    }

    /// Decrypt raw `IV ‖ ciphertext`
    ///
    /// # Errors
    ///
    /// Returns `IllegalCryptoParameters` for an unknown provider, or the
    /// provider's error.
    pub fn decrypt_bytes(self, data: impl Into<Vec<u8>>) -> Result<DecryptResult> {
        let provider = self.service.select_provider(self.parameters.provider())?;
        LoggingTransformer::log_dispatch("decrypt", provider.name());
        provider.decrypt(&DecryptionRequest::from_parts(data, self.parameters))
    }
}

dsl_setters!(DecryptDslRequest);
