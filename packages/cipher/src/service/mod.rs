//! Encrypt/decrypt façade over the registered providers

mod dsl;

pub use dsl::{DecryptDslRequest, EncryptDslRequest};

use crate::{
    CipherError, CryptoProvider, DecryptResult, DecryptionRequest, EncryptionMetaInfo, Result,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use keycrypt_common::LoggingTransformer;
use std::sync::Arc;

/// Entry point for encryption and decryption
///
/// Holds a default provider and the ordered list used to dispatch decryption
/// by format recognition. The service is immutable and can be shared freely
/// between threads.
///
/// ```rust,ignore
/// let service = CryptoService::new(provider, Vec::new());
/// let template = service.encrypt("secret")?;
/// assert_eq!(service.decrypt(&template)?.as_string()?, "secret");
/// ```
#[derive(Debug, Clone)]
pub struct CryptoService {
    default_provider: Arc<dyn CryptoProvider>,
    providers: Vec<Arc<dyn CryptoProvider>>,
}

impl CryptoService {
    /// Service over `providers` in registration order
    ///
    /// The default provider is appended when it is not already registered.
    #[must_use]
    pub fn new(
        default_provider: Arc<dyn CryptoProvider>,
        mut providers: Vec<Arc<dyn CryptoProvider>>,
    ) -> Self {
        if !providers.iter().any(|p| Arc::ptr_eq(p, &default_provider)) {
            providers.push(Arc::clone(&default_provider));
        }
        Self {
            default_provider,
            providers,
        }
    }

    /// Encrypt `text` with configured defaults, returning the template
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredDefault` without a default algorithm or key
    /// alias, `KeyNotFound` for an unknown default alias, or any cipher error.
    pub fn encrypt(&self, text: &str) -> Result<String> {
        self.encrypt_dsl().encrypt(text)?.as_template()
    }

    /// Decrypt a value in any registered provider's format
    ///
    /// Text no provider recognizes is read as base64 of `IV ‖ ciphertext` and
    /// decrypted by the default provider with configured defaults.
    ///
    /// # Errors
    ///
    /// Returns `UnrecognizedFormat` when `text` is neither a recognized format
    /// nor base64, or the provider's error when decryption fails.
    pub fn decrypt(&self, text: &str) -> Result<DecryptResult> {
        if let Some(provider) = self.recognizing_provider(text) {
            LoggingTransformer::log_dispatch("decrypt", provider.name());
            return provider.decrypt(&DecryptionRequest::new(text));
        }
        let encoded = text.trim();
        if encoded.is_empty() {
            return Err(CipherError::UnrecognizedFormat);
        }
        let payload = STANDARD
            .decode(encoded)
            .map_err(|_| CipherError::UnrecognizedFormat)?;
        LoggingTransformer::log_dispatch("decrypt", self.default_provider.name());
        self.default_provider.decrypt(&DecryptionRequest::new(payload))
    }

    /// Builder for an encryption with explicit parameters
    #[must_use]
    pub fn encrypt_dsl(&self) -> EncryptDslRequest<'_> {
        EncryptDslRequest::new(self)
    }

    /// Builder for a decryption with explicit parameters
    #[must_use]
    pub fn decrypt_dsl(&self) -> DecryptDslRequest<'_> {
        DecryptDslRequest::new(self)
    }

    /// Algorithm and key alias of an encrypted value
    ///
    /// `None` when no provider recognizes `text`.
    #[must_use]
    pub fn get_encrypted_meta_info(&self, text: &str) -> Option<EncryptionMetaInfo> {
        self.recognizing_provider(text)
            .and_then(|provider| provider.encrypted_meta_info(text))
    }

    /// Provider used when a request names none
    #[must_use]
    pub fn default_provider(&self) -> &Arc<dyn CryptoProvider> {
        &self.default_provider
    }

    /// Providers in dispatch order
    #[must_use]
    pub fn providers(&self) -> &[Arc<dyn CryptoProvider>] {
        &self.providers
    }

    fn recognizing_provider(&self, text: &str) -> Option<&Arc<dyn CryptoProvider>> {
        self.providers
            .iter()
            .find(|provider| provider.is_known_encrypted_format(text))
    }

    fn select_provider(&self, name: Option<&str>) -> Result<&Arc<dyn CryptoProvider>> {
        match name {
            None => Ok(&self.default_provider),
            Some(name) => self
                .providers
                .iter()
                .find(|provider| provider.name() == name)
                .ok_or_else(|| CipherError::illegal(format!("unknown provider '{name}'"))),
        }
    }
}
