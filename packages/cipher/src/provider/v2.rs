//! The `v2c` template provider

use super::CryptoProvider;
use crate::cipher::Transform;
use crate::resolver::ParameterResolver;
use crate::{
    CryptoRequest, CryptoSubsystemConfig, DecryptResult, DecryptionRequest, EncryptResult,
    EncryptionMetaInfo, EncryptionRequest, Result,
    template::{self, TemplateParts},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use keycrypt_common::LoggingTransformer;
use keycrypt_key::{KeyError, KeyStore, KeyStoreRepository};
use log::debug;
use std::borrow::Cow;
use std::sync::Arc;

/// Name of the v2 provider
pub const V2_PROVIDER_NAME: &str = "v2c";

/// Literal tag in the first template segment
pub const V2_TEMPLATE_TAG: &str = "v2c";

/// Provider producing `{v2c}{algorithm}{alias}{base64}` templates
///
/// Keys come from a single keystore; the subsystem configuration supplies
/// the default algorithm and key alias.
#[derive(Debug, Clone)]
pub struct V2CryptoProvider {
    keystore: Arc<dyn KeyStore>,
    config: CryptoSubsystemConfig,
}

impl V2CryptoProvider {
    /// Provider reading keys from `keystore`
    #[must_use]
    pub fn new(keystore: Arc<dyn KeyStore>, config: CryptoSubsystemConfig) -> Self {
        Self { keystore, config }
    }

    /// Provider reading keys from the keystore named in `config`, else the default keystore
    ///
    /// # Errors
    ///
    /// Returns `InvalidKeystoreConfiguration` when the named keystore does not
    /// exist or the repository is empty.
    pub fn from_repository(
        repository: &KeyStoreRepository,
        config: CryptoSubsystemConfig,
    ) -> Result<Self> {
        let keystore = match config.keystore_name.as_deref() {
            Some(identity) => repository.keystore_by_identity(identity).ok_or_else(|| {
                KeyError::invalid_keystore(identity, "keystore is not configured")
            })?,
            None => repository.default_keystore().ok_or_else(|| {
                KeyError::invalid_keystore("<default>", "no keystores are configured")
            })?,
        };
        debug!("v2c provider reads keys from keystore {}", keystore.identity());
        Ok(Self::new(keystore, config))
    }

    /// Keystore the provider reads from
    #[must_use]
    pub fn keystore(&self) -> &Arc<dyn KeyStore> {
        &self.keystore
    }

    /// Subsystem defaults
    #[must_use]
    pub fn config(&self) -> &CryptoSubsystemConfig {
        &self.config
    }

    fn resolver(&self) -> ParameterResolver<'_> {
        ParameterResolver::new(self.keystore.as_ref(), &self.config)
    }
}

impl CryptoProvider for V2CryptoProvider {
    fn name(&self) -> &str {
        V2_PROVIDER_NAME
    }

    fn encrypt(&self, request: &EncryptionRequest) -> Result<EncryptResult> {
        let resolved = self.resolver().resolve(request, None)?;
        let transform = Transform::parse(resolved.algorithm())?;
        let key = resolved.key();
        if let Some(alias) = key.alias().filter(|_| key.is_deprecated()) {
            LoggingTransformer::log_deprecated_key_use(alias, resolved.algorithm());
        }

        let data = transform
            .encrypt(
                key.material(),
                request.parameters().initialization_vector(),
                request.plaintext(),
            )
            .inspect_err(|e| LoggingTransformer::log_crypto_failure("encrypt", e))?;

        Ok(EncryptResult::new(
            data,
            resolved.algorithm(),
            key.alias().map(str::to_owned),
            V2_TEMPLATE_TAG,
        ))
    }

    fn decrypt(&self, request: &DecryptionRequest) -> Result<DecryptResult> {
        let parts = std::str::from_utf8(request.ciphertext())
            .ok()
            .and_then(|text| template::parse(V2_TEMPLATE_TAG, text));

        let embedded = parts.as_ref().map(TemplateParts::meta_info);
        let resolved = self.resolver().resolve(request, embedded.as_ref())?;
        let transform = Transform::parse(resolved.algorithm())?;

        let payload = match &parts {
            Some(parts) => Cow::Owned(STANDARD.decode(parts.payload)?),
            None => Cow::Borrowed(request.ciphertext()),
        };
        let plaintext = transform
            .decrypt(resolved.key().material(), &payload)
            .inspect_err(|e| LoggingTransformer::log_crypto_failure("decrypt", e))?;

        Ok(DecryptResult::new(plaintext))
    }

    fn is_known_encrypted_format(&self, text: &str) -> bool {
        template::parse(V2_TEMPLATE_TAG, text).is_some()
    }

    fn encrypted_meta_info(&self, text: &str) -> Option<EncryptionMetaInfo> {
        template::parse(V2_TEMPLATE_TAG, text).map(|parts| parts.meta_info())
    }
}
