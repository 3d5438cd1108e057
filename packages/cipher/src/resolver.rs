//! Parameter resolution
//!
//! Single source of precedence for both directions:
//!
//! - key: explicit key > explicit alias > alias embedded in a template > default alias
//! - algorithm: explicit > embedded in a template > default
//!
//! Encryption has no template layer. Resolution only reads the keystore and
//! the configuration, so the same inputs always resolve the same way.

use crate::{
    CipherError, CryptoParameter, CryptoRequest, CryptoSubsystemConfig, EncryptionMetaInfo,
    Result, what_parameter_defined,
};
use keycrypt_key::{KeyMaterial, KeyStore};
use std::sync::Arc;

/// Where the resolved key came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// Supplied directly on the request
    Explicit,
    /// Looked up in the keystore
    Alias {
        /// Alias the key is registered under
        alias: String,
        /// Deprecation state of the key
        deprecated: bool,
    },
}

/// Key material plus its origin
#[derive(Debug, Clone)]
pub struct ResolvedKey {
    material: Arc<KeyMaterial>,
    source: KeySource,
}

impl ResolvedKey {
    /// Key material
    #[must_use]
    pub fn material(&self) -> &KeyMaterial {
        &self.material
    }

    /// Origin of the key
    #[must_use]
    pub fn source(&self) -> &KeySource {
        &self.source
    }

    /// Alias, when the key came from the keystore
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        match &self.source {
            KeySource::Alias { alias, .. } => Some(alias),
            KeySource::Explicit => None,
        }
    }

    /// Whether the keystore marks the key deprecated
    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        matches!(self.source, KeySource::Alias { deprecated: true, .. })
    }
}

/// Effective algorithm and key for one operation
#[derive(Debug, Clone)]
pub struct ResolvedParameters {
    algorithm: String,
    key: ResolvedKey,
}

impl ResolvedParameters {
    /// Effective transform name
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Effective key
    #[must_use]
    pub fn key(&self) -> &ResolvedKey {
        &self.key
    }
}

/// Resolves requests against a keystore and configured defaults
#[derive(Debug, Clone, Copy)]
pub struct ParameterResolver<'a> {
    keystore: &'a dyn KeyStore,
    config: &'a CryptoSubsystemConfig,
}

impl<'a> ParameterResolver<'a> {
    /// Resolver reading keys from `keystore`
    #[must_use]
    pub fn new(keystore: &'a dyn KeyStore, config: &'a CryptoSubsystemConfig) -> Self {
        Self { keystore, config }
    }

    /// Resolve algorithm and key for `request`
    ///
    /// `embedded` carries the parameters parsed from a template on decryption.
    ///
    /// # Errors
    ///
    /// - `KeyNotFound` when the chosen alias is not in the keystore
    /// - `MissingRequiredDefault` when a parameter is neither given nor configured
    pub fn resolve<R: CryptoRequest + ?Sized>(
        &self,
        request: &R,
        embedded: Option<&EncryptionMetaInfo>,
    ) -> Result<ResolvedParameters> {
        let defined = what_parameter_defined(request);
        let parameters = request.parameters();

        let algorithm = if defined.contains(&CryptoParameter::Algorithm) {
            parameters.algorithm().map(str::to_owned)
        } else {
            embedded
                .map(|meta| meta.algorithm().to_owned())
                .or_else(|| self.config.default_algorithm.clone())
        }
        .ok_or(CipherError::MissingRequiredDefault {
            parameter: CryptoParameter::Algorithm,
        })?;

        let key = match parameters.key() {
            Some(material) if defined.contains(&CryptoParameter::Key) => ResolvedKey {
                material: Arc::clone(material),
                source: KeySource::Explicit,
            },
            _ => {
                let alias = parameters
                    .key_alias()
                    .or_else(|| embedded.map(EncryptionMetaInfo::key_alias))
                    .or(self.config.default_key_alias.as_deref())
                    .ok_or(CipherError::MissingRequiredDefault {
                        parameter: CryptoParameter::KeyAlias,
                    })?;
                self.lookup(alias)?
            }
        };

        Ok(ResolvedParameters { algorithm, key })
    }

    fn lookup(&self, alias: &str) -> Result<ResolvedKey> {
        let aliased = self
            .keystore
            .aliased_key(alias)
            .ok_or_else(|| CipherError::KeyNotFound {
                alias: alias.to_owned(),
            })?;
        Ok(ResolvedKey {
            material: Arc::clone(aliased.key()),
            source: KeySource::Alias {
                alias: aliased.alias().to_owned(),
                deprecated: aliased.is_deprecated(),
            },
        })
    }
}
