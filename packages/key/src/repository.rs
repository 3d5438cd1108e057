//! Aggregate of all configured keystores

use crate::{
    KeyError, KeyStore, KeystoreConfig, KeystoreSource, KeystoreSubsystemConfig, LocalKeyStore,
    Result,
};
use log::debug;
use std::sync::Arc;

/// Every configured keystore, by unique identity, plus the default one
///
/// Construction is all-or-nothing: one misconfigured keystore fails the whole
/// repository, so a broken store never turns into a later "key not found".
#[derive(Debug, Clone)]
pub struct KeyStoreRepository {
    keystores: Vec<Arc<dyn KeyStore>>,
    default_index: Option<usize>,
}

impl KeyStoreRepository {
    /// Load every configured keystore
    ///
    /// # Errors
    ///
    /// - `UnsupportedOperation` if a remote keystore is configured
    /// - `InvalidKeystoreConfiguration` for duplicate identities, a default
    ///   pointer naming no keystore, or any keystore that fails to load
    /// - `BadKeyPassword` from any keystore's key password checks
    pub fn new(config: &KeystoreSubsystemConfig, source: &dyn KeystoreSource) -> Result<Self> {
        let mut keystores: Vec<Arc<dyn KeyStore>> = Vec::with_capacity(config.keystores.len());
        for keystore in &config.keystores {
            match keystore {
                KeystoreConfig::Local(local) => {
                    keystores.push(Arc::new(LocalKeyStore::load(local, source)?));
                }
                KeystoreConfig::Remote(remote) => {
                    return Err(KeyError::UnsupportedOperation(format!(
                        "remote keystore '{}' is not supported yet",
                        remote.identity
                    )));
                }
            }
        }
        Self::from_keystores(keystores, config.default_keystore.as_deref())
    }

    /// Build a repository from already loaded keystores
    ///
    /// # Errors
    ///
    /// Returns `InvalidKeystoreConfiguration` for duplicate identities or a
    /// default identity that names no keystore.
    pub fn from_keystores(
        keystores: Vec<Arc<dyn KeyStore>>,
        default_keystore: Option<&str>,
    ) -> Result<Self> {
        for (index, keystore) in keystores.iter().enumerate() {
            let identity = keystore.identity();
            if keystores[..index].iter().any(|other| other.identity() == identity) {
                return Err(KeyError::invalid_keystore(identity, "duplicate keystore identity"));
            }
        }

        let default_index = match default_keystore {
            Some(identity) => Some(
                keystores
                    .iter()
                    .position(|keystore| keystore.identity() == identity)
                    .ok_or_else(|| {
                        KeyError::invalid_keystore(identity, "default keystore is not configured")
                    })?,
            ),
            None if keystores.is_empty() => None,
            None => Some(0),
        };

        if let Some(index) = default_index {
            debug!(
                "Keystore repository: {} keystores, default {}",
                keystores.len(),
                keystores[index].identity()
            );
        }

        Ok(Self {
            keystores,
            default_index,
        })
    }

    /// The explicitly configured default keystore, else the first one
    ///
    /// `None` only when no keystores are configured.
    #[must_use]
    pub fn default_keystore(&self) -> Option<Arc<dyn KeyStore>> {
        self.default_index
            .and_then(|index| self.keystores.get(index))
            .cloned()
    }

    /// Keystore with the given identity
    #[must_use]
    pub fn keystore_by_identity(&self, identity: &str) -> Option<Arc<dyn KeyStore>> {
        self.keystores
            .iter()
            .find(|keystore| keystore.identity() == identity)
            .cloned()
    }

    /// Identities in configuration order
    #[must_use]
    pub fn identities(&self) -> Vec<&str> {
        self.keystores.iter().map(|keystore| keystore.identity()).collect()
    }

    /// Number of keystores
    #[must_use]
    pub fn len(&self) -> usize {
        self.keystores.len()
    }

    /// Whether no keystores are configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keystores.is_empty()
    }
}
