//! Keystore assembled from in-memory key material

use crate::{AliasedKey, KeyMaterial, KeyStore};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug)]
struct StaticEntry {
    key: Arc<KeyMaterial>,
    deprecated: Option<bool>,
}

/// Keystore whose keys are supplied directly by the application
///
/// Useful for embedding keycrypt where keys come from somewhere other than a
/// sealed image. Keys without an explicit flag inherit the store deprecation.
#[derive(Debug)]
pub struct StaticKeyStore {
    identity: String,
    deprecated: bool,
    keys: HashMap<String, StaticEntry>,
}

impl StaticKeyStore {
    /// Empty keystore
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            deprecated: false,
            keys: HashMap::new(),
        }
    }

    /// Mark the whole keystore deprecated
    #[must_use]
    pub fn deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    /// Add a key that inherits the store deprecation
    #[must_use]
    pub fn with_key(self, alias: impl Into<String>, material: impl Into<KeyMaterial>) -> Self {
        self.insert(alias.into(), material.into(), None)
    }

    /// Add a key with explicit deprecation
    #[must_use]
    pub fn with_key_deprecation(
        self,
        alias: impl Into<String>,
        material: impl Into<KeyMaterial>,
        deprecated: bool,
    ) -> Self {
        self.insert(alias.into(), material.into(), Some(deprecated))
    }

    /// Add a deprecated key
    #[must_use]
    pub fn with_deprecated_key(
        self,
        alias: impl Into<String>,
        material: impl Into<KeyMaterial>,
    ) -> Self {
        self.with_key_deprecation(alias, material, true)
    }

    fn insert(mut self, alias: String, material: KeyMaterial, deprecated: Option<bool>) -> Self {
        self.keys.insert(
            alias,
            StaticEntry {
                key: Arc::new(material),
                deprecated,
            },
        );
        self
    }
}

impl KeyStore for StaticKeyStore {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    fn aliased_key(&self, alias: &str) -> Option<AliasedKey> {
        self.keys.get(alias).map(|entry| {
            AliasedKey::new(
                alias,
                Arc::clone(&entry.key),
                entry.deprecated.unwrap_or(self.deprecated),
            )
        })
    }

    fn aliases(&self) -> Vec<String> {
        let mut aliases: Vec<String> = self.keys.keys().cloned().collect();
        aliases.sort();
        aliases
    }
}
