//! Key material resolved by alias

use crate::KeyMaterial;
use std::sync::Arc;

/// Key resolved from a keystore together with its alias and deprecation state
#[derive(Debug, Clone)]
pub struct AliasedKey {
    key: Arc<KeyMaterial>,
    alias: String,
    deprecated: bool,
}

impl AliasedKey {
    /// Create a resolved key
    pub fn new(alias: impl Into<String>, key: Arc<KeyMaterial>, deprecated: bool) -> Self {
        Self {
            key,
            alias: alias.into(),
            deprecated,
        }
    }

    /// Key material
    #[must_use]
    pub fn key(&self) -> &Arc<KeyMaterial> {
        &self.key
    }

    /// Alias the key is registered under
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Deprecated keys are kept for decrypting older data
    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }
}
