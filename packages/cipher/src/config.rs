//! Crypto subsystem configuration

use serde::Deserialize;

/// Defaults applied when a request omits a parameter
///
/// Each field is optional: a default is only required by requests that leave
/// the corresponding parameter out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CryptoSubsystemConfig {
    /// Transform used when none is given, e.g. `AES/CBC/PKCS5Padding`
    #[serde(default)]
    pub default_algorithm: Option<String>,
    /// Key alias used when neither a key nor an alias is given
    #[serde(default)]
    pub default_key_alias: Option<String>,
    /// Keystore identity the provider reads keys from; the default keystore when unset
    #[serde(default)]
    pub keystore_name: Option<String>,
}

impl CryptoSubsystemConfig {
    /// Configuration without defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default algorithm
    #[must_use]
    pub fn with_default_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.default_algorithm = Some(algorithm.into());
        self
    }

    /// Set the default key alias
    #[must_use]
    pub fn with_default_key_alias(mut self, alias: impl Into<String>) -> Self {
        self.default_key_alias = Some(alias.into());
        self
    }

    /// Read keys from the named keystore
    #[must_use]
    pub fn with_keystore_name(mut self, identity: impl Into<String>) -> Self {
        self.keystore_name = Some(identity.into());
        self
    }
}
