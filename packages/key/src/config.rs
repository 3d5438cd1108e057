//! Keystore configuration
//!
//! Plain data handed over by the configuration loader. Every type deserializes
//! with serde and can also be assembled in code.

use keycrypt_common::Password;
use serde::Deserialize;

/// Per-key configuration inside a local keystore
#[derive(Debug, Clone, Deserialize)]
pub struct KeyConfig {
    /// Alias of the key inside the keystore image
    pub alias: String,
    /// Password protecting the key, if any
    #[serde(default)]
    pub password: Option<Password>,
    /// Explicit deprecation; `None` inherits the keystore flag
    #[serde(default)]
    pub deprecated: Option<bool>,
}

impl KeyConfig {
    /// Configuration for an unprotected key that inherits deprecation
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            password: None,
            deprecated: None,
        }
    }

    /// Set the key password
    #[must_use]
    pub fn with_password(mut self, password: impl Into<Password>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set deprecation explicitly, overriding the keystore flag
    #[must_use]
    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = Some(deprecated);
        self
    }
}

/// Keystore whose image is read through a [`KeystoreSource`](crate::KeystoreSource)
#[derive(Debug, Clone, Deserialize)]
pub struct LocalKeystoreConfig {
    /// Unique identity within the repository
    pub identity: String,
    /// Location handed to the keystore source
    pub location: String,
    /// Keystore type, e.g. `CKS`
    #[serde(rename = "type")]
    pub keystore_type: String,
    /// Password sealing the keystore image
    #[serde(default)]
    pub password: Password,
    /// Marks every key in the store deprecated unless the key overrides it
    #[serde(default)]
    pub deprecated: bool,
    /// Per-key settings
    #[serde(default)]
    pub keys: Vec<KeyConfig>,
}

impl LocalKeystoreConfig {
    /// Create a local keystore configuration without key settings
    pub fn new(
        identity: impl Into<String>,
        location: impl Into<String>,
        keystore_type: impl Into<String>,
        password: impl Into<Password>,
    ) -> Self {
        Self {
            identity: identity.into(),
            location: location.into(),
            keystore_type: keystore_type.into(),
            password: password.into(),
            deprecated: false,
            keys: Vec::new(),
        }
    }

    /// Mark the whole keystore deprecated
    #[must_use]
    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    /// Add a per-key configuration
    #[must_use]
    pub fn with_key(mut self, key: KeyConfig) -> Self {
        self.keys.push(key);
        self
    }
}

/// Remote keystore (accepted in configuration, not implemented)
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteKeystoreConfig {
    /// Unique identity within the repository
    pub identity: String,
    /// Service endpoint
    #[serde(default)]
    pub url: Option<String>,
}

impl RemoteKeystoreConfig {
    /// Create a remote keystore configuration
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            url: None,
        }
    }
}

/// One configured keystore
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum KeystoreConfig {
    /// Keystore loaded from a sealed image
    Local(LocalKeystoreConfig),
    /// Keystore served remotely
    Remote(RemoteKeystoreConfig),
}

impl KeystoreConfig {
    /// Identity of the configured keystore
    #[must_use]
    pub fn identity(&self) -> &str {
        match self {
            Self::Local(config) => &config.identity,
            Self::Remote(config) => &config.identity,
        }
    }
}

/// All keystores plus the default pointer
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeystoreSubsystemConfig {
    /// Keystores in configuration order
    #[serde(default)]
    pub keystores: Vec<KeystoreConfig>,
    /// Identity of the default keystore; the first keystore when unset
    #[serde(default)]
    pub default_keystore: Option<String>,
}

impl KeystoreSubsystemConfig {
    /// Empty configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a keystore
    #[must_use]
    pub fn with_keystore(mut self, keystore: KeystoreConfig) -> Self {
        self.keystores.push(keystore);
        self
    }

    /// Point the default at a keystore identity
    #[must_use]
    pub fn with_default_keystore(mut self, identity: impl Into<String>) -> Self {
        self.default_keystore = Some(identity.into());
        self
    }
}
