//! Error handling for key management

use thiserror::Error;

/// Why a configured key password does not fit the stored key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordMismatch {
    /// The key is protected and the configured password does not open it
    WrongPassword,
    /// The key is protected and no password is configured for it
    PasswordMissing,
    /// A password is configured for a key that is not protected
    KeyNotProtected,
}

impl std::fmt::Display for PasswordMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::WrongPassword => "configured password does not match the protected key",
            Self::PasswordMissing => "key is password protected but no password is configured",
            Self::KeyNotProtected => "password configured for a key that is not protected",
        };
        f.write_str(text)
    }
}

/// Key management errors
#[derive(Debug, Error)]
pub enum KeyError {
    /// Configured key password disagrees with the key's protection state
    #[error("Bad password for key '{alias}': {mismatch}")]
    BadKeyPassword {
        /// Alias of the offending key
        alias: String,
        /// Which protection mismatch was detected
        mismatch: PasswordMismatch,
    },

    /// Keystore could not be loaded from its configuration
    #[error("Invalid keystore configuration for '{identity}': {reason}")]
    InvalidKeystoreConfiguration {
        /// Keystore identity from configuration
        identity: String,
        /// What is wrong with it
        reason: String,
    },

    /// Recognized but unimplemented operation
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Key bytes cannot be decoded or encoded for their declared kind
    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// Keystore image could not be produced
    #[error("Keystore image encoding failed: {0}")]
    ImageEncoding(String),
}

impl KeyError {
    /// Create an `InvalidKeystoreConfiguration` error
    pub fn invalid_keystore(identity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKeystoreConfiguration {
            identity: identity.into(),
            reason: reason.into(),
        }
    }

    /// Create a `BadKeyPassword` error
    pub fn bad_key_password(alias: impl Into<String>, mismatch: PasswordMismatch) -> Self {
        Self::BadKeyPassword {
            alias: alias.into(),
            mismatch,
        }
    }
}

/// Result type for key operations
pub type Result<T> = std::result::Result<T, KeyError>;
