//! Error handling for crypto operations

use crate::CryptoParameter;
use keycrypt_key::KeyError;
use thiserror::Error;

/// Crypto operation errors
///
/// Every error reaches the caller unmodified; nothing is caught and replaced
/// by a fallback key or algorithm.
#[derive(Debug, Error)]
pub enum CipherError {
    /// Unknown algorithm, IV misuse, or a key that does not fit the algorithm
    #[error("Illegal crypto parameters: {0}")]
    IllegalCryptoParameters(String),

    /// Alias not present in the keystore
    #[error("Key not found for alias '{alias}'")]
    KeyNotFound {
        /// Alias that could not be resolved
        alias: String,
    },

    /// Cipher integrity or format failure, including decryption with the wrong key
    #[error("Cryptographic operation failed: {0}")]
    CryptoFailure(String),

    /// A parameter was omitted and no default is configured for it
    #[error("Operation requires a default {parameter} but none is configured")]
    MissingRequiredDefault {
        /// Parameter the request left out
        parameter: CryptoParameter,
    },

    /// Recognized but unsupported operation
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// No registered provider recognizes the value
    #[error("Value is not a recognized encrypted format")]
    UnrecognizedFormat,

    /// Keystore error
    #[error(transparent)]
    Key(#[from] KeyError),
}

impl CipherError {
    /// Create an `IllegalCryptoParameters` error
    pub fn illegal(message: impl Into<String>) -> Self {
        Self::IllegalCryptoParameters(message.into())
    }

    /// Create a `CryptoFailure` error
    pub fn failure(message: impl Into<String>) -> Self {
        Self::CryptoFailure(message.into())
    }
}

impl From<base64::DecodeError> for CipherError {
    fn from(err: base64::DecodeError) -> Self {
        CipherError::CryptoFailure(format!("Base64 decode error: {err}"))
    }
}

/// Result type for crypto operations
pub type Result<T> = std::result::Result<T, CipherError>;
