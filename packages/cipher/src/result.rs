//! Encryption and decryption results

use crate::{CipherError, Result, template};
use base64::{Engine, engine::general_purpose::STANDARD};
use std::fmt;
use zeroize::Zeroizing;

/// IV and ciphertext produced by one encryption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedData {
    iv: Option<Vec<u8>>,
    ciphertext: Vec<u8>,
}

impl EncryptedData {
    /// Combine an IV (if the transform uses one) with its ciphertext
    #[must_use]
    pub fn new(iv: Option<Vec<u8>>, ciphertext: Vec<u8>) -> Self {
        Self { iv, ciphertext }
    }

    /// IV actually used
    #[must_use]
    pub fn iv(&self) -> Option<&[u8]> {
        self.iv.as_deref()
    }

    /// Ciphertext without the IV
    #[must_use]
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// `IV ‖ ciphertext`
    #[must_use]
    pub fn to_payload(&self) -> Vec<u8> {
        let iv = self.iv().unwrap_or_default();
        let mut payload = Vec::with_capacity(iv.len() + self.ciphertext.len());
        payload.extend_from_slice(iv);
        payload.extend_from_slice(&self.ciphertext);
        payload
    }
}

/// Outcome of an encryption
#[derive(Debug, Clone)]
pub struct EncryptResult {
    data: EncryptedData,
    algorithm: String,
    key_alias: Option<String>,
    tag: String,
}

impl EncryptResult {
    /// Result of encrypting with `algorithm`; `key_alias` is `None` for explicit keys
    #[must_use]
    pub fn new(
        data: EncryptedData,
        algorithm: impl Into<String>,
        key_alias: Option<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            data,
            algorithm: algorithm.into(),
            key_alias,
            tag: tag.into(),
        }
    }

    /// IV and ciphertext
    #[must_use]
    pub fn encrypted_data(&self) -> &EncryptedData {
        &self.data
    }

    /// `IV ‖ ciphertext`
    #[must_use]
    pub fn as_bytes(&self) -> Vec<u8> {
        self.data.to_payload()
    }

    /// Base64 of `IV ‖ ciphertext`
    #[must_use]
    pub fn as_base64(&self) -> String {
        STANDARD.encode(self.data.to_payload())
    }

    /// Self-describing template
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedOperation` when the key was supplied explicitly, since
    /// there is no alias to embed and key material never goes into the template.
    /// Returns `IllegalCryptoParameters` when the alias or algorithm cannot be
    /// embedded (empty or containing braces).
    pub fn as_template(&self) -> Result<String> {
        let alias = self.key_alias.as_deref().ok_or_else(|| {
            CipherError::UnsupportedOperation(
                "template export needs a key resolved through a keystore alias".into(),
            )
        })?;
        template::encode(&self.tag, &self.algorithm, alias, &self.as_base64())
    }

    /// Transform name used
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Alias of the key used, if it came from a keystore
    #[must_use]
    pub fn key_alias(&self) -> Option<&str> {
        self.key_alias.as_deref()
    }
}

/// Outcome of a decryption; the plaintext is wiped on drop
#[derive(Clone)]
pub struct DecryptResult {
    plaintext: Zeroizing<Vec<u8>>,
}

impl DecryptResult {
    /// Wrap decrypted bytes
    #[must_use]
    pub fn new(plaintext: Zeroizing<Vec<u8>>) -> Self {
        Self { plaintext }
    }

    /// Plaintext bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.plaintext
    }

    /// Take the plaintext bytes
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.plaintext.to_vec()
    }

    /// Plaintext as UTF-8
    ///
    /// # Errors
    ///
    /// Returns `CryptoFailure` if the plaintext is not valid UTF-8.
    pub fn as_string(&self) -> Result<String> {
        std::str::from_utf8(&self.plaintext)
            .map(str::to_owned)
            .map_err(|e| CipherError::failure(format!("plaintext is not UTF-8: {e}")))
    }
}

impl fmt::Debug for DecryptResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DecryptResult({} bytes, REDACTED)", self.plaintext.len())
    }
}

/// Algorithm and key alias read from a template, without decrypting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionMetaInfo {
    algorithm: String,
    key_alias: String,
}

impl EncryptionMetaInfo {
    /// Metadata of one encrypted value
    #[must_use]
    pub fn new(algorithm: impl Into<String>, key_alias: impl Into<String>) -> Self {
        Self {
            algorithm: algorithm.into(),
            key_alias: key_alias.into(),
        }
    }

    /// Transform name
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Key alias
    #[must_use]
    pub fn key_alias(&self) -> &str {
        &self.key_alias
    }
}
