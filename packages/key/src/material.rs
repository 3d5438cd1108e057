//! Key material held by keystores

use crate::{KeyError, Result};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroizing;

/// Kind of key material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyKind {
    /// Raw symmetric key bytes
    Secret,
    /// RSA private key (PKCS#8 DER when encoded)
    RsaPrivate,
    /// RSA public key (SPKI DER when encoded)
    RsaPublic,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Secret => "secret",
            Self::RsaPrivate => "rsa-private",
            Self::RsaPublic => "rsa-public",
        };
        f.write_str(name)
    }
}

/// Symmetric key bytes, wiped on drop
#[derive(Clone)]
pub struct SecretKey(Zeroizing<Vec<u8>>);

impl SecretKey {
    /// Wrap raw key bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(bytes.into()))
    }

    /// Borrow the key bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Key length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the key is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey({} bytes, REDACTED)", self.0.len())
    }
}

/// Key material resolved from a keystore or supplied explicitly
#[derive(Clone)]
pub enum KeyMaterial {
    /// Symmetric key
    Secret(SecretKey),
    /// RSA private key; encrypting with it uses its public half
    RsaPrivate(Box<RsaPrivateKey>),
    /// RSA public key
    RsaPublic(RsaPublicKey),
}

impl KeyMaterial {
    /// Symmetric key from raw bytes
    pub fn secret(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Secret(SecretKey::new(bytes))
    }

    /// RSA private key
    #[must_use]
    pub fn rsa_private(key: RsaPrivateKey) -> Self {
        Self::RsaPrivate(Box::new(key))
    }

    /// RSA public key
    #[must_use]
    pub fn rsa_public(key: RsaPublicKey) -> Self {
        Self::RsaPublic(key)
    }

    /// Decode key material from its canonical encoding
    ///
    /// # Errors
    ///
    /// Returns `InvalidKeyMaterial` if the bytes are not a valid encoding for `kind`.
    pub fn from_encoded(kind: KeyKind, bytes: &[u8]) -> Result<Self> {
        match kind {
            KeyKind::Secret => {
                if bytes.is_empty() {
                    return Err(KeyError::InvalidKeyMaterial(
                        "secret key must not be empty".into(),
                    ));
                }
                Ok(Self::secret(bytes))
            }
            KeyKind::RsaPrivate => RsaPrivateKey::from_pkcs8_der(bytes)
                .map(Self::rsa_private)
                .map_err(|e| KeyError::InvalidKeyMaterial(format!("RSA private key: {e}"))),
            KeyKind::RsaPublic => RsaPublicKey::from_public_key_der(bytes)
                .map(Self::RsaPublic)
                .map_err(|e| KeyError::InvalidKeyMaterial(format!("RSA public key: {e}"))),
        }
    }

    /// Encode key material canonically (raw, PKCS#8 DER or SPKI DER)
    ///
    /// # Errors
    ///
    /// Returns `InvalidKeyMaterial` if DER encoding fails.
    pub fn to_encoded(&self) -> Result<Zeroizing<Vec<u8>>> {
        match self {
            Self::Secret(key) => Ok(Zeroizing::new(key.as_bytes().to_vec())),
            Self::RsaPrivate(key) => key
                .to_pkcs8_der()
                .map(|doc| Zeroizing::new(doc.as_bytes().to_vec()))
                .map_err(|e| KeyError::InvalidKeyMaterial(format!("RSA private key: {e}"))),
            Self::RsaPublic(key) => key
                .to_public_key_der()
                .map(|doc| Zeroizing::new(doc.as_bytes().to_vec()))
                .map_err(|e| KeyError::InvalidKeyMaterial(format!("RSA public key: {e}"))),
        }
    }

    /// Kind of this material
    #[must_use]
    pub fn kind(&self) -> KeyKind {
        match self {
            Self::Secret(_) => KeyKind::Secret,
            Self::RsaPrivate(_) => KeyKind::RsaPrivate,
            Self::RsaPublic(_) => KeyKind::RsaPublic,
        }
    }

    /// Symmetric key bytes, if this is a secret key
    #[must_use]
    pub fn as_secret(&self) -> Option<&[u8]> {
        match self {
            Self::Secret(key) => Some(key.as_bytes()),
            _ => None,
        }
    }

    /// Public key usable for encryption (derived from a private key if needed)
    #[must_use]
    pub fn rsa_public_key(&self) -> Option<RsaPublicKey> {
        match self {
            Self::RsaPrivate(key) => Some(key.to_public_key()),
            Self::RsaPublic(key) => Some(key.clone()),
            Self::Secret(_) => None,
        }
    }

    /// Private key usable for decryption
    #[must_use]
    pub fn rsa_private_key(&self) -> Option<&RsaPrivateKey> {
        match self {
            Self::RsaPrivate(key) => Some(key.as_ref()),
            _ => None,
        }
    }
}

impl From<SecretKey> for KeyMaterial {
    fn from(key: SecretKey) -> Self {
        Self::Secret(key)
    }
}

impl From<RsaPrivateKey> for KeyMaterial {
    fn from(key: RsaPrivateKey) -> Self {
        Self::rsa_private(key)
    }
}

impl From<RsaPublicKey> for KeyMaterial {
    fn from(key: RsaPublicKey) -> Self {
        Self::RsaPublic(key)
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secret(key) => write!(f, "KeyMaterial::{key:?}"),
            Self::RsaPrivate(_) => f.write_str("KeyMaterial::RsaPrivate(REDACTED)"),
            Self::RsaPublic(_) => f.write_str("KeyMaterial::RsaPublic"),
        }
    }
}
