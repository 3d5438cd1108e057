//! Transform names and their cipher configuration

use super::{asymmetric, symmetric};
use crate::{CipherError, EncryptedData, Result};
use keycrypt_key::KeyMaterial;
use rand::RngCore;
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

/// Block cipher mode for AES
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockMode {
    /// Electronic codebook, no IV
    Ecb,
    /// Cipher block chaining with a 16-byte IV
    Cbc,
}

/// Block padding for AES ECB/CBC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Padding {
    /// PKCS#7 (`PKCS5Padding` names the same scheme for 16-byte blocks)
    Pkcs7,
    /// Input must already be a whole number of blocks
    None,
}

/// RSA encryption padding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RsaPadding {
    /// PKCS#1 v1.5
    Pkcs1,
    /// OAEP with SHA-256 and MGF1
    OaepSha256,
}

/// Parsed cipher transform
///
/// Names follow the `algorithm/mode/padding` convention and are matched
/// case-insensitively:
///
/// | name | transform |
/// |------|-----------|
/// | `AES`, `AES/ECB/PKCS5Padding`, `AES/ECB/PKCS7Padding`, `AES/ECB/NoPadding` | AES-ECB |
/// | `AES/CBC/PKCS5Padding`, `AES/CBC/PKCS7Padding`, `AES/CBC/NoPadding` | AES-CBC |
/// | `AES/GCM/NoPadding` | AES-GCM |
/// | `ChaCha20-Poly1305` | ChaCha20-Poly1305 |
/// | `RSA`, `RSA/ECB/PKCS1Padding`, `RSA/ECB/OAEPWithSHA-256AndMGF1Padding` | RSA (`NONE` accepted as mode) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transform {
    /// AES in ECB or CBC mode
    Aes {
        /// Chaining mode
        mode: BlockMode,
        /// Block padding
        padding: Padding,
    },
    /// AES-GCM with a 12-byte nonce
    AesGcm,
    /// ChaCha20-Poly1305 with a 12-byte nonce
    ChaCha20Poly1305,
    /// RSA, split into key-sized blocks
    Rsa {
        /// Encryption padding
        padding: RsaPadding,
    },
}

impl Transform {
    /// Parse a transform name
    ///
    /// # Errors
    ///
    /// Returns `IllegalCryptoParameters` for names outside the supported set.
    pub fn parse(name: &str) -> Result<Self> {
        let upper = name.trim().to_ascii_uppercase();
        let parts: Vec<&str> = upper.split('/').collect();
        let transform = match parts.as_slice() {
            ["AES"] => Self::Aes {
                mode: BlockMode::Ecb,
                padding: Padding::Pkcs7,
            },
            ["AES", mode @ ("ECB" | "CBC"), padding] => Self::Aes {
                mode: if *mode == "ECB" {
                    BlockMode::Ecb
                } else {
                    BlockMode::Cbc
                },
                padding: match *padding {
                    "PKCS5PADDING" | "PKCS7PADDING" => Padding::Pkcs7,
                    "NOPADDING" => Padding::None,
                    _ => return Err(unsupported(name)),
                },
            },
            ["AES", "GCM", "NOPADDING"] => Self::AesGcm,
            ["CHACHA20-POLY1305"] | ["CHACHA20-POLY1305", "NONE", "NOPADDING"] => {
                Self::ChaCha20Poly1305
            }
            ["RSA"] => Self::Rsa {
                padding: RsaPadding::Pkcs1,
            },
            ["RSA", "ECB" | "NONE", padding] => Self::Rsa {
                padding: match *padding {
                    "PKCS1PADDING" => RsaPadding::Pkcs1,
                    "OAEPWITHSHA-256ANDMGF1PADDING" => RsaPadding::OaepSha256,
                    _ => return Err(unsupported(name)),
                },
            },
            _ => return Err(unsupported(name)),
        };
        Ok(transform)
    }

    /// IV (nonce) length in bytes; zero for transforms without one
    #[must_use]
    pub fn iv_len(&self) -> usize {
        match self {
            Self::Aes {
                mode: BlockMode::Cbc,
                ..
            } => symmetric::AES_BLOCK_SIZE,
            Self::AesGcm | Self::ChaCha20Poly1305 => symmetric::AEAD_NONCE_SIZE,
            Self::Aes {
                mode: BlockMode::Ecb,
                ..
            }
            | Self::Rsa { .. } => 0,
        }
    }

    /// Whether decryption detects tampering and wrong keys with certainty
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::AesGcm | Self::ChaCha20Poly1305)
    }

    /// Encrypt `plaintext`, generating an IV unless one is pinned
    ///
    /// # Errors
    ///
    /// - `IllegalCryptoParameters` for a key that does not fit the transform,
    ///   a pinned IV of the wrong length, or an IV given to a transform without one
    /// - `CryptoFailure` when the cipher rejects the input
    pub fn encrypt(
        &self,
        key: &KeyMaterial,
        iv: Option<&[u8]>,
        plaintext: &[u8],
    ) -> Result<EncryptedData> {
        let iv = self.prepare_iv(iv)?;
        let ciphertext = match self {
            Self::Aes { mode, padding } => {
                let key = secret(key, self)?;
                match mode {
                    BlockMode::Ecb => symmetric::ecb_encrypt(key, *padding, plaintext)?,
                    BlockMode::Cbc => {
                        symmetric::cbc_encrypt(key, iv_bytes(&iv)?, *padding, plaintext)?
                    }
                }
            }
            Self::AesGcm => symmetric::gcm_encrypt(secret(key, self)?, iv_bytes(&iv)?, plaintext)?,
            Self::ChaCha20Poly1305 => {
                symmetric::chacha_encrypt(secret(key, self)?, iv_bytes(&iv)?, plaintext)?
            }
            Self::Rsa { padding } => {
                let public = key.rsa_public_key().ok_or_else(|| {
                    CipherError::illegal(format!("{self} encryption needs an RSA key"))
                })?;
                asymmetric::encrypt(&public, *padding, plaintext)?
            }
        };
        Ok(EncryptedData::new(iv, ciphertext))
    }

    /// Decrypt an `IV ‖ ciphertext` payload
    ///
    /// # Errors
    ///
    /// - `IllegalCryptoParameters` for a key that does not fit the transform
    /// - `CryptoFailure` for a truncated payload or a padding, MAC or block failure
    pub fn decrypt(&self, key: &KeyMaterial, payload: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        let iv_len = self.iv_len();
        if payload.len() < iv_len {
            return Err(CipherError::failure(format!(
                "payload of {} bytes is shorter than the {iv_len}-byte IV",
                payload.len()
            )));
        }
        let (iv, ciphertext) = payload.split_at(iv_len);

        let plaintext = match self {
            Self::Aes { mode, padding } => {
                let key = secret(key, self)?;
                match mode {
                    BlockMode::Ecb => symmetric::ecb_decrypt(key, *padding, ciphertext)?,
                    BlockMode::Cbc => symmetric::cbc_decrypt(key, iv, *padding, ciphertext)?,
                }
            }
            Self::AesGcm => symmetric::gcm_decrypt(secret(key, self)?, iv, ciphertext)?,
            Self::ChaCha20Poly1305 => symmetric::chacha_decrypt(secret(key, self)?, iv, ciphertext)?,
            Self::Rsa { padding } => {
                let private = key.rsa_private_key().ok_or_else(|| {
                    CipherError::illegal(format!("{self} decryption needs an RSA private key"))
                })?;
                asymmetric::decrypt(private, *padding, ciphertext)?
            }
        };
        Ok(Zeroizing::new(plaintext))
    }

    fn prepare_iv(&self, pinned: Option<&[u8]>) -> Result<Option<Vec<u8>>> {
        let expected = self.iv_len();
        match pinned {
            Some(_) if expected == 0 => Err(CipherError::illegal(format!(
                "{self} does not take an initialization vector"
            ))),
            Some(iv) if iv.len() != expected => Err(CipherError::illegal(format!(
                "{self} needs a {expected}-byte initialization vector, got {}",
                iv.len()
            ))),
            Some(iv) => Ok(Some(iv.to_vec())),
            None if expected == 0 => Ok(None),
            None => {
                let mut iv = vec![0u8; expected];
                rand::rng().fill_bytes(&mut iv);
                Ok(Some(iv))
            }
        }
    }
}

impl FromStr for Transform {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aes { mode, padding } => {
                let mode = match mode {
                    BlockMode::Ecb => "ECB",
                    BlockMode::Cbc => "CBC",
                };
                let padding = match padding {
                    Padding::Pkcs7 => "PKCS5Padding",
                    Padding::None => "NoPadding",
                };
                write!(f, "AES/{mode}/{padding}")
            }
            Self::AesGcm => f.write_str("AES/GCM/NoPadding"),
            Self::ChaCha20Poly1305 => f.write_str("ChaCha20-Poly1305"),
            Self::Rsa { padding } => match padding {
                RsaPadding::Pkcs1 => f.write_str("RSA/ECB/PKCS1Padding"),
                RsaPadding::OaepSha256 => f.write_str("RSA/ECB/OAEPWithSHA-256AndMGF1Padding"),
            },
        }
    }
}

fn unsupported(name: &str) -> CipherError {
    CipherError::illegal(format!("unsupported algorithm '{name}'"))
}

fn secret<'k>(key: &'k KeyMaterial, transform: &Transform) -> Result<&'k [u8]> {
    key.as_secret()
        .ok_or_else(|| CipherError::illegal(format!("{transform} needs a secret key")))
}

fn iv_bytes(iv: &Option<Vec<u8>>) -> Result<&[u8]> {
    iv.as_deref()
        .ok_or_else(|| CipherError::illegal("initialization vector missing"))
}
