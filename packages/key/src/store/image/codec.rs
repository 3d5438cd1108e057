//! JSON layout of sealed keystore images

use super::encryption::{self, NONCE_SIZE, SALT_SIZE};
use crate::KeyKind;
use base64::{Engine, engine::general_purpose::STANDARD};
use keycrypt_common::Password;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use zeroize::Zeroizing;

pub(super) const IMAGE_FORMAT: &str = "CKS";
pub(super) const IMAGE_VERSION: u32 = 1;

/// Why an image could not be opened or produced
#[derive(Debug, Error)]
pub(crate) enum ImageError {
    #[error("image is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported image format '{0}'")]
    Format(String),

    #[error("unsupported image version {0}")]
    Version(u32),

    #[error("field '{0}' is not valid base64")]
    Base64(&'static str),

    #[error("field '{field}' has {actual} bytes, expected {expected}")]
    Length {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("key derivation needs at least one iteration")]
    Iterations,

    #[error("store password does not open the image")]
    StorePassword,

    #[error("key password does not open entry '{0}'")]
    KeyPassword(String),

    #[error("duplicate alias '{0}'")]
    DuplicateAlias(String),

    #[error("sealing failed")]
    Sealing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct KdfParams {
    pub(super) iterations: u32,
    pub(super) salt: String,
}

impl KdfParams {
    pub(super) fn generate(iterations: u32) -> Self {
        Self {
            iterations,
            salt: STANDARD.encode(encryption::random_bytes(SALT_SIZE)),
        }
    }

    fn derive(&self, password: &[u8]) -> Result<Zeroizing<[u8; 32]>, ImageError> {
        if self.iterations == 0 {
            return Err(ImageError::Iterations);
        }
        let salt = decode_field("salt", &self.salt)?;
        Ok(encryption::derive_key(password, &salt, self.iterations))
    }

    /// Seal `data` under a key derived from `password`, returning (nonce, sealed)
    pub(super) fn seal(&self, password: &[u8], data: &[u8]) -> Result<(String, String), ImageError> {
        let key = self.derive(password)?;
        let nonce = encryption::random_bytes(NONCE_SIZE);
        let sealed = encryption::seal(data, &key, &nonce)?;
        Ok((STANDARD.encode(nonce), STANDARD.encode(sealed)))
    }

    /// Open data sealed by [`KdfParams::seal`]; `None` on a wrong password
    fn open(
        &self,
        password: &[u8],
        nonce: &str,
        sealed: &str,
    ) -> Result<Option<Zeroizing<Vec<u8>>>, ImageError> {
        let key = self.derive(password)?;
        let nonce = decode_field("nonce", nonce)?;
        if nonce.len() != NONCE_SIZE {
            return Err(ImageError::Length {
                field: "nonce",
                expected: NONCE_SIZE,
                actual: nonce.len(),
            });
        }
        let sealed = decode_field("payload", sealed)?;
        Ok(encryption::open(&sealed, &key, &nonce))
    }
}

/// Outer envelope
#[derive(Debug, Serialize, Deserialize)]
pub(super) struct SealedImage {
    pub(super) format: String,
    pub(super) version: u32,
    pub(super) kdf: KdfParams,
    pub(super) nonce: String,
    pub(super) payload: String,
}

/// Password protection of a single entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct EntryProtection {
    pub(super) kdf: KdfParams,
    pub(super) nonce: String,
}

/// One key inside the sealed payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ImageEntry {
    pub(super) alias: String,
    pub(super) kind: KeyKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) protection: Option<EntryProtection>,
    pub(super) material: String,
}

impl ImageEntry {
    pub(crate) fn alias(&self) -> &str {
        &self.alias
    }

    pub(crate) fn kind(&self) -> KeyKind {
        self.kind
    }

    pub(crate) fn is_protected(&self) -> bool {
        self.protection.is_some()
    }

    /// Encoded key material, unsealed with `password` when the entry is protected
    pub(crate) fn material(
        &self,
        password: Option<&Password>,
    ) -> Result<Zeroizing<Vec<u8>>, ImageError> {
        match (&self.protection, password) {
            (Some(protection), Some(password)) => protection
                .kdf
                .open(password.as_bytes(), &protection.nonce, &self.material)?
                .ok_or_else(|| ImageError::KeyPassword(self.alias.clone())),
            (Some(_), None) => Err(ImageError::KeyPassword(self.alias.clone())),
            (None, _) => decode_field("material", &self.material).map(Zeroizing::new),
        }
    }
}

/// Open an image with the store password and list its entries
pub(crate) fn open_image(bytes: &[u8], password: &Password) -> Result<Vec<ImageEntry>, ImageError> {
    let image: SealedImage = serde_json::from_slice(bytes)?;
    if !image.format.eq_ignore_ascii_case(IMAGE_FORMAT) {
        return Err(ImageError::Format(image.format));
    }
    if image.version != IMAGE_VERSION {
        return Err(ImageError::Version(image.version));
    }

    let payload = image
        .kdf
        .open(password.as_bytes(), &image.nonce, &image.payload)?
        .ok_or(ImageError::StorePassword)?;
    let entries: Vec<ImageEntry> = serde_json::from_slice(&payload)?;

    let mut seen = HashSet::with_capacity(entries.len());
    for entry in &entries {
        if !seen.insert(entry.alias.as_str()) {
            return Err(ImageError::DuplicateAlias(entry.alias.clone()));
        }
    }
    Ok(entries)
}

fn decode_field(field: &'static str, value: &str) -> Result<Vec<u8>, ImageError> {
    STANDARD.decode(value).map_err(|_| ImageError::Base64(field))
}
