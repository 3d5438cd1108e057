//! Producing sealed keystore images

use super::codec::{
    EntryProtection, IMAGE_FORMAT, IMAGE_VERSION, ImageEntry, KdfParams, SealedImage,
};
use crate::{KeyError, KeyMaterial, Result};
use base64::{Engine, engine::general_purpose::STANDARD};
use keycrypt_common::Password;
use zeroize::Zeroizing;

const DEFAULT_ITERATIONS: u32 = 100_000;

struct PendingEntry {
    alias: String,
    material: KeyMaterial,
    password: Option<Password>,
}

/// Builder for sealed `CKS` keystore images
///
/// ```rust,ignore
/// let image = KeystoreImageBuilder::new()
///     .with_entry("plain", KeyMaterial::secret([1u8; 16]))
///     .with_protected_entry("guarded", KeyMaterial::secret([2u8; 32]), "key-pass")
///     .seal(&Password::new("store-pass"))?;
/// ```
pub struct KeystoreImageBuilder {
    iterations: u32,
    entries: Vec<PendingEntry>,
}

impl KeystoreImageBuilder {
    /// Empty image with the default PBKDF2 iteration count
    #[must_use]
    pub fn new() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            entries: Vec::new(),
        }
    }

    /// PBKDF2 iterations for the store and every protected entry
    #[must_use]
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Add an unprotected key
    #[must_use]
    pub fn with_entry(mut self, alias: impl Into<String>, material: impl Into<KeyMaterial>) -> Self {
        self.entries.push(PendingEntry {
            alias: alias.into(),
            material: material.into(),
            password: None,
        });
        self
    }

    /// Add a key sealed under its own password
    ///
    /// An empty password leaves the key unprotected.
    #[must_use]
    pub fn with_protected_entry(
        mut self,
        alias: impl Into<String>,
        material: impl Into<KeyMaterial>,
        password: impl Into<Password>,
    ) -> Self {
        self.entries.push(PendingEntry {
            alias: alias.into(),
            material: material.into(),
            password: Some(password.into()),
        });
        self
    }

    /// Seal the image under the store password
    ///
    /// # Errors
    ///
    /// Returns `ImageEncoding` for a zero iteration count, a duplicate alias or a
    /// sealing failure, and `InvalidKeyMaterial` if a key cannot be encoded.
    pub fn seal(&self, store_password: &Password) -> Result<Vec<u8>> {
        if self.iterations == 0 {
            return Err(KeyError::ImageEncoding(
                "key derivation needs at least one iteration".into(),
            ));
        }

        let mut entries = Vec::with_capacity(self.entries.len());
        for pending in &self.entries {
            if entries.iter().any(|e: &ImageEntry| e.alias == pending.alias) {
                return Err(KeyError::ImageEncoding(format!(
                    "duplicate alias '{}'",
                    pending.alias
                )));
            }
            entries.push(self.encode_entry(pending)?);
        }

        let payload = Zeroizing::new(serde_json::to_vec(&entries).map_err(encoding_error)?);
        let kdf = KdfParams::generate(self.iterations);
        let (nonce, payload) = kdf
            .seal(store_password.as_bytes(), &payload)
            .map_err(encoding_error)?;

        let image = SealedImage {
            format: IMAGE_FORMAT.to_string(),
            version: IMAGE_VERSION,
            kdf,
            nonce,
            payload,
        };
        serde_json::to_vec(&image).map_err(encoding_error)
    }

    fn encode_entry(&self, pending: &PendingEntry) -> Result<ImageEntry> {
        let encoded = pending.material.to_encoded()?;
        let (protection, material) = match Password::non_empty(pending.password.as_ref()) {
            Some(password) => {
                let kdf = KdfParams::generate(self.iterations);
                let (nonce, sealed) = kdf
                    .seal(password.as_bytes(), &encoded)
                    .map_err(encoding_error)?;
                (Some(EntryProtection { kdf, nonce }), sealed)
            }
            None => (None, STANDARD.encode(encoded.as_slice())),
        };

        Ok(ImageEntry {
            alias: pending.alias.clone(),
            kind: pending.material.kind(),
            protection,
            material,
        })
    }
}

impl Default for KeystoreImageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn encoding_error(error: impl std::fmt::Display) -> KeyError {
    KeyError::ImageEncoding(error.to_string())
}
