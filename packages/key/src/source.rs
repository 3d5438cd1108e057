//! Backing-store sources for keystore images
//!
//! Reading keystore files or fetching them remotely belongs to the
//! configuration loader. Keystores only see the bytes it hands over.

use std::collections::HashMap;

/// Resolves a keystore location to its image bytes
pub trait KeystoreSource: Send + Sync {
    /// Image bytes at `location`, or `None` if the location cannot be read
    fn read(&self, location: &str) -> Option<Vec<u8>>;
}

/// Keystore images held in memory, keyed by location
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeystoreSource {
    images: HashMap<String, Vec<u8>>,
}

impl InMemoryKeystoreSource {
    /// Create an empty source
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image at `location`
    #[must_use]
    pub fn with_image(mut self, location: impl Into<String>, image: Vec<u8>) -> Self {
        self.images.insert(location.into(), image);
        self
    }
}

impl KeystoreSource for InMemoryKeystoreSource {
    fn read(&self, location: &str) -> Option<Vec<u8>> {
        self.images.get(location).cloned()
    }
}
