//! # Keycrypt Key Management
//!
//! Named keystores, per-key password protection and deprecation tracking.
//!
//! ## Features
//!
//! - **Keystores**: [`LocalKeyStore`] loaded once from a sealed `CKS` image, and
//!   [`StaticKeyStore`] built from in-memory key material
//! - **Repository**: [`KeyStoreRepository`] aggregates keystores, resolves the
//!   default one, and fails atomically when any member is misconfigured
//! - **Images**: [`KeystoreImageBuilder`] produces the sealed images that
//!   [`LocalKeyStore`] reads through a [`KeystoreSource`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use keycrypt_key::prelude::*;
//!
//! let image = KeystoreImageBuilder::new()
//!     .with_entry("db-key", KeyMaterial::secret([7u8; 32]))
//!     .seal(&Password::new("store-pass"))?;
//!
//! let source = InMemoryKeystoreSource::new().with_image("mem://main", image);
//! let config = KeystoreSubsystemConfig::new().with_keystore(KeystoreConfig::Local(
//!     LocalKeystoreConfig::new("main", "mem://main", "CKS", "store-pass"),
//! ));
//!
//! let repository = KeyStoreRepository::new(&config, &source)?;
//! let key = repository.default_keystore().and_then(|ks| ks.aliased_key("db-key"));
//! ```

#![forbid(unsafe_code)]

pub mod aliased_key;
pub mod config;
pub mod error;
pub mod material;
pub mod repository;
pub mod source;
pub mod store;
pub mod traits;

pub use aliased_key::AliasedKey;
pub use config::{
    KeyConfig, KeystoreConfig, KeystoreSubsystemConfig, LocalKeystoreConfig,
    RemoteKeystoreConfig,
};
pub use error::{KeyError, PasswordMismatch, Result};
pub use material::{KeyKind, KeyMaterial, SecretKey};
pub use repository::KeyStoreRepository;
pub use source::{InMemoryKeystoreSource, KeystoreSource};
pub use store::{
    CKS_KEYSTORE_TYPE, KeystoreImageBuilder, LocalKeyStore, ProtectionState, StaticKeyStore,
};
pub use traits::KeyStore;

pub use keycrypt_common::Password;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AliasedKey, InMemoryKeystoreSource, KeyConfig, KeyError, KeyKind, KeyMaterial, KeyStore,
        KeyStoreRepository, KeystoreConfig, KeystoreImageBuilder, KeystoreSubsystemConfig,
        LocalKeyStore, LocalKeystoreConfig, Password, Result, StaticKeyStore,
    };
}
