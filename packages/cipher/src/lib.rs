//! # Keycrypt Cipher
//!
//! Encryption and decryption with keystore-backed keys and a self-describing
//! ciphertext format.
//!
//! ## Features
//!
//! - **Templates**: ciphertexts render as `{v2c}{algorithm}{keyAlias}{base64}` and
//!   decrypt without the caller repeating algorithm or key
//! - **Parameter resolution**: explicit parameters beat template contents, which
//!   beat configured defaults; a missing default is an error, never a guess
//! - **Transforms**: AES (ECB, CBC, GCM), ChaCha20-Poly1305 and multi-block RSA
//! - **Dispatch**: [`CryptoService`] routes each value to the provider that
//!   recognizes its format
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use keycrypt_cipher::prelude::*;
//! use keycrypt_key::{KeyMaterial, StaticKeyStore};
//! use std::sync::Arc;
//!
//! let keystore = Arc::new(StaticKeyStore::new("main").with_key("K1", KeyMaterial::secret([7u8; 32])));
//! let config = CryptoSubsystemConfig::new()
//!     .with_default_algorithm("AES/CBC/PKCS5Padding")
//!     .with_default_key_alias("K1");
//! let provider: Arc<dyn CryptoProvider> = Arc::new(V2CryptoProvider::new(keystore, config));
//! let service = CryptoService::new(provider, Vec::new());
//!
//! let template = service.encrypt("secret")?;
//! assert_eq!(service.decrypt(&template)?.as_string()?, "secret");
//!
//! let pinned = service
//!     .encrypt_dsl()
//!     .algorithm("AES/GCM/NoPadding")
//!     .initialization_vector([0u8; 12])
//!     .encrypt("secret")?;
//! ```

#![forbid(unsafe_code)]

/// Cipher transforms
pub mod cipher;
pub mod config;
pub mod error;
pub mod parameter;
pub mod provider;
pub mod request;
pub mod resolver;
pub mod result;
pub mod service;
pub mod template;

pub use cipher::{BlockMode, Padding, RsaPadding, Transform};
pub use config::CryptoSubsystemConfig;
pub use error::{CipherError, Result};
pub use parameter::{CryptoParameter, what_parameter_defined};
pub use provider::{CryptoProvider, V2_PROVIDER_NAME, V2_TEMPLATE_TAG, V2CryptoProvider};
pub use request::{CryptoRequest, DecryptionRequest, EncryptionRequest, RequestParameters};
pub use resolver::{KeySource, ParameterResolver, ResolvedKey, ResolvedParameters};
pub use result::{DecryptResult, EncryptResult, EncryptedData, EncryptionMetaInfo};
pub use service::{CryptoService, DecryptDslRequest, EncryptDslRequest};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CipherError, CryptoProvider, CryptoService, CryptoSubsystemConfig, DecryptResult,
        EncryptResult, EncryptionMetaInfo, Result, V2CryptoProvider,
    };
}
