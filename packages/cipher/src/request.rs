//! Encryption and decryption requests

use keycrypt_key::KeyMaterial;
use std::fmt;
use std::sync::Arc;
use zeroize::Zeroizing;

/// Optional parameters shared by encryption and decryption requests
///
/// Nothing here is resolved when set. Defaults and keystore lookups are
/// applied once, when the request is executed.
#[derive(Debug, Clone, Default)]
pub struct RequestParameters {
    algorithm: Option<String>,
    key: Option<Arc<KeyMaterial>>,
    key_alias: Option<String>,
    provider: Option<String>,
    initialization_vector: Option<Vec<u8>>,
}

impl RequestParameters {
    /// Explicit transform name
    #[must_use]
    pub fn algorithm(&self) -> Option<&str> {
        self.algorithm.as_deref()
    }

    /// Explicit key material
    #[must_use]
    pub fn key(&self) -> Option<&Arc<KeyMaterial>> {
        self.key.as_ref()
    }

    /// Explicit key alias
    #[must_use]
    pub fn key_alias(&self) -> Option<&str> {
        self.key_alias.as_deref()
    }

    /// Provider name the request is addressed to
    #[must_use]
    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    /// Pinned initialization vector
    #[must_use]
    pub fn initialization_vector(&self) -> Option<&[u8]> {
        self.initialization_vector.as_deref()
    }

    pub(crate) fn set_algorithm(&mut self, algorithm: String) {
        self.algorithm = Some(algorithm);
    }

    pub(crate) fn set_key(&mut self, key: Arc<KeyMaterial>) {
        self.key = Some(key);
    }

    pub(crate) fn set_key_alias(&mut self, alias: String) {
        self.key_alias = Some(alias);
    }

    pub(crate) fn set_provider(&mut self, provider: String) {
        self.provider = Some(provider);
    }

    pub(crate) fn set_initialization_vector(&mut self, iv: Vec<u8>) {
        self.initialization_vector = Some(iv);
    }
}

/// Common view of encryption and decryption requests
pub trait CryptoRequest {
    /// Optional parameters of the request
    fn parameters(&self) -> &RequestParameters;
}

/// Generates the `with_*` setters shared by both request types
macro_rules! request_setters {
    ($request:ty) => {
        impl $request {
            /// Use this transform instead of the configured default
            #[must_use]
            pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
                self.parameters.set_algorithm(algorithm.into());
                self
            }

            /// Use this key; takes precedence over any alias
            #[must_use]
            pub fn with_key(mut self, key: impl Into<Arc<KeyMaterial>>) -> Self {
                self.parameters.set_key(key.into());
                self
            }

            /// Look the key up under this alias
            #[must_use]
            pub fn with_key_alias(mut self, alias: impl Into<String>) -> Self {
                self.parameters.set_key_alias(alias.into());
                self
            }

            /// Address a specific provider
            #[must_use]
            pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
                self.parameters.set_provider(provider.into());
                self
            }

            /// Pin the initialization vector
            #[must_use]
            pub fn with_initialization_vector(mut self, iv: impl Into<Vec<u8>>) -> Self {
                self.parameters.set_initialization_vector(iv.into());
                self
            }
        }

        impl CryptoRequest for $request {
            fn parameters(&self) -> &RequestParameters {
                &self.parameters
            }
        }
    };
}

/// Plaintext plus optional parameters
#[derive(Clone)]
pub struct EncryptionRequest {
    plaintext: Zeroizing<Vec<u8>>,
    parameters: RequestParameters,
}

impl EncryptionRequest {
    /// Request to encrypt `plaintext` with configured defaults
    pub fn new(plaintext: impl Into<Vec<u8>>) -> Self {
        Self::from_parts(plaintext, RequestParameters::default())
    }

    pub(crate) fn from_parts(plaintext: impl Into<Vec<u8>>, parameters: RequestParameters) -> Self {
        Self {
            plaintext: Zeroizing::new(plaintext.into()),
            parameters,
        }
    }

    /// Data to encrypt
    #[must_use]
    pub fn plaintext(&self) -> &[u8] {
        &self.plaintext
    }
}

request_setters!(EncryptionRequest);

impl fmt::Debug for EncryptionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionRequest")
            .field("plaintext", &format_args!("{} bytes", self.plaintext.len()))
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// Ciphertext (template or raw `IV ‖ ciphertext`) plus optional parameters
#[derive(Debug, Clone)]
pub struct DecryptionRequest {
    ciphertext: Vec<u8>,
    parameters: RequestParameters,
}

impl DecryptionRequest {
    /// Request to decrypt `ciphertext`
    pub fn new(ciphertext: impl Into<Vec<u8>>) -> Self {
        Self::from_parts(ciphertext, RequestParameters::default())
    }

    pub(crate) fn from_parts(ciphertext: impl Into<Vec<u8>>, parameters: RequestParameters) -> Self {
        Self {
            ciphertext: ciphertext.into(),
            parameters,
        }
    }

    /// Data to decrypt
    #[must_use]
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }
}

request_setters!(DecryptionRequest);
