//! Built-in keystore implementations

mod image;
mod local_store;
mod protection;
mod static_store;

pub use image::KeystoreImageBuilder;
pub use local_store::LocalKeyStore;
pub use protection::ProtectionState;
pub use static_store::StaticKeyStore;

/// Keystore type of sealed keycrypt images (matched case-insensitively)
pub const CKS_KEYSTORE_TYPE: &str = "CKS";
