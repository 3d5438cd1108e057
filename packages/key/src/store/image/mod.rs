//! Sealed `CKS` keystore images
//!
//! An image is a JSON envelope whose payload is the AES-256-GCM sealed list of
//! key entries, keyed by PBKDF2-HMAC-SHA256 of the store password. Protected
//! entries seal their material a second time under the key password.

mod builder;
mod codec;
mod encryption;

pub use builder::KeystoreImageBuilder;
pub(crate) use codec::{open_image, ImageEntry, ImageError};
