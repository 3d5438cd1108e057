//! AES-GCM sealing and PBKDF2 key derivation for keystore images

use super::codec::ImageError;
use aes_gcm::{
    Aes256Gcm,
    aead::{Aead, KeyInit, generic_array::GenericArray},
};
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

pub(super) const NONCE_SIZE: usize = 12;
pub(super) const SALT_SIZE: usize = 16;

/// Derive a 256-bit sealing key from a password
pub(super) fn derive_key(password: &[u8], salt: &[u8], iterations: u32) -> Zeroizing<[u8; 32]> {
    let mut key = Zeroizing::new([0u8; 32]);
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut key[..]);
    key
}

/// Fresh random bytes for salts and nonces
pub(super) fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rand::rng().fill_bytes(&mut bytes);
    bytes
}

/// Seal `data` under `key`; the nonce is stored next to the ciphertext by the caller
pub(super) fn seal(data: &[u8], key: &[u8; 32], nonce: &[u8]) -> Result<Vec<u8>, ImageError> {
    let cipher = Aes256Gcm::new_from_slice(key.as_ref()).map_err(|_| ImageError::Sealing)?;
    cipher
        .encrypt(GenericArray::from_slice(nonce), data)
        .map_err(|_| ImageError::Sealing)
}

/// Open sealed data; `None` when the key does not authenticate it
pub(super) fn open(sealed: &[u8], key: &[u8; 32], nonce: &[u8]) -> Option<Zeroizing<Vec<u8>>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_ref()).ok()?;
    cipher
        .decrypt(GenericArray::from_slice(nonce), sealed)
        .ok()
        .map(Zeroizing::new)
}
