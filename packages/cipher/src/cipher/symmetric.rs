//! AES and ChaCha20-Poly1305 primitives

use super::Padding;
use crate::{CipherError, Result};
use aes_gcm::{AesGcm, aead::Aead, aead::consts::U12, aead::generic_array::GenericArray};
use cbc::cipher::{
    BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit,
    block_padding::{NoPadding, Pkcs7},
};
use chacha20poly1305::ChaCha20Poly1305;

pub(super) const AES_BLOCK_SIZE: usize = 16;
pub(super) const AEAD_NONCE_SIZE: usize = 12;

/// Runs `$body` with `$aes` bound to the AES variant matching the key length
macro_rules! with_aes {
    ($key:expr, $aes:ident => $body:expr) => {
        match $key.len() {
            16 => {
                type $aes = aes::Aes128;
                $body
            }
            24 => {
                type $aes = aes::Aes192;
                $body
            }
            32 => {
                type $aes = aes::Aes256;
                $body
            }
            other => Err(CipherError::illegal(format!(
                "AES keys are 16, 24 or 32 bytes, got {other}"
            ))),
        }
    };
}

fn ensure_block_aligned(data: &[u8]) -> Result<()> {
    if data.len() % AES_BLOCK_SIZE == 0 {
        Ok(())
    } else {
        Err(CipherError::failure(format!(
            "NoPadding input of {} bytes is not a multiple of the block size",
            data.len()
        )))
    }
}

fn bad_padding<E>(_: E) -> CipherError {
    CipherError::failure("bad padding or wrong key")
}

pub(super) fn ecb_encrypt(key: &[u8], padding: Padding, data: &[u8]) -> Result<Vec<u8>> {
    with_aes!(key, Aes => {
        let cipher = ecb::Encryptor::<Aes>::new_from_slice(key).map_err(invalid_key)?;
        match padding {
            Padding::Pkcs7 => Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(data)),
            Padding::None => {
                ensure_block_aligned(data)?;
                Ok(cipher.encrypt_padded_vec_mut::<NoPadding>(data))
            }
        }
    })
}

pub(super) fn ecb_decrypt(key: &[u8], padding: Padding, data: &[u8]) -> Result<Vec<u8>> {
    with_aes!(key, Aes => {
        let cipher = ecb::Decryptor::<Aes>::new_from_slice(key).map_err(invalid_key)?;
        match padding {
            Padding::Pkcs7 => cipher.decrypt_padded_vec_mut::<Pkcs7>(data).map_err(bad_padding),
            Padding::None => {
                ensure_block_aligned(data)?;
                cipher.decrypt_padded_vec_mut::<NoPadding>(data).map_err(bad_padding)
            }
        }
    })
}

pub(super) fn cbc_encrypt(key: &[u8], iv: &[u8], padding: Padding, data: &[u8]) -> Result<Vec<u8>> {
    with_aes!(key, Aes => {
        let cipher = cbc::Encryptor::<Aes>::new_from_slices(key, iv).map_err(invalid_key)?;
        match padding {
            Padding::Pkcs7 => Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(data)),
            Padding::None => {
                ensure_block_aligned(data)?;
                Ok(cipher.encrypt_padded_vec_mut::<NoPadding>(data))
            }
        }
    })
}

pub(super) fn cbc_decrypt(key: &[u8], iv: &[u8], padding: Padding, data: &[u8]) -> Result<Vec<u8>> {
    with_aes!(key, Aes => {
        let cipher = cbc::Decryptor::<Aes>::new_from_slices(key, iv).map_err(invalid_key)?;
        match padding {
            Padding::Pkcs7 => cipher.decrypt_padded_vec_mut::<Pkcs7>(data).map_err(bad_padding),
            Padding::None => {
                ensure_block_aligned(data)?;
                cipher.decrypt_padded_vec_mut::<NoPadding>(data).map_err(bad_padding)
            }
        }
    })
}

pub(super) fn gcm_encrypt(key: &[u8], nonce: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    with_aes!(key, Aes => {
        let cipher = AesGcm::<Aes, U12>::new_from_slice(key).map_err(invalid_key)?;
        cipher
            .encrypt(GenericArray::from_slice(nonce), data)
            .map_err(|_| CipherError::failure("AES-GCM encryption failed"))
    })
}

pub(super) fn gcm_decrypt(key: &[u8], nonce: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    with_aes!(key, Aes => {
        let cipher = AesGcm::<Aes, U12>::new_from_slice(key).map_err(invalid_key)?;
        cipher
            .decrypt(GenericArray::from_slice(nonce), data)
            .map_err(|_| CipherError::failure("authentication failed or wrong key"))
    })
}

pub(super) fn chacha_encrypt(key: &[u8], nonce: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new_from_slice(key).map_err(invalid_key)?;
    cipher
        .encrypt(GenericArray::from_slice(nonce), data)
        .map_err(|_| CipherError::failure("ChaCha20-Poly1305 encryption failed"))
}

pub(super) fn chacha_decrypt(key: &[u8], nonce: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new_from_slice(key).map_err(invalid_key)?;
    cipher
        .decrypt(GenericArray::from_slice(nonce), data)
        .map_err(|_| CipherError::failure("authentication failed or wrong key"))
}

fn invalid_key<E: std::fmt::Display>(e: E) -> CipherError {
    CipherError::illegal(format!("invalid key: {e}"))
}
