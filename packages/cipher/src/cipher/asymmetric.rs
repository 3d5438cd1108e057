//! Multi-block RSA encryption
//!
//! Plaintext is cut into chunks that fit one RSA block after padding; each
//! chunk encrypts to exactly one modulus-sized block.

use super::RsaPadding;
use crate::{CipherError, Result};
use rsa::rand_core::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

const PKCS1_OVERHEAD: usize = 11;
const OAEP_SHA256_OVERHEAD: usize = 2 * 32 + 2;

fn chunk_len(modulus_len: usize, padding: RsaPadding) -> Result<usize> {
    let overhead = match padding {
        RsaPadding::Pkcs1 => PKCS1_OVERHEAD,
        RsaPadding::OaepSha256 => OAEP_SHA256_OVERHEAD,
    };
    modulus_len
        .checked_sub(overhead)
        .filter(|len| *len > 0)
        .ok_or_else(|| CipherError::illegal("RSA key too small for the requested padding"))
}

pub(super) fn encrypt(key: &RsaPublicKey, padding: RsaPadding, data: &[u8]) -> Result<Vec<u8>> {
    let modulus_len = key.size();
    let chunk_len = chunk_len(modulus_len, padding)?;
    // empty input still produces one block
    let chunks: Vec<&[u8]> = if data.is_empty() {
        vec![data]
    } else {
        data.chunks(chunk_len).collect()
    };

    let mut rng = OsRng;
    let mut out = Vec::with_capacity(chunks.len() * modulus_len);
    for chunk in chunks {
        let block = match padding {
            RsaPadding::Pkcs1 => key.encrypt(&mut rng, Pkcs1v15Encrypt, chunk),
            RsaPadding::OaepSha256 => key.encrypt(&mut rng, Oaep::new::<Sha256>(), chunk),
        }
        .map_err(|e| CipherError::failure(format!("RSA encryption failed: {e}")))?;
        out.extend_from_slice(&block);
    }
    Ok(out)
}

pub(super) fn decrypt(key: &RsaPrivateKey, padding: RsaPadding, data: &[u8]) -> Result<Vec<u8>> {
    let modulus_len = key.size();
    if data.is_empty() || data.len() % modulus_len != 0 {
        return Err(CipherError::failure(format!(
            "RSA ciphertext of {} bytes is not a whole number of {modulus_len}-byte blocks",
            data.len()
        )));
    }

    let mut out = Vec::with_capacity(data.len());
    for block in data.chunks(modulus_len) {
        let chunk = match padding {
            RsaPadding::Pkcs1 => key.decrypt(Pkcs1v15Encrypt, block),
            RsaPadding::OaepSha256 => key.decrypt(Oaep::new::<Sha256>(), block),
        }
        .map_err(|_| CipherError::failure("bad padding or wrong key"))?;
        out.extend_from_slice(&chunk);
    }
    Ok(out)
}
