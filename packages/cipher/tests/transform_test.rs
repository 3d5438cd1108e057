//! Transform parsing and cipher behaviour

use hex_literal::hex;
use keycrypt_cipher::{BlockMode, CipherError, Padding, RsaPadding, Transform};
use keycrypt_key::KeyMaterial;
use rsa::RsaPrivateKey;
use rsa::rand_core::OsRng;

const KEY_128: [u8; 16] = hex!("000102030405060708090a0b0c0d0e0f");

fn rsa_key() -> RsaPrivateKey {
    RsaPrivateKey::new(&mut OsRng, 1024).unwrap()
}

#[test]
fn test_parse_supported_names() {
    let cases = [
        ("AES", Transform::Aes { mode: BlockMode::Ecb, padding: Padding::Pkcs7 }),
        ("aes/ecb/pkcs5padding", Transform::Aes { mode: BlockMode::Ecb, padding: Padding::Pkcs7 }),
        ("AES/ECB/NoPadding", Transform::Aes { mode: BlockMode::Ecb, padding: Padding::None }),
        ("AES/CBC/PKCS5Padding", Transform::Aes { mode: BlockMode::Cbc, padding: Padding::Pkcs7 }),
        ("AES/CBC/PKCS7Padding", Transform::Aes { mode: BlockMode::Cbc, padding: Padding::Pkcs7 }),
        ("AES/GCM/NoPadding", Transform::AesGcm),
        ("ChaCha20-Poly1305", Transform::ChaCha20Poly1305),
        ("RSA", Transform::Rsa { padding: RsaPadding::Pkcs1 }),
        ("RSA/NONE/PKCS1Padding", Transform::Rsa { padding: RsaPadding::Pkcs1 }),
        (
            "RSA/ECB/OAEPWithSHA-256AndMGF1Padding",
            Transform::Rsa { padding: RsaPadding::OaepSha256 },
        ),
    ];

    for (name, expected) in cases {
        assert_eq!(Transform::parse(name).unwrap(), expected, "{name}");
    }
}

#[test]
fn test_parse_rejects_unknown_names() {
    for name in ["DES", "AES/CTR/NoPadding", "AES/CBC", "AES/GCM/PKCS5Padding", "RSA/ECB/NoPadding", ""] {
        assert!(
            matches!(Transform::parse(name), Err(CipherError::IllegalCryptoParameters(_))),
            "{name}"
        );
    }
}

#[test]
fn test_iv_lengths() {
    assert_eq!(Transform::parse("AES/CBC/PKCS5Padding").unwrap().iv_len(), 16);
    assert_eq!(Transform::parse("AES/GCM/NoPadding").unwrap().iv_len(), 12);
    assert_eq!(Transform::parse("ChaCha20-Poly1305").unwrap().iv_len(), 12);
    assert_eq!(Transform::parse("AES").unwrap().iv_len(), 0);
    assert_eq!(Transform::parse("RSA").unwrap().iv_len(), 0);
}

#[test]
fn test_aes_known_answer() {
    // FIPS-197 appendix C.1
    let transform = Transform::parse("AES/ECB/NoPadding").unwrap();
    let key = KeyMaterial::secret(KEY_128);
    let plaintext = hex!("00112233445566778899aabbccddeeff");

    let encrypted = transform.encrypt(&key, None, &plaintext).unwrap();

    assert_eq!(encrypted.iv(), None);
    assert_eq!(encrypted.ciphertext(), hex!("69c4e0d86a7b0430d8cdb78070b4c55a"));
    let decrypted = transform.decrypt(&key, encrypted.ciphertext()).unwrap();
    assert_eq!(decrypted.as_slice(), plaintext);
}

#[test]
fn test_all_aes_key_sizes() {
    let transform = Transform::parse("AES/CBC/PKCS5Padding").unwrap();
    for len in [16, 24, 32] {
        let key = KeyMaterial::secret(vec![0x42; len]);
        let encrypted = transform.encrypt(&key, None, b"payload").unwrap();
        let decrypted = transform.decrypt(&key, &encrypted.to_payload()).unwrap();
        assert_eq!(decrypted.as_slice(), b"payload");
    }

    let bad = KeyMaterial::secret(vec![0x42; 20]);
    assert!(matches!(
        transform.encrypt(&bad, None, b"payload"),
        Err(CipherError::IllegalCryptoParameters(_))
    ));
}

#[test]
fn test_no_padding_requires_whole_blocks() {
    let transform = Transform::parse("AES/CBC/NoPadding").unwrap();
    let key = KeyMaterial::secret(KEY_128);

    assert!(matches!(
        transform.encrypt(&key, None, b"not sixteen"),
        Err(CipherError::CryptoFailure(_))
    ));
    let encrypted = transform.encrypt(&key, None, &[7u8; 32]).unwrap();
    assert_eq!(encrypted.ciphertext().len(), 32);
}

#[test]
fn test_initialization_vector_rules() {
    let key = KeyMaterial::secret(KEY_128);
    let cbc = Transform::parse("AES/CBC/PKCS5Padding").unwrap();
    let ecb = Transform::parse("AES").unwrap();

    assert!(matches!(
        cbc.encrypt(&key, Some(&[0u8; 12]), b"x"),
        Err(CipherError::IllegalCryptoParameters(_))
    ));
    assert!(matches!(
        ecb.encrypt(&key, Some(&[0u8; 16]), b"x"),
        Err(CipherError::IllegalCryptoParameters(_))
    ));

    let pinned = cbc.encrypt(&key, Some(&[9u8; 16]), b"x").unwrap();
    assert_eq!(pinned.iv(), Some(&[9u8; 16][..]));
    assert_eq!(&pinned.to_payload()[..16], &[9u8; 16]);
}

#[test]
fn test_truncated_payload_fails() {
    let key = KeyMaterial::secret([1u8; 32]);
    let gcm = Transform::parse("AES/GCM/NoPadding").unwrap();

    assert!(matches!(gcm.decrypt(&key, &[0u8; 5]), Err(CipherError::CryptoFailure(_))));
    assert!(matches!(gcm.decrypt(&key, &[0u8; 20]), Err(CipherError::CryptoFailure(_))));
}

#[test]
fn test_symmetric_transform_rejects_rsa_key() {
    let key = KeyMaterial::rsa_private(rsa_key());
    assert!(matches!(
        Transform::parse("AES").unwrap().encrypt(&key, None, b"x"),
        Err(CipherError::IllegalCryptoParameters(_))
    ));
}

#[test]
fn test_rsa_multi_block_round_trip() {
    let private = rsa_key();
    let public = KeyMaterial::rsa_public(private.to_public_key());
    let private = KeyMaterial::rsa_private(private);
    let plaintext: Vec<u8> = (0..1000u32).map(|i| (i % 251) as u8).collect();

    for name in ["RSA", "RSA/ECB/OAEPWithSHA-256AndMGF1Padding"] {
        let transform = Transform::parse(name).unwrap();
        let encrypted = transform.encrypt(&public, None, &plaintext).unwrap();

        assert_eq!(encrypted.ciphertext().len() % 128, 0, "{name}");
        assert!(encrypted.ciphertext().len() > 128, "{name}");
        let decrypted = transform.decrypt(&private, encrypted.ciphertext()).unwrap();
        assert_eq!(decrypted.as_slice(), plaintext.as_slice(), "{name}");
    }
}

#[test]
fn test_rsa_empty_plaintext() {
    let private = KeyMaterial::rsa_private(rsa_key());
    let transform = Transform::parse("RSA").unwrap();

    let encrypted = transform.encrypt(&private, None, b"").unwrap();
    assert_eq!(encrypted.ciphertext().len(), 128);
    assert!(transform.decrypt(&private, encrypted.ciphertext()).unwrap().is_empty());
}

#[test]
fn test_rsa_decrypt_needs_private_key() {
    let private = rsa_key();
    let public = KeyMaterial::rsa_public(private.to_public_key());
    let transform = Transform::parse("RSA").unwrap();
    let encrypted = transform.encrypt(&public, None, b"x").unwrap();

    assert!(matches!(
        transform.decrypt(&public, encrypted.ciphertext()),
        Err(CipherError::IllegalCryptoParameters(_))
    ));
    assert!(matches!(
        transform.decrypt(&KeyMaterial::rsa_private(private), &[0u8; 100]),
        Err(CipherError::CryptoFailure(_))
    ));
}

#[test]
fn test_display_names() {
    assert_eq!(Transform::parse("aes").unwrap().to_string(), "AES/ECB/PKCS5Padding");
    assert_eq!(Transform::parse("rsa").unwrap().to_string(), "RSA/ECB/PKCS1Padding");
    assert!(Transform::parse("AES/GCM/NoPadding").unwrap().is_authenticated());
    assert!(!Transform::parse("AES/CBC/PKCS5Padding").unwrap().is_authenticated());
}
