//! End-to-end behaviour of the crypto service

use base64::{Engine, engine::general_purpose::STANDARD};
use hex_literal::hex;
use keycrypt_cipher::prelude::*;
use keycrypt_cipher::{CryptoParameter, V2_TEMPLATE_TAG};
use keycrypt_common::LoggingTransformer;
use keycrypt_key::{
    InMemoryKeystoreSource, KeyMaterial, KeyStore, KeyStoreRepository, KeystoreConfig,
    KeystoreImageBuilder, KeystoreSubsystemConfig, LocalKeystoreConfig, Password, StaticKeyStore,
};
use proptest::prelude::*;
use std::sync::Arc;

const KEY_A: [u8; 32] = hex!("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4");
const KEY_B: [u8; 32] = hex!("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f");

fn keystore() -> Arc<dyn KeyStore> {
    Arc::new(
        StaticKeyStore::new("main")
            .with_key("K1", KeyMaterial::secret(KEY_A))
            .with_key("K2", KeyMaterial::secret(KEY_B))
            .with_key("chacha", KeyMaterial::secret(KEY_B))
            .with_deprecated_key("legacy", KeyMaterial::secret(KEY_B)),
    )
}

fn service_with(config: CryptoSubsystemConfig) -> CryptoService {
    let provider: Arc<dyn CryptoProvider> = Arc::new(V2CryptoProvider::new(keystore(), config));
    CryptoService::new(provider, Vec::new())
}

fn service() -> CryptoService {
    LoggingTransformer::init_test();
    service_with(
        CryptoSubsystemConfig::new()
            .with_default_algorithm("AES/CBC/PKCS5Padding")
            .with_default_key_alias("K1"),
    )
}

#[test]
fn test_default_template_round_trip() {
    let service = service();

    let template = service.encrypt("secret").unwrap();

    assert!(template.starts_with("{v2c}{AES/CBC/PKCS5Padding}{K1}{"));
    let segments: Vec<&str> = template
        .trim_start_matches('{')
        .trim_end_matches('}')
        .split("}{")
        .collect();
    assert_eq!(segments.len(), 4);
    assert_eq!(segments[0], V2_TEMPLATE_TAG);
    assert_eq!(segments[2], "K1");
    assert_eq!(service.decrypt(&template).unwrap().as_string().unwrap(), "secret");
}

#[test]
fn test_encryption_is_randomized_unless_iv_is_pinned() {
    let service = service();

    assert_ne!(service.encrypt("same").unwrap(), service.encrypt("same").unwrap());

    let pinned = |service: &CryptoService| {
        service
            .encrypt_dsl()
            .initialization_vector([5u8; 16])
            .encrypt("same")
            .unwrap()
            .as_template()
            .unwrap()
    };
    assert_eq!(pinned(&service), pinned(&service));
}

#[test]
fn test_reported_iv_is_the_one_used() {
    let result = service().encrypt_dsl().encrypt("text").unwrap();
    let iv = result.encrypted_data().iv().unwrap();

    assert_eq!(iv.len(), 16);
    assert_eq!(&result.as_bytes()[..16], iv);
    assert_eq!(result.as_base64(), STANDARD.encode(result.as_bytes()));
}

#[test]
fn test_decrypt_with_other_key_fails() {
    let service = service();
    let encrypted = service
        .encrypt_dsl()
        .algorithm("AES/GCM/NoPadding")
        .key_alias("K1")
        .encrypt("top secret")
        .unwrap();

    let result = service
        .decrypt_dsl()
        .key_alias("K2")
        .decrypt(&encrypted.as_template().unwrap());

    assert!(matches!(result, Err(CipherError::CryptoFailure(_))));
}

#[test]
fn test_cbc_decrypt_with_other_key_fails() {
    let service = service();
    let encrypted = service
        .encrypt_dsl()
        .key_alias("K1")
        .initialization_vector([5u8; 16])
        .encrypt("top secret")
        .unwrap();
    assert_eq!(
        encrypted.encrypted_data().ciphertext(),
        &hex!("0a4c9d6088339a3d348f94ecfac3c7aa")[..]
    );

    let result = service
        .decrypt_dsl()
        .key_alias("K2")
        .decrypt(&encrypted.as_template().unwrap());

    assert!(matches!(result, Err(CipherError::CryptoFailure(_))));
}

#[test]
fn test_explicit_key_beats_alias_end_to_end() {
    let service = service();
    let encrypted = service
        .encrypt_dsl()
        .algorithm("AES/GCM/NoPadding")
        .key(KeyMaterial::secret(KEY_B))
        .key_alias("K1")
        .encrypt("payload")
        .unwrap();

    assert_eq!(encrypted.key_alias(), None);
    let decrypted = service
        .decrypt_dsl()
        .algorithm("AES/GCM/NoPadding")
        .key_alias("K2")
        .decrypt_bytes(encrypted.as_bytes())
        .unwrap();
    assert_eq!(decrypted.as_bytes(), b"payload");
}

#[test]
fn test_explicit_algorithm_beats_default() {
    let encrypted = service()
        .encrypt_dsl()
        .algorithm("ChaCha20-Poly1305")
        .key_alias("chacha")
        .encrypt("payload")
        .unwrap();

    assert_eq!(encrypted.algorithm(), "ChaCha20-Poly1305");
    let template = encrypted.as_template().unwrap();
    assert!(template.starts_with("{v2c}{ChaCha20-Poly1305}{chacha}{"));
    assert_eq!(service().decrypt(&template).unwrap().as_bytes(), b"payload");
}

#[test]
fn test_template_export_needs_an_alias() {
    let encrypted = service()
        .encrypt_dsl()
        .key(KeyMaterial::secret(KEY_A))
        .encrypt("payload")
        .unwrap();

    assert!(matches!(
        encrypted.as_template(),
        Err(CipherError::UnsupportedOperation(_))
    ));
    // the raw forms still work
    assert!(!encrypted.as_base64().is_empty());
}

#[test]
fn test_missing_default_algorithm() {
    let without = service_with(CryptoSubsystemConfig::new().with_default_key_alias("K1"));
    assert!(matches!(
        without.encrypt("text"),
        Err(CipherError::MissingRequiredDefault { parameter: CryptoParameter::Algorithm })
    ));

    let with = service_with(
        CryptoSubsystemConfig::new()
            .with_default_key_alias("K1")
            .with_default_algorithm("AES/CBC/PKCS5Padding"),
    );
    assert!(with.encrypt("text").is_ok());
}

#[test]
fn test_missing_default_key_alias() {
    let service = service_with(CryptoSubsystemConfig::new().with_default_algorithm("AES"));

    assert!(matches!(
        service.encrypt("text"),
        Err(CipherError::MissingRequiredDefault { parameter: CryptoParameter::KeyAlias })
    ));
}

#[test]
fn test_unknown_alias_at_encrypt_and_decrypt() {
    let service = service();

    assert!(matches!(
        service.encrypt_dsl().key_alias("ghost").encrypt("x"),
        Err(CipherError::KeyNotFound { .. })
    ));
    // well-formed template naming a key the keystore does not have
    assert!(matches!(
        service.decrypt("{v2c}{AES/CBC/PKCS5Padding}{ghost}{AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=}"),
        Err(CipherError::KeyNotFound { .. })
    ));
}

#[test]
fn test_meta_info_query() {
    let service = service();
    let template = service.encrypt("secret").unwrap();

    let meta = service.get_encrypted_meta_info(&template).unwrap();
    assert_eq!(meta.algorithm(), "AES/CBC/PKCS5Padding");
    assert_eq!(meta.key_alias(), "K1");
    assert!(service.get_encrypted_meta_info("not an encrypted value").is_none());
}

#[test]
fn test_unrecognized_value() {
    for text in ["not an encrypted value", "", "   "] {
        assert!(matches!(
            service().decrypt(text),
            Err(CipherError::UnrecognizedFormat)
        ));
    }
}

#[test]
fn test_default_base64_output_decrypts_with_defaults() {
    let service = service();
    let base64 = service.encrypt_dsl().encrypt("secret").unwrap().as_base64();

    assert!(service.get_encrypted_meta_info(&base64).is_none());
    assert_eq!(service.decrypt(&base64).unwrap().as_string().unwrap(), "secret");
}

#[test]
fn test_dsl_decrypts_base64_payload() {
    let service = service();
    let encrypted = service.encrypt_dsl().encrypt("via base64").unwrap();

    let decrypted = service.decrypt_dsl().decrypt(&encrypted.as_base64()).unwrap();
    assert_eq!(decrypted.as_string().unwrap(), "via base64");

    assert!(matches!(
        service.decrypt_dsl().decrypt("%%% not base64 %%%"),
        Err(CipherError::CryptoFailure(_))
    ));
}

#[test]
fn test_unknown_provider_name() {
    let service = service();

    assert!(service.encrypt_dsl().provider("v2c").encrypt("x").is_ok());
    assert!(matches!(
        service.encrypt_dsl().provider("nope").encrypt("x"),
        Err(CipherError::IllegalCryptoParameters(_))
    ));
}

#[test]
fn test_unknown_algorithm() {
    assert!(matches!(
        service().encrypt_dsl().algorithm("DES").encrypt("x"),
        Err(CipherError::IllegalCryptoParameters(_))
    ));
}

#[test]
fn test_deprecated_key_still_works() {
    let service = service();
    let template = service
        .encrypt_dsl()
        .key_alias("legacy")
        .encrypt("old data")
        .unwrap()
        .as_template()
        .unwrap();

    assert_eq!(service.decrypt(&template).unwrap().as_string().unwrap(), "old data");
}

#[test]
fn test_large_symmetric_input() {
    let service = service();
    let plaintext: Vec<u8> = (0..1_000_000u32).map(|i| (i % 253) as u8).collect();

    for algorithm in ["AES/CBC/PKCS5Padding", "AES/GCM/NoPadding", "AES"] {
        let encrypted = service
            .encrypt_dsl()
            .algorithm(algorithm)
            .encrypt_bytes(plaintext.clone())
            .unwrap();
        let decrypted = service.decrypt(&encrypted.as_template().unwrap()).unwrap();
        assert_eq!(decrypted.as_bytes(), plaintext.as_slice(), "{algorithm}");
    }
}

#[test]
fn test_rsa_through_keystore_image() {
    let private = rsa::RsaPrivateKey::new(&mut rsa::rand_core::OsRng, 1024).unwrap();
    let image = KeystoreImageBuilder::new()
        .with_iterations(8)
        .with_protected_entry("rsa", KeyMaterial::rsa_private(private), "key-pass")
        .seal(&Password::new("store-pass"))
        .unwrap();
    let source = InMemoryKeystoreSource::new().with_image("mem://rsa", image);
    let keystores = KeystoreSubsystemConfig::new().with_keystore(KeystoreConfig::Local(
        LocalKeystoreConfig::new("rsa-store", "mem://rsa", "CKS", "store-pass")
            .with_key(keycrypt_key::KeyConfig::new("rsa").with_password("key-pass")),
    ));
    let repository = KeyStoreRepository::new(&keystores, &source).unwrap();
    let config = CryptoSubsystemConfig::new()
        .with_default_algorithm("RSA")
        .with_default_key_alias("rsa")
        .with_keystore_name("rsa-store");
    let provider: Arc<dyn CryptoProvider> =
        Arc::new(V2CryptoProvider::from_repository(&repository, config).unwrap());
    let service = CryptoService::new(Arc::clone(&provider), vec![provider]);

    let plaintext = "multi-block ".repeat(100);
    let template = service.encrypt(&plaintext).unwrap();

    assert_eq!(service.providers().len(), 1);
    assert!(template.starts_with("{v2c}{RSA}{rsa}{"));
    assert_eq!(service.decrypt(&template).unwrap().as_string().unwrap(), plaintext);
}

#[test]
fn test_provider_from_repository_errors() {
    let empty = KeyStoreRepository::from_keystores(Vec::new(), None).unwrap();
    assert!(matches!(
        V2CryptoProvider::from_repository(&empty, CryptoSubsystemConfig::new()),
        Err(CipherError::Key(_))
    ));

    let repository = KeyStoreRepository::from_keystores(vec![keystore()], None).unwrap();
    assert!(
        V2CryptoProvider::from_repository(&repository, CryptoSubsystemConfig::new()).is_ok()
    );
    assert!(matches!(
        V2CryptoProvider::from_repository(
            &repository,
            CryptoSubsystemConfig::new().with_keystore_name("elsewhere"),
        ),
        Err(CipherError::Key(_))
    ));
}

#[derive(Debug)]
struct LegacyProvider;

impl CryptoProvider for LegacyProvider {
    fn name(&self) -> &str {
        "legacy"
    }

    fn encrypt(&self, request: &keycrypt_cipher::EncryptionRequest) -> Result<EncryptResult> {
        let data = keycrypt_cipher::EncryptedData::new(None, request.plaintext().to_vec());
        Ok(EncryptResult::new(data, "PLAIN", None, "legacy"))
    }

    fn decrypt(&self, request: &keycrypt_cipher::DecryptionRequest) -> Result<DecryptResult> {
        let text = std::str::from_utf8(request.ciphertext()).unwrap_or_default();
        let body = text.strip_prefix("legacy:").unwrap_or(text);
        Ok(DecryptResult::new(body.as_bytes().to_vec().into()))
    }

    fn is_known_encrypted_format(&self, text: &str) -> bool {
        text.starts_with("legacy:")
    }

    fn encrypted_meta_info(&self, text: &str) -> Option<EncryptionMetaInfo> {
        self.is_known_encrypted_format(text)
            .then(|| EncryptionMetaInfo::new("PLAIN", "none"))
    }
}

#[test]
fn test_dispatch_by_recognition_in_registration_order() {
    let v2: Arc<dyn CryptoProvider> = Arc::new(V2CryptoProvider::new(
        keystore(),
        CryptoSubsystemConfig::new()
            .with_default_algorithm("AES/CBC/PKCS5Padding")
            .with_default_key_alias("K1"),
    ));
    let legacy: Arc<dyn CryptoProvider> = Arc::new(LegacyProvider);
    let service = CryptoService::new(Arc::clone(&v2), vec![legacy]);

    assert_eq!(service.providers().len(), 2);
    assert_eq!(service.providers()[0].name(), "legacy");
    assert_eq!(service.default_provider().name(), "v2c");

    assert_eq!(service.decrypt("legacy:hello").unwrap().as_string().unwrap(), "hello");
    assert_eq!(service.get_encrypted_meta_info("legacy:x").unwrap().algorithm(), "PLAIN");

    let template = service.encrypt("via v2").unwrap();
    assert_eq!(service.decrypt(&template).unwrap().as_string().unwrap(), "via v2");

    let legacy_result = service.encrypt_dsl().provider("legacy").encrypt("raw").unwrap();
    assert_eq!(legacy_result.as_bytes(), b"raw");
}

#[test]
fn test_service_is_shareable_across_threads() {
    let service = Arc::new(service());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let service = Arc::clone(&service);
            std::thread::spawn(move || {
                let text = format!("thread {i}");
                let template = service.encrypt(&text).unwrap();
                service.decrypt(&template).unwrap().as_string().unwrap() == text
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_round_trip(
        plaintext in proptest::collection::vec(any::<u8>(), 0..512),
        algorithm in prop::sample::select(vec![
            "AES",
            "AES/ECB/PKCS5Padding",
            "AES/CBC/PKCS5Padding",
            "AES/CBC/PKCS7Padding",
            "AES/GCM/NoPadding",
            "ChaCha20-Poly1305",
        ]),
    ) {
        let service = service();
        let template = service
            .encrypt_dsl()
            .algorithm(algorithm)
            .encrypt_bytes(plaintext.clone())
            .unwrap()
            .as_template()
            .unwrap();

        let decrypted = service.decrypt(&template).unwrap();
        prop_assert_eq!(decrypted.as_bytes(), plaintext.as_slice());
    }
}
