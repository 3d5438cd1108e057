//! Keystore loaded from a sealed image

use super::image::{ImageEntry, ImageError, open_image};
use super::{CKS_KEYSTORE_TYPE, ProtectionState};
use crate::{
    AliasedKey, KeyConfig, KeyError, KeyMaterial, KeyStore, KeystoreSource, LocalKeystoreConfig,
    PasswordMismatch, Result,
};
use keycrypt_common::{LoggingTransformer, Password, fingerprint};
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// Keystore backed by a sealed `CKS` image
///
/// The alias map is built once in [`LocalKeyStore::load`]. Every key password
/// is checked at that point, so a loaded store never holds a key that cannot
/// be used.
#[derive(Debug)]
pub struct LocalKeyStore {
    identity: String,
    location: String,
    deprecated: bool,
    keys: HashMap<String, AliasedKey>,
}

impl LocalKeyStore {
    /// Read, open and index the keystore image named by `config`
    ///
    /// # Errors
    ///
    /// - `InvalidKeystoreConfiguration` for an unsupported type, an unreadable
    ///   location, a wrong store password, a corrupt image or undecodable key material
    /// - `BadKeyPassword` when a configured key password disagrees with the key
    pub fn load(config: &LocalKeystoreConfig, source: &dyn KeystoreSource) -> Result<Self> {
        let identity = config.identity.as_str();

        if !config.keystore_type.eq_ignore_ascii_case(CKS_KEYSTORE_TYPE) {
            return Err(KeyError::invalid_keystore(
                identity,
                format!("unsupported keystore type '{}'", config.keystore_type),
            ));
        }

        let bytes = source.read(&config.location).ok_or_else(|| {
            KeyError::invalid_keystore(
                identity,
                format!("location '{}' cannot be read", config.location),
            )
        })?;

        let entries = open_image(&bytes, &config.password)
            .map_err(|e| KeyError::invalid_keystore(identity, e.to_string()))?;

        let key_configs: HashMap<&str, &KeyConfig> = config
            .keys
            .iter()
            .map(|key| (key.alias.as_str(), key))
            .collect();

        let mut keys = HashMap::with_capacity(entries.len());
        for entry in &entries {
            let key_config = key_configs.get(entry.alias()).copied();
            let material = unlock(identity, entry, key_config)?;
            let deprecated = key_config
                .and_then(|key| key.deprecated)
                .unwrap_or(config.deprecated);
            keys.insert(
                entry.alias().to_string(),
                AliasedKey::new(entry.alias(), Arc::new(material), deprecated),
            );
        }

        for alias in key_configs.keys().filter(|alias| !keys.contains_key(**alias)) {
            debug!("Keystore {identity}: configured key '{alias}' is not in the image");
        }

        LoggingTransformer::log_keystore_loaded(identity, keys.len(), config.deprecated);

        Ok(Self {
            identity: config.identity.clone(),
            location: config.location.clone(),
            deprecated: config.deprecated,
            keys,
        })
    }

    /// Location the image was read from
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }
}

fn unlock(identity: &str, entry: &ImageEntry, config: Option<&KeyConfig>) -> Result<KeyMaterial> {
    let password = Password::non_empty(config.and_then(|key| key.password.as_ref()));
    let state = ProtectionState::classify(entry.is_protected(), password);
    if let Some(mismatch) = state.mismatch() {
        return Err(KeyError::bad_key_password(entry.alias(), mismatch));
    }

    let encoded = entry.material(password).map_err(|e| match e {
        ImageError::KeyPassword(alias) => {
            KeyError::bad_key_password(alias, PasswordMismatch::WrongPassword)
        }
        other => KeyError::invalid_keystore(identity, other.to_string()),
    })?;

    let material = KeyMaterial::from_encoded(entry.kind(), &encoded).map_err(|e| {
        KeyError::invalid_keystore(identity, format!("key '{}': {e}", entry.alias()))
    })?;
    debug!(
        "Keystore {identity}: key '{}' ({}, {})",
        entry.alias(),
        entry.kind(),
        fingerprint(&encoded)
    );
    Ok(material)
}

impl KeyStore for LocalKeyStore {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    fn aliased_key(&self, alias: &str) -> Option<AliasedKey> {
        self.keys.get(alias).cloned()
    }

    fn aliases(&self) -> Vec<String> {
        let mut aliases: Vec<String> = self.keys.keys().cloned().collect();
        aliases.sort();
        aliases
    }
}
