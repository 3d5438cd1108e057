//! Logging bootstrap and log-safe helpers
//!
//! Library code logs through the `log` facade. Applications call
//! [`LoggingTransformer::init`] once; tests call [`LoggingTransformer::init_test`].
//! Configure levels with `RUST_LOG`, e.g. `RUST_LOG=keycrypt_key=debug`.

use log::{debug, info, warn};
use sha2::{Digest, Sha256};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// `env_logger` integration and structured log helpers
pub struct LoggingTransformer;

impl LoggingTransformer {
    /// Initialize logging (call once at application startup)
    pub fn init() {
        INIT_LOGGER.call_once(|| {
            env_logger::Builder::from_default_env()
                .format_timestamp_micros()
                .init();

            info!("keycrypt logging initialized");
        });
    }

    /// Initialize logging for test environments
    ///
    /// Safe to call from every test; repeated initialization is ignored.
    pub fn init_test() {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    }

    /// Log a successfully loaded keystore
    pub fn log_keystore_loaded(identity: &str, key_count: usize, deprecated: bool) {
        if deprecated {
            info!("Keystore loaded: {identity} ({key_count} keys, deprecated)");
        } else {
            info!("Keystore loaded: {identity} ({key_count} keys)");
        }
    }

    /// Log use of a deprecated key for a new encryption
    pub fn log_deprecated_key_use(alias: &str, algorithm: &str) {
        warn!("Deprecated key '{alias}' used to encrypt with {algorithm}");
    }

    /// Log a provider dispatch decision
    pub fn log_dispatch(operation: &str, provider: &str) {
        debug!("{operation}: dispatched to provider {provider}");
    }

    /// Log a failed cryptographic operation
    ///
    /// Only the error's message is logged; callers pass errors whose messages
    /// carry no key material or plaintext.
    pub fn log_crypto_failure(operation: &str, error: &dyn std::error::Error) {
        debug!("Cryptographic operation failed: {operation}: {error}");
    }
}

/// Short SHA-256 fingerprint for referring to secret material in logs
///
/// Returns `#` followed by the first 12 hex characters of the digest.
#[must_use]
pub fn fingerprint(data: &[u8]) -> String {
    let digest = hex::encode(Sha256::digest(data));
    format!("#{}", &digest[..12])
}
