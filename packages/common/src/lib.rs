//! Shared infrastructure for the keycrypt crates
//!
//! This crate provides functionality used across the keycrypt workspace:
//! - [`Password`], a zeroizing secret string for keystore and key passwords
//! - [`LoggingTransformer`], `env_logger` bootstrap and log-safe helpers
//! - [`fingerprint`], a short SHA-256 digest for referring to secrets in logs

#![forbid(unsafe_code)]

pub mod logging;
pub mod password;

pub use logging::{LoggingTransformer, fingerprint};
pub use password::Password;
