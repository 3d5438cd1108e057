//! Zeroizing password type used by keystore configuration

use serde::Deserialize;
use std::fmt;
use zeroize::Zeroizing;

/// Secret password string
///
/// The backing buffer is wiped on drop and `Debug` never prints the value.
/// Configuration loaders hand passwords over as plain strings, so the type
/// deserializes from a string.
#[derive(Clone, Deserialize)]
#[serde(from = "String")]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Wrap a password value
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// Borrow the password text
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Borrow the password bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// An empty password is treated as "no password" everywhere in keycrypt
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Filter out empty passwords
    #[must_use]
    pub fn non_empty(password: Option<&Password>) -> Option<&Password> {
        password.filter(|p| !p.is_empty())
    }
}

impl Default for Password {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl From<String> for Password {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Password {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(REDACTED)")
    }
}
