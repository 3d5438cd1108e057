//! Key password protection states

use crate::PasswordMismatch;
use keycrypt_common::Password;

/// Combination of a key's protection and its configured password
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectionState {
    /// Protected key with a configured password; the password still has to open it
    ProtectedWithPassword,
    /// Protected key without a configured password
    ProtectedWithoutPassword,
    /// Unprotected key with a configured password
    UnprotectedWithPassword,
    /// Unprotected key without a configured password
    Unprotected,
}

impl ProtectionState {
    /// Classify a key; empty passwords count as no password
    #[must_use]
    pub fn classify(protected: bool, password: Option<&Password>) -> Self {
        match (protected, Password::non_empty(password).is_some()) {
            (true, true) => Self::ProtectedWithPassword,
            (true, false) => Self::ProtectedWithoutPassword,
            (false, true) => Self::UnprotectedWithPassword,
            (false, false) => Self::Unprotected,
        }
    }

    /// Mismatch detectable without trying the password
    ///
    /// A wrong password for a protected key only shows up when unsealing it.
    #[must_use]
    pub fn mismatch(self) -> Option<PasswordMismatch> {
        match self {
            Self::ProtectedWithoutPassword => Some(PasswordMismatch::PasswordMissing),
            Self::UnprotectedWithPassword => Some(PasswordMismatch::KeyNotProtected),
            Self::ProtectedWithPassword | Self::Unprotected => None,
        }
    }
}
