//! Which parameters a request defines explicitly

use crate::CryptoRequest;
use std::collections::BTreeSet;
use std::fmt;

/// Request parameter that can be explicit or come from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CryptoParameter {
    /// Cipher transform name
    Algorithm,
    /// Key material supplied directly
    Key,
    /// Alias of a keystore key
    KeyAlias,
}

impl fmt::Display for CryptoParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Algorithm => "algorithm",
            Self::Key => "key",
            Self::KeyAlias => "key alias",
        };
        f.write_str(name)
    }
}

/// Parameters the caller set on `request`
///
/// Only reports what was explicitly supplied; configured defaults and
/// template contents never show up here.
pub fn what_parameter_defined<R: CryptoRequest + ?Sized>(request: &R) -> BTreeSet<CryptoParameter> {
    let parameters = request.parameters();
    let mut defined = BTreeSet::new();
    if parameters.algorithm().is_some() {
        defined.insert(CryptoParameter::Algorithm);
    }
    if parameters.key().is_some() {
        defined.insert(CryptoParameter::Key);
    }
    if parameters.key_alias().is_some() {
        defined.insert(CryptoParameter::KeyAlias);
    }
    defined
}
