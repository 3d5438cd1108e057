//! Keystore abstraction

use crate::{AliasedKey, KeyKind, KeyMaterial};
use std::fmt;
use std::sync::Arc;

/// Named, immutable collection of keys addressable by alias
///
/// Implementations are built once and never mutated afterwards, so shared
/// references can be read from any number of threads without locking.
pub trait KeyStore: Send + Sync + fmt::Debug {
    /// Unique identity of this keystore within a repository
    fn identity(&self) -> &str;

    /// Whether the whole keystore is marked deprecated
    fn is_deprecated(&self) -> bool;

    /// Resolve an alias; `None` when the alias is unknown
    fn aliased_key(&self, alias: &str) -> Option<AliasedKey>;

    /// All aliases in this keystore, sorted
    fn aliases(&self) -> Vec<String>;

    /// Resolve an alias to key material of the requested kind
    ///
    /// Returns `None` when the alias is unknown or the key has a different kind.
    fn key_by_alias(&self, alias: &str, kind: KeyKind) -> Option<Arc<KeyMaterial>> {
        self.aliased_key(alias)
            .filter(|aliased| aliased.key().kind() == kind)
            .map(|aliased| Arc::clone(aliased.key()))
    }
}
