//! Self-describing ciphertext template
//!
//! `{<tag>}{<algorithm>}{<keyAlias>}{<base64(IV ‖ ciphertext)>}`

use crate::{CipherError, EncryptionMetaInfo, Result};

const SEGMENT_COUNT: usize = 4;

/// Decomposed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateParts<'a> {
    /// Transform name as embedded
    pub algorithm: &'a str,
    /// Key alias as embedded
    pub key_alias: &'a str,
    /// Base64 of `IV ‖ ciphertext`
    pub payload: &'a str,
}

impl TemplateParts<'_> {
    /// Algorithm and alias without the payload
    #[must_use]
    pub fn meta_info(&self) -> EncryptionMetaInfo {
        EncryptionMetaInfo::new(self.algorithm, self.key_alias)
    }
}

/// Render a template
///
/// # Errors
///
/// Returns `IllegalCryptoParameters` when a segment is empty or contains a
/// brace, since `parse` would not accept the result.
pub fn encode(
    tag: &str,
    algorithm: &str,
    key_alias: &str,
    payload_base64: &str,
) -> Result<String> {
    for (name, value) in [
        ("tag", tag),
        ("algorithm", algorithm),
        ("key alias", key_alias),
        ("payload", payload_base64),
    ] {
        if value.is_empty() || value.contains(['{', '}']) {
            return Err(CipherError::illegal(format!(
                "template {name} '{value}' must be non-empty and free of braces"
            )));
        }
    }
    Ok(format!("{{{tag}}}{{{algorithm}}}{{{key_alias}}}{{{payload_base64}}}"))
}

/// Split `text` into its segments when it is a template carrying `tag`
///
/// Exactly four non-empty `{...}` segments, nothing between or around them,
/// no nested braces, and a first segment equal to `tag`. Anything else is not
/// a template.
#[must_use]
pub fn parse<'a>(tag: &str, text: &'a str) -> Option<TemplateParts<'a>> {
    let segments = segments(text)?;
    match segments[..] {
        [found, algorithm, key_alias, payload] if found == tag => Some(TemplateParts {
            algorithm,
            key_alias,
            payload,
        }),
        _ => None,
    }
}

fn segments(text: &str) -> Option<Vec<&str>> {
    let mut segments = Vec::with_capacity(SEGMENT_COUNT);
    let mut rest = text;
    while !rest.is_empty() {
        let inner = rest.strip_prefix('{')?;
        let end = inner.find(['{', '}'])?;
        if inner.as_bytes()[end] != b'}' || end == 0 {
            return None;
        }
        segments.push(&inner[..end]);
        if segments.len() > SEGMENT_COUNT {
            return None;
        }
        rest = &inner[end + 1..];
    }
    (segments.len() == SEGMENT_COUNT).then_some(segments)
}
