//! Escape handling for Sigma patterns
//!
//! Two translations live here:
//! - Sigma value wildcards (`*`, `?`) into regular expression syntax.
//! - Condition identifier patterns (`selection_*`) into globset syntax where
//!   only `*` is special.

use std::borrow::Cow;

const SIGMA_WILDCARD: char = '*';
const SIGMA_SINGLE: char = '?';

/// Characters that globset treats specially besides `*`
const GLOB_SPECIAL: &[char] = &['?', '[', ']', '{', '}', '\\'];

/// Translate a Sigma value into a regular expression fragment.
///
/// Every character is escaped except the wildcards: `*` becomes `.*` and `?`
/// becomes `.`.
pub fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut buf = [0u8; 4];
    for ch in pattern.chars() {
        match ch {
            SIGMA_WILDCARD => out.push_str(".*"),
            SIGMA_SINGLE => out.push('.'),
            _ => out.push_str(&regex::escape(ch.encode_utf8(&mut buf))),
        }
    }
    out
}

/// Escape an identifier pattern for globset so that only `*` is a wildcard
/// (zero-copy when no escaping is needed)
pub fn escape_identifier_glob(pattern: &str) -> Cow<'_, str> {
    if !pattern.contains(GLOB_SPECIAL) {
        return Cow::Borrowed(pattern);
    }

    let mut out = String::with_capacity(pattern.len() * 2);
    for ch in pattern.chars() {
        if GLOB_SPECIAL.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    Cow::Owned(out)
}
