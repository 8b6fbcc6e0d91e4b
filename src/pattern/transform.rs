//! Value transformations applied before regex construction

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use once_cell::sync::Lazy;
use regex::Regex;

/// Replacement characters for the `windash` modifier:
/// `-`, `/`, en dash, em dash and horizontal bar.
pub const WINDASH_CHARS: [char; 5] = ['-', '/', '\u{2013}', '\u{2014}', '\u{2015}'];

/// A dash-like character with a non-word character (or start) before it and
/// a word character after it, i.e. the prefix of a command-line switch.
static WINDASH_SWITCH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\B[-/\x{2013}\x{2014}\x{2015}]\b").expect("windash switch regex is valid")
});

/// Leading characters of each shifted encoding that depend on the padding bytes
const OFFSET_START: [usize; 3] = [0, 2, 3];

/// Trailing characters to drop, indexed by `(len + shift) % 3`
const OFFSET_END_TRIM: [usize; 3] = [0, 3, 2];

/// Standard base64 encoding with padding
pub fn base64_encode(value: &str) -> String {
    BASE64_STANDARD.encode(value.as_bytes())
}

/// The three encodings under which `value` can appear inside a larger base64
/// blob, one per byte alignment.
///
/// The value is shifted by 0, 1 and 2 padding bytes and encoded; characters
/// influenced by the padding or by whatever follows the value are trimmed.
pub fn base64_offset_variants(value: &[u8]) -> [String; 3] {
    let mut variants: [String; 3] = Default::default();
    for (shift, variant) in variants.iter_mut().enumerate() {
        let mut shifted = vec![b' '; shift];
        shifted.extend_from_slice(value);
        let encoded = BASE64_STANDARD.encode(&shifted);

        let start = OFFSET_START[shift];
        let end = encoded
            .len()
            .saturating_sub(OFFSET_END_TRIM[(value.len() + shift) % 3]);
        if start < end {
            *variant = encoded[start..end].to_string();
        }
    }
    variants
}

/// Variants of `value` with its first command-line switch dash replaced by
/// each of [`WINDASH_CHARS`], or `None` if there is no such dash.
pub fn windash_variants(value: &str) -> Option<[String; 5]> {
    let found = WINDASH_SWITCH.find(value)?;
    let (head, tail) = (&value[..found.start()], &value[found.end()..]);
    Some(WINDASH_CHARS.map(|dash| {
        let mut variant = String::with_capacity(value.len() + 2);
        variant.push_str(head);
        variant.push(dash);
        variant.push_str(tail);
        variant
    }))
}
