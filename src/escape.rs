//! Character escaping for annotation payloads.
//!
//! Two transforms are involved when a LaTeX source string travels inside an
//! annotation element:
//!
//! 1. **XML entity escaping** (always): `&`, `<`, `>`, `"`, `'` become the
//!    standard entities so the payload is valid element text. Delegated to
//!    `quick_xml::escape`, which on the decode side also resolves numeric
//!    entities the conversion service may emit.
//! 2. **Safe character translation** (only for [`CharacterSet::SAFE`]
//!    content): every remaining XML-significant character is replaced with a
//!    stand-in that survives sanitizers, using the same five-character table
//!    the sanitizer itself applies.
//!
//! [`CharacterSet::SAFE`]: crate::charset::CharacterSet::SAFE

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use std::borrow::Cow;

// Static initialization: automata are built only once, thread-safe
static SAFE_ENCODER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["<", ">", "\"", "&", "'"])
        .expect("Failed to build safe-XML encoder")
});

static SAFE_DECODER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["\u{ab}", "\u{bb}", "\u{a8}", "\u{a7}", "`"])
        .expect("Failed to build safe-XML decoder")
});

/// Apply the safe character transform: `<`, `>`, `"`, `&`, `'` become
/// `«`, `»`, `¨`, `§`, `` ` ``.
///
/// # Examples
///
/// ```
/// use mathspan::escape::encode_safe;
/// assert_eq!(encode_safe("a<b & c"), "a«b § c");
/// ```
#[inline]
pub fn encode_safe(s: &str) -> String {
    SAFE_ENCODER.replace_all(s, &["\u{ab}", "\u{bb}", "\u{a8}", "\u{a7}", "`"])
}

/// Reverse the safe character transform. Exact inverse of [`encode_safe`]
/// for any input that does not itself contain the stand-in characters.
///
/// # Examples
///
/// ```
/// use mathspan::escape::decode_safe;
/// assert_eq!(decode_safe("a«b § c"), "a<b & c");
/// assert_eq!(decode_safe("x+1"), "x+1"); // unchanged
/// ```
#[inline]
pub fn decode_safe(s: &str) -> String {
    SAFE_DECODER.replace_all(s, &["<", ">", "\"", "&", "'"])
}

/// Escape XML-significant characters as entities.
#[inline]
pub fn escape_entities(s: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(s)
}

/// Resolve XML entities, including numeric character references.
///
/// Malformed entities leave the input unchanged rather than failing; a
/// payload that was never escaped still decodes to itself.
#[inline]
pub fn unescape_entities(s: &str) -> String {
    match quick_xml::escape::unescape(s) {
        Ok(text) => text.into_owned(),
        Err(_) => s.to_string(),
    }
}
