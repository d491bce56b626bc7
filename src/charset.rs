//! Character-set and delimiter configuration.
//!
//! Formula markup comes in two textual flavors depending on how the
//! surrounding content was produced: *raw* markup uses the ordinary XML
//! literals (`<`, `>`, `"`), while *safe* markup has been passed through a
//! sanitizer that replaces every XML-significant character with a
//! non-colliding stand-in (`«`, `»`, `¨`). Both flavors carry the same
//! structure, so the annotator and the bulk scanner are parameterized by a
//! [`CharacterSet`] naming the literals instead of hard-coding them.

use crate::error::{Error, Result};

/// Literals used to recognize markup tags and attribute values.
///
/// Immutable; callers pick the `const` variant matching how the content was
/// produced.
///
/// # Examples
///
/// ```
/// use mathspan::CharacterSet;
///
/// assert_eq!(CharacterSet::RAW.tag_opener, "<");
/// assert_eq!(CharacterSet::SAFE.tag_opener, "«");
/// assert!(CharacterSet::SAFE.is_safe());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterSet {
    /// String that opens a markup tag (`<` or `«`).
    pub tag_opener: &'static str,
    /// String that closes a markup tag (`>` or `»`).
    pub tag_closer: &'static str,
    /// String delimiting attribute values (`"` or `¨`).
    pub quote: &'static str,
    safe: bool,
}

impl CharacterSet {
    /// Ordinary XML literals, for markup that has not been sanitized.
    pub const RAW: CharacterSet = CharacterSet {
        tag_opener: "<",
        tag_closer: ">",
        quote: "\"",
        safe: false,
    };

    /// Sanitized ("safe") literals, for markup where XML-significant
    /// characters have been replaced with stand-ins. Annotation payloads in
    /// this flavor additionally carry the safe character transform (see
    /// [`crate::escape`]).
    pub const SAFE: CharacterSet = CharacterSet {
        tag_opener: "\u{ab}", // «
        tag_closer: "\u{bb}", // »
        quote: "\u{a8}",      // ¨
        safe: true,
    };

    /// Whether payload decoding must reverse the safe character transform.
    #[inline]
    pub fn is_safe(&self) -> bool {
        self.safe
    }
}

/// A symmetric pair of delimiter strings denoting a formula in source form.
///
/// The default pair is `$$`/`$$`. Open and close must have equal byte length
/// and be non-empty; this is validated at construction so the positional
/// extractor's offset arithmetic can rely on it.
///
/// # Examples
///
/// ```
/// use mathspan::DelimiterPair;
///
/// let dollars = DelimiterPair::default();
/// assert_eq!(dollars.wrap("x+1"), "$$x+1$$");
///
/// assert!(DelimiterPair::new("[[", "]").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterPair {
    open: String,
    close: String,
}

impl DelimiterPair {
    /// Create a delimiter pair, validating the equal-length contract.
    pub fn new(open: &str, close: &str) -> Result<Self> {
        if open.is_empty() || open.len() != close.len() {
            return Err(Error::InvalidDelimiters);
        }
        Ok(Self {
            open: open.to_string(),
            close: close.to_string(),
        })
    }

    /// The opening delimiter string.
    #[inline]
    pub fn open(&self) -> &str {
        &self.open
    }

    /// The closing delimiter string.
    #[inline]
    pub fn close(&self) -> &str {
        &self.close
    }

    /// Byte length of either delimiter (they are equal by construction).
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.open.len()
    }

    /// Wrap a formula text in this delimiter pair.
    pub fn wrap(&self, text: &str) -> String {
        let mut out = String::with_capacity(self.open.len() + text.len() + self.close.len());
        out.push_str(&self.open);
        out.push_str(text);
        out.push_str(&self.close);
        out
    }
}

impl Default for DelimiterPair {
    fn default() -> Self {
        Self {
            open: "$$".to_string(),
            close: "$$".to_string(),
        }
    }
}
