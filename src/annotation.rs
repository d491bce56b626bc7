//! Semantic annotation handling for MathML fragments.
//!
//! A formula's markup carries its original LaTeX source inside a standard
//! MathML annotation block:
//!
//! ```text
//! <math><semantics>
//!   ...presentation markup...
//!   <annotation encoding="LaTeX">x+1</annotation>
//! </semantics></math>
//! ```
//!
//! so the source notation can be recovered losslessly from the rendered form.
//! All functions here are parameterized by a [`CharacterSet`] and therefore
//! work identically on sanitized ("safe") markup, where the tag literals are
//! `«`/`»`/`¨` instead of `<`/`>`/`"`.

use crate::charset::CharacterSet;
use crate::escape::{decode_safe, encode_safe, escape_entities, unescape_entities};
use memchr::memmem;

/// Canonical encoding label identifying the LaTeX source notation. The
/// annotator and the bulk scanner must agree on this value.
pub const LATEX_ENCODING: &str = "LaTeX";

/// `{opener}{name}`, the prefix of an element's open tag.
fn open_prefix(cs: &CharacterSet, name: &str) -> String {
    format!("{}{}", cs.tag_opener, name)
}

/// `{opener}/{name}{closer}`, an element's end tag.
fn end_tag(cs: &CharacterSet, name: &str) -> String {
    format!("{}/{}{}", cs.tag_opener, name, cs.tag_closer)
}

/// `{opener}annotation encoding={quote}{encoding}{quote}`, the open-tag
/// prefix that identifies an annotation for one specific encoding.
fn annotation_marker(cs: &CharacterSet, encoding: &str) -> String {
    format!(
        "{}annotation encoding={}{}{}",
        cs.tag_opener, cs.quote, encoding, cs.quote
    )
}

/// Find the open tag of `name` in `haystack`, requiring a tag-name boundary
/// after the match so `math` does not match `maths`. Returns the byte offset
/// of the tag opener.
pub(crate) fn find_element_open(haystack: &str, name: &str, cs: &CharacterSet) -> Option<usize> {
    let pattern = open_prefix(cs, name);
    let mut from = 0;
    while let Some(i) = memmem::find(haystack[from..].as_bytes(), pattern.as_bytes()) {
        let at = from + i;
        let rest = &haystack[at + pattern.len()..];
        // Truncated input ending mid-tag is accepted; the scanner's leniency
        // policy owns that case.
        if rest.is_empty()
            || rest.starts_with(cs.tag_closer)
            || rest.starts_with('/')
            || rest.starts_with(|c: char| c.is_ascii_whitespace())
        {
            return Some(at);
        }
        from = at + pattern.len();
    }
    None
}

/// Encode a LaTeX source string for embedding as an annotation payload:
/// entity-escaped always, then safe-translated when the character set is the
/// safe variant.
pub fn encode_payload(source: &str, cs: &CharacterSet) -> String {
    let escaped = escape_entities(source);
    if cs.is_safe() {
        encode_safe(&escaped)
    } else {
        escaped.into_owned()
    }
}

/// Exact inverse of [`encode_payload`].
pub fn decode_payload(payload: &str, cs: &CharacterSet) -> String {
    if cs.is_safe() {
        unescape_entities(&decode_safe(payload))
    } else {
        unescape_entities(payload)
    }
}

/// Whether the markup already carries a semantics/annotation marker.
pub fn has_semantics(markup: &str, cs: &CharacterSet) -> bool {
    find_element_open(markup, "semantics", cs).is_some()
        || find_element_open(markup, "annotation", cs).is_some()
}

/// Insert or replace the annotation for `encoding` inside the outermost
/// `math` element of `markup`, with `source` as the (escaped) payload.
///
/// A `semantics` wrapper is created around the element's content when none
/// exists. An existing annotation for a *different* encoding is left in
/// place; only the annotation matching `encoding` is replaced. Content
/// outside the `math` element, and markup containing no `math` element at
/// all, pass through unchanged.
///
/// Idempotent: re-annotating with identical inputs reproduces the same
/// markup.
pub fn insert_annotation(
    markup: &str,
    source: &str,
    encoding: &str,
    cs: &CharacterSet,
) -> String {
    let Some(math_open) = find_element_open(markup, "math", cs) else {
        return markup.to_string();
    };
    let Some(rel) = markup[math_open..].find(cs.tag_closer) else {
        return markup.to_string();
    };
    let content_start = math_open + rel + cs.tag_closer.len();
    let math_end = end_tag(cs, "math");
    // Formula elements never nest, so the first close tag ends this element.
    let content_end = match markup[content_start..].find(&math_end) {
        Some(rel) => content_start + rel,
        None => return markup.to_string(),
    };

    let content = &markup[content_start..content_end];
    let element = format!(
        "{}{}{}{}",
        annotation_marker(cs, encoding),
        cs.tag_closer,
        encode_payload(source, cs),
        end_tag(cs, "annotation"),
    );

    let marker = annotation_marker(cs, encoding);
    let ann_end = end_tag(cs, "annotation");
    let sem_end = end_tag(cs, "semantics");

    let new_content = if let Some(at) = memmem::find(content.as_bytes(), marker.as_bytes()) {
        // Replace the existing annotation for this encoding.
        match memmem::find(content[at..].as_bytes(), ann_end.as_bytes()) {
            Some(close) => format!(
                "{}{}{}",
                &content[..at],
                element,
                &content[at + close + ann_end.len()..]
            ),
            None => format!("{}{}", &content[..at], element),
        }
    } else if let Some(close) = content.rfind(&sem_end) {
        // A semantics wrapper exists; slot our annotation in before its end
        // tag, leaving annotations for other encodings alone.
        format!("{}{}{}", &content[..close], element, &content[close..])
    } else {
        // No wrapper yet: wrap the whole content in semantics.
        format!(
            "{}semantics{}{}{}{}",
            cs.tag_opener, cs.tag_closer, content, element, sem_end
        )
    };

    format!(
        "{}{}{}",
        &markup[..content_start],
        new_content,
        &markup[content_end..]
    )
}

/// Extract and decode the payload of the annotation labeled `encoding`, if
/// the markup carries one.
pub fn annotation_payload(markup: &str, encoding: &str, cs: &CharacterSet) -> Option<String> {
    let marker = annotation_marker(cs, encoding);
    let at = memmem::find(markup.as_bytes(), marker.as_bytes())?;
    let after = at + marker.len();
    let rel = markup[after..].find(cs.tag_closer)?;
    let payload_start = after + rel + cs.tag_closer.len();
    let close = end_tag(cs, "annotation");
    let rel = memmem::find(markup[payload_start..].as_bytes(), close.as_bytes())?;
    Some(decode_payload(&markup[payload_start..payload_start + rel], cs))
}
