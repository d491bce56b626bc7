//! Bulk markup-to-source scanner.
//!
//! Walks an arbitrary content string once, left to right, replacing every
//! `math` element that carries a LaTeX annotation with its delimited source
//! equivalent (`$$…$$`). Used over exported/saved content to normalize
//! rendered markup back into the notation a user can edit.

use crate::annotation::{self, LATEX_ENCODING};
use crate::cache::AnnotationCache;
use crate::charset::{CharacterSet, DelimiterPair};
use memchr::memmem;

/// Replace each annotated `math` element in `content` with its delimited
/// LaTeX source.
///
/// For every `math` open tag (in `charset`'s literals) the matching close
/// tag bounds the element's span; when no close tag exists the remainder of
/// the content is treated as the span — truncated input is processed, not
/// rejected. A span carrying a LaTeX annotation is replaced by `$$payload$$`
/// (decoded per `charset`) and the (payload, span) pair is recorded in
/// `cache`; a span without one is emitted unchanged. Text outside `math`
/// elements is copied verbatim. Nested `math` elements are not specially
/// handled: the first close tag terminates the span.
///
/// Idempotent: output contains no annotated markup, so a second pass is a
/// no-op.
pub fn replace_annotated_markup(
    content: &str,
    charset: &CharacterSet,
    cache: &mut AnnotationCache,
) -> String {
    let close_tag = format!("{}/math{}", charset.tag_opener, charset.tag_closer);
    let delimiters = DelimiterPair::default();
    let mut out = String::with_capacity(content.len());
    let mut pos = 0;

    while let Some(rel) = annotation::find_element_open(&content[pos..], "math", charset) {
        let span_start = pos + rel;
        out.push_str(&content[pos..span_start]);

        let span_end = match memmem::find(content[span_start..].as_bytes(), close_tag.as_bytes())
        {
            Some(at) => span_start + at + close_tag.len(),
            // Leniency policy: an unclosed element extends to the end of the
            // content.
            None => content.len(),
        };
        let span = &content[span_start..span_end];

        match annotation::annotation_payload(span, LATEX_ENCODING, charset) {
            Some(latex) => {
                cache.populate(&latex, span);
                out.push_str(&delimiters.wrap(&latex));
            }
            None => out.push_str(span),
        }
        pos = span_end;
    }
    out.push_str(&content[pos..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::insert_annotation;

    fn annotated(latex: &str) -> String {
        insert_annotation(
            &format!("<math><mi>{latex}</mi></math>"),
            latex,
            LATEX_ENCODING,
            &CharacterSet::RAW,
        )
    }

    #[test]
    fn test_replaces_annotated_element() {
        let mut cache = AnnotationCache::new();
        let content = format!("before {} after", annotated("x+1"));

        let result = replace_annotated_markup(&content, &CharacterSet::RAW, &mut cache);
        assert_eq!(result, "before $$x+1$$ after");
        assert_eq!(cache.lookup_by_source("x+1"), Some(annotated("x+1").as_str()));
    }

    #[test]
    fn test_multiple_elements_single_pass() {
        let mut cache = AnnotationCache::new();
        let content = format!("{}, then {}", annotated("a"), annotated("b"));

        let result = replace_annotated_markup(&content, &CharacterSet::RAW, &mut cache);
        assert_eq!(result, "$$a$$, then $$b$$");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_unannotated_element_unchanged() {
        let mut cache = AnnotationCache::new();
        let content = "text <math><mi>x</mi></math> more";

        let result = replace_annotated_markup(content, &CharacterSet::RAW, &mut cache);
        assert_eq!(result, content);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_truncated_element_processed() {
        let mut cache = AnnotationCache::new();
        // Open tag but no closing </math>: the rest of the content is the span.
        let content = "text <math><semantics><mi>x</mi>\
                       <annotation encoding=\"LaTeX\">x</annotation></semantics>";

        let result = replace_annotated_markup(content, &CharacterSet::RAW, &mut cache);
        assert_eq!(result, "text $$x$$");
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let mut cache = AnnotationCache::new();
        let content = format!("a {} b", annotated("x"));

        let once = replace_annotated_markup(&content, &CharacterSet::RAW, &mut cache);
        let twice = replace_annotated_markup(&once, &CharacterSet::RAW, &mut cache);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_safe_charset() {
        let mut cache = AnnotationCache::new();
        let markup = "\u{ab}math\u{bb}\u{ab}mi\u{bb}x\u{ab}/mi\u{bb}\u{ab}/math\u{bb}";
        let annotated = insert_annotation(markup, "a<b", LATEX_ENCODING, &CharacterSet::SAFE);
        let content = format!("pre {annotated} post");

        let result = replace_annotated_markup(&content, &CharacterSet::SAFE, &mut cache);
        assert_eq!(result, "pre $$a<b$$ post");
        assert_eq!(cache.lookup_by_source("a<b"), Some(annotated.as_str()));
    }

    #[test]
    fn test_no_math_content_verbatim() {
        let mut cache = AnnotationCache::new();
        let content = "plain <p>paragraph</p> text";
        assert_eq!(
            replace_annotated_markup(content, &CharacterSet::RAW, &mut cache),
            content
        );
    }
}
