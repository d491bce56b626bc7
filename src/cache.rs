//! Bidirectional lookup cache pairing LaTeX source text with its MathML
//! markup.
//!
//! Every successful conversion and every annotated fragment discovered by the
//! bulk scanner feeds this cache so repeated conversions of the same formula
//! never reach the remote service twice. The two index directions are kept in
//! sync at the single mutation point, [`AnnotationCache::populate`].
//!
//! The cache is unbounded and session-scoped; access is sequential. Callers
//! exposing it to concurrent users must wrap it in their own mutual
//! exclusion so both index directions update atomically.

use std::collections::HashMap;

/// In-memory source↔markup cache.
///
/// # Examples
///
/// ```
/// use mathspan::AnnotationCache;
///
/// let mut cache = AnnotationCache::new();
/// cache.populate("x+1", "<math><mi>x</mi><mo>+</mo><mn>1</mn></math>");
///
/// assert_eq!(
///     cache.lookup_by_source("x+1"),
///     Some("<math><mi>x</mi><mo>+</mo><mn>1</mn></math>"),
/// );
/// assert_eq!(
///     cache.lookup_by_markup("<math><mi>x</mi><mo>+</mo><mn>1</mn></math>"),
///     Some("x+1"),
/// );
/// ```
#[derive(Debug, Default)]
pub struct AnnotationCache {
    by_source: HashMap<String, String>,
    by_markup: HashMap<String, String>,
}

impl AnnotationCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite both index directions. Idempotent for identical
    /// inputs.
    pub fn populate(&mut self, source: &str, markup: &str) {
        self.by_source.insert(source.to_string(), markup.to_string());
        self.by_markup.insert(markup.to_string(), source.to_string());
    }

    /// Markup previously recorded for this source text, if any.
    pub fn lookup_by_source(&self, source: &str) -> Option<&str> {
        self.by_source.get(source).map(String::as_str)
    }

    /// Source text previously recorded for this markup, if any.
    pub fn lookup_by_markup(&self, markup: &str) -> Option<&str> {
        self.by_markup.get(markup).map(String::as_str)
    }

    /// Number of distinct source texts cached.
    pub fn len(&self) -> usize {
        self.by_source.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.by_source.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_populate_and_lookup_both_directions() {
        let mut cache = AnnotationCache::new();
        cache.populate("x+1", "<math>m1</math>");

        assert_eq!(cache.lookup_by_source("x+1"), Some("<math>m1</math>"));
        assert_eq!(cache.lookup_by_markup("<math>m1</math>"), Some("x+1"));
        assert_eq!(cache.lookup_by_source("y"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_populate_is_idempotent() {
        let mut cache = AnnotationCache::new();
        cache.populate("x", "<math>x</math>");
        cache.populate("x", "<math>x</math>");

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lookup_by_source("x"), Some("<math>x</math>"));
    }

    #[test]
    fn test_populate_overwrites_source_index() {
        let mut cache = AnnotationCache::new();
        cache.populate("x", "<math>old</math>");
        cache.populate("x", "<math>new</math>");

        assert_eq!(cache.lookup_by_source("x"), Some("<math>new</math>"));
        assert_eq!(cache.lookup_by_markup("<math>new</math>"), Some("x"));
    }
}
