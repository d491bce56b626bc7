//! Positional formula extraction from a fragmented text run.
//!
//! Rich-text content stores a paragraph's text as a sequence of sibling
//! fragments — runs of plain text possibly interrupted by non-text nodes —
//! with no single contiguous buffer. Given a caret position inside one
//! fragment, [`extract`] finds the nearest enclosing pair of formula
//! delimiters across the whole run and returns the exact formula substring
//! together with boundary-exact coordinates, so a host editor can hand the
//! text back to the conversion façade for re-editing and later splice the
//! result over precisely the right span.
//!
//! The run is modeled as an explicit ordered [`FragmentRun`] rather than a
//! live sibling-pointer chain: walks become index arithmetic, positions
//! compare by absolute offset across the run, and every forward walk
//! terminates at the end of the vector.

use crate::charset::DelimiterPair;
use memchr::memmem;

/// One sibling in a fragment run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// A text-bearing sibling.
    Text(String),
    /// A non-text sibling (image, line break, element, …). Zero-length for
    /// scanning purposes; skipped while walking forward.
    Opaque,
}

impl Fragment {
    /// Convenience constructor for a text fragment.
    pub fn text(s: impl Into<String>) -> Self {
        Fragment::Text(s.into())
    }

    /// Whether this sibling bears text.
    pub fn is_text(&self) -> bool {
        matches!(self, Fragment::Text(_))
    }

    fn as_text(&self) -> Option<&str> {
        match self {
            Fragment::Text(s) => Some(s.as_str()),
            Fragment::Opaque => None,
        }
    }
}

/// An ordered sequence of sibling fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentRun {
    fragments: Vec<Fragment>,
}

impl FragmentRun {
    /// Build a run from explicit fragments.
    pub fn new(fragments: Vec<Fragment>) -> Self {
        Self { fragments }
    }

    /// Build an all-text run, one fragment per string.
    pub fn from_texts<I, T>(texts: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            fragments: texts.into_iter().map(Fragment::text).collect(),
        }
    }

    /// The fragment at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Fragment> {
        self.fragments.get(index)
    }

    /// Number of fragments (text-bearing or not).
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether the run has no fragments.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    fn text_of(&self, index: usize) -> Option<&str> {
        self.fragments.get(index).and_then(Fragment::as_text)
    }
}

/// A precise character position: byte offset `offset` within fragment
/// `fragment` of a run.
///
/// Two cursors can denote the same character position — the end of one text
/// fragment and the start of the next — so ordering is defined against a
/// run, by absolute offset, not structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentCursor {
    /// Index of the fragment within the run.
    pub fragment: usize,
    /// Byte offset into that fragment's text.
    pub offset: usize,
}

impl FragmentCursor {
    /// Construct a cursor.
    pub fn new(fragment: usize, offset: usize) -> Self {
        Self { fragment, offset }
    }
}

/// One delimited formula found around a caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFormula {
    /// The formula text, delimiters excluded, concatenated across every
    /// fragment the formula spans.
    pub text: String,
    /// Position of the first byte of the open delimiter.
    pub start: FragmentCursor,
    /// Position just past the last byte of the close delimiter.
    pub end: FragmentCursor,
}

/// Absolute byte position of a cursor within its run: text length of every
/// preceding fragment (opaque ones are zero-length) plus the offset. Two
/// cursors on either side of a fragment boundary map to the same value,
/// which is what makes the enclosure comparisons boundary-exact.
fn absolute_offset(run: &FragmentRun, cursor: FragmentCursor) -> usize {
    let mut total = 0;
    for index in 0..cursor.fragment {
        if let Some(text) = run.text_of(index) {
            total += text.len();
        }
    }
    total + cursor.offset
}

/// Search forward from (`fragment`, `offset`) for `pattern`, advancing
/// across sibling boundaries. Opaque fragments are skipped; the pattern does
/// not span fragment boundaries. Terminates at the end of the run.
fn find_forward(
    run: &FragmentRun,
    mut fragment: usize,
    mut offset: usize,
    pattern: &str,
) -> Option<FragmentCursor> {
    while fragment < run.len() {
        if let Some(text) = run.text_of(fragment)
            && offset <= text.len()
            && let Some(at) = memmem::find(text[offset..].as_bytes(), pattern.as_bytes())
        {
            return Some(FragmentCursor::new(fragment, offset + at));
        }
        fragment += 1;
        offset = 0;
    }
    None
}

/// Concatenate the run's text strictly between two cursors. Both endpoint
/// fragments are text-bearing (they held delimiter matches); interior opaque
/// fragments contribute nothing.
fn collect_between(run: &FragmentRun, from: FragmentCursor, to: FragmentCursor) -> String {
    if from.fragment == to.fragment {
        return run
            .text_of(from.fragment)
            .map(|t| t[from.offset..to.offset].to_string())
            .unwrap_or_default();
    }
    let mut out = String::new();
    if let Some(t) = run.text_of(from.fragment) {
        out.push_str(&t[from.offset..]);
    }
    for index in from.fragment + 1..to.fragment {
        if let Some(t) = run.text_of(index) {
            out.push_str(t);
        }
    }
    if let Some(t) = run.text_of(to.fragment) {
        out.push_str(&t[..to.offset]);
    }
    out
}

/// Find the delimited formula enclosing `caret` within `run`.
///
/// The search origin is normalized to the first text fragment of the
/// contiguous text-bearing stretch containing the caret's fragment, then
/// open/close delimiter pairs are scanned forward until one encloses the
/// caret: the open delimiter must start at or before the caret and the close
/// delimiter must end at or after it (both inclusive). Positions compare by
/// absolute offset across the run, so a caret at the start of a fragment and
/// a delimiter endpoint at the end of the previous fragment are the same
/// position. Pairs closing before the caret are skipped; an open delimiter starting after the caret, or a
/// pair left unclosed at the end of the run, means there is no enclosing
/// formula and `None` is returned — an expected outcome, not an error.
///
/// A caret pointing at a non-text fragment, past the end of its fragment's
/// text, or onto a non-character boundary also yields `None`.
///
/// # Examples
///
/// ```
/// use mathspan::{extract, DelimiterPair, FragmentCursor, FragmentRun};
///
/// let run = FragmentRun::from_texts(["a $$x+1$$ b"]);
/// let found = extract(&run, FragmentCursor::new(0, 5), &DelimiterPair::default()).unwrap();
///
/// assert_eq!(found.text, "x+1");
/// assert_eq!(found.start, FragmentCursor::new(0, 2));
/// assert_eq!(found.end, FragmentCursor::new(0, 9));
/// ```
pub fn extract(
    run: &FragmentRun,
    caret: FragmentCursor,
    delimiters: &DelimiterPair,
) -> Option<ExtractedFormula> {
    let text = run.text_of(caret.fragment)?;
    if caret.offset > text.len() || !text.is_char_boundary(caret.offset) {
        return None;
    }

    // Normalize the origin to the start of the contiguous text-bearing
    // stretch containing the caret.
    let mut origin = caret.fragment;
    while origin > 0 && run.get(origin - 1).is_some_and(Fragment::is_text) {
        origin -= 1;
    }

    let caret_abs = absolute_offset(run, caret);
    let mut from = FragmentCursor::new(origin, 0);
    loop {
        let open = find_forward(run, from.fragment, from.offset, delimiters.open())?;
        if absolute_offset(run, open) > caret_abs {
            // Every remaining pair starts after the caret as well.
            return None;
        }
        let after_open = FragmentCursor::new(open.fragment, open.offset + delimiters.len());
        let close = find_forward(run, after_open.fragment, after_open.offset, delimiters.close())?;
        let end = FragmentCursor::new(close.fragment, close.offset + delimiters.len());
        if absolute_offset(run, end) < caret_abs {
            // This pair closed before the caret; keep scanning past it.
            from = end;
            continue;
        }
        return Some(ExtractedFormula {
            text: collect_between(run, after_open, close),
            start: open,
            end,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dollars() -> DelimiterPair {
        DelimiterPair::default()
    }

    #[test]
    fn test_single_fragment_extraction() {
        let run = FragmentRun::from_texts(["a $$x+1$$ b"]);
        let found = extract(&run, FragmentCursor::new(0, 5), &dollars()).unwrap();

        assert_eq!(found.text, "x+1");
        assert_eq!(found.start, FragmentCursor::new(0, 2));
        assert_eq!(found.end, FragmentCursor::new(0, 9));
    }

    #[test]
    fn test_cross_fragment_extraction() {
        let run = FragmentRun::from_texts(["pre $$x", "+y$$ post"]);
        let found = extract(&run, FragmentCursor::new(1, 1), &dollars()).unwrap();

        assert_eq!(found.text, "x+y");
        assert_eq!(found.start, FragmentCursor::new(0, 4));
        assert_eq!(found.end, FragmentCursor::new(1, 4));
    }

    #[test]
    fn test_three_fragment_interior_concatenation() {
        let run = FragmentRun::from_texts(["$$a", "bc", "d$$"]);
        let found = extract(&run, FragmentCursor::new(1, 1), &dollars()).unwrap();

        assert_eq!(found.text, "abcd");
        assert_eq!(found.start, FragmentCursor::new(0, 0));
        assert_eq!(found.end, FragmentCursor::new(2, 3));
    }

    #[test]
    fn test_caret_before_any_pair() {
        let run = FragmentRun::from_texts(["a $$x$$"]);
        assert_eq!(extract(&run, FragmentCursor::new(0, 0), &dollars()), None);
    }

    #[test]
    fn test_caret_after_last_pair() {
        let run = FragmentRun::from_texts(["$$x$$ tail"]);
        assert_eq!(extract(&run, FragmentCursor::new(0, 7), &dollars()), None);
    }

    #[test]
    fn test_caret_between_pairs_picks_neither() {
        let run = FragmentRun::from_texts(["$$a$$ gap $$b$$"]);
        assert_eq!(extract(&run, FragmentCursor::new(0, 8), &dollars()), None);
    }

    #[test]
    fn test_second_pair_selected() {
        let run = FragmentRun::from_texts(["$$a$$ $$b$$"]);
        let found = extract(&run, FragmentCursor::new(0, 9), &dollars()).unwrap();

        assert_eq!(found.text, "b");
        assert_eq!(found.start, FragmentCursor::new(0, 6));
    }

    #[test]
    fn test_empty_formula() {
        let run = FragmentRun::from_texts(["$$$$"]);
        let found = extract(&run, FragmentCursor::new(0, 2), &dollars()).unwrap();

        assert_eq!(found.text, "");
        assert_eq!(found.start, FragmentCursor::new(0, 0));
        assert_eq!(found.end, FragmentCursor::new(0, 4));
    }

    #[test]
    fn test_unclosed_pair_yields_none() {
        let run = FragmentRun::from_texts(["a $$x never closed"]);
        assert_eq!(extract(&run, FragmentCursor::new(0, 5), &dollars()), None);
    }

    #[test]
    fn test_opaque_siblings_skipped_forward() {
        let run = FragmentRun::new(vec![
            Fragment::text("$$a"),
            Fragment::Opaque,
            Fragment::text("b$$"),
        ]);
        // Caret before the gap; the close delimiter lies beyond it.
        let found = extract(&run, FragmentCursor::new(0, 2), &dollars()).unwrap();

        assert_eq!(found.text, "ab");
        assert_eq!(found.start, FragmentCursor::new(0, 0));
        assert_eq!(found.end, FragmentCursor::new(2, 3));
    }

    #[test]
    fn test_origin_normalization_stops_at_opaque() {
        // The opaque sibling splits the run: the "$$a" before it is not part
        // of the caret's contiguous text stretch, so the backward walk stops
        // and the open delimiter in the later stretch is used.
        let run = FragmentRun::new(vec![
            Fragment::text("$$a"),
            Fragment::Opaque,
            Fragment::text("$$b$$"),
        ]);
        let found = extract(&run, FragmentCursor::new(2, 3), &dollars()).unwrap();

        assert_eq!(found.text, "b");
        assert_eq!(found.start, FragmentCursor::new(2, 0));
    }

    #[test]
    fn test_caret_on_opaque_fragment_yields_none() {
        let run = FragmentRun::new(vec![Fragment::text("$$a$$"), Fragment::Opaque]);
        assert_eq!(extract(&run, FragmentCursor::new(1, 0), &dollars()), None);
    }

    #[test]
    fn test_caret_out_of_bounds_yields_none() {
        let run = FragmentRun::from_texts(["$$a$$"]);
        assert_eq!(extract(&run, FragmentCursor::new(0, 99), &dollars()), None);
        assert_eq!(extract(&run, FragmentCursor::new(5, 0), &dollars()), None);
    }

    #[test]
    fn test_caret_at_close_end_is_inclusive() {
        let run = FragmentRun::from_texts(["$$x$$"]);
        let found = extract(&run, FragmentCursor::new(0, 5), &dollars()).unwrap();
        assert_eq!(found.text, "x");
    }

    #[test]
    fn test_caret_at_next_fragment_start_after_close() {
        // The close delimiter ends exactly at the first fragment's end; a
        // caret at the start of the next fragment is the same position and
        // must still be enclosed.
        let run = FragmentRun::from_texts(["$$x$$", " tail"]);
        let found = extract(&run, FragmentCursor::new(1, 0), &dollars()).unwrap();

        assert_eq!(found.text, "x");
        assert_eq!(found.start, FragmentCursor::new(0, 0));
        assert_eq!(found.end, FragmentCursor::new(0, 5));
    }

    #[test]
    fn test_caret_at_fragment_end_before_open() {
        // Symmetric boundary case: caret at the end of one fragment, the
        // open delimiter at the start of the next.
        let run = FragmentRun::from_texts(["pre ", "$$x$$"]);
        let found = extract(&run, FragmentCursor::new(0, 4), &dollars()).unwrap();

        assert_eq!(found.text, "x");
        assert_eq!(found.start, FragmentCursor::new(1, 0));
        assert_eq!(found.end, FragmentCursor::new(1, 5));
    }

    #[test]
    fn test_custom_delimiters() {
        let run = FragmentRun::from_texts(["see @@e=mc^2@@ here"]);
        let pair = DelimiterPair::new("@@", "@@").unwrap();
        let found = extract(&run, FragmentCursor::new(0, 8), &pair).unwrap();

        assert_eq!(found.text, "e=mc^2");
    }

    proptest! {
        // A caret anywhere inside a well-formed delimited formula recovers
        // exactly the formula text, wherever the fragment boundary falls.
        #[test]
        fn prop_caret_inside_recovers_inner(
            pre in "[a-z ]{0,8}",
            inner in "[a-z+^= ]{0,12}",
            post in "[a-z ]{0,8}",
            split_sel in 0usize..usize::MAX,
            caret_sel in 0usize..usize::MAX,
        ) {
            let text = format!("{pre}$${inner}$${post}");
            let mut split = split_sel % (text.len() + 1);
            // Delimiters do not span fragment boundaries; keep the split out
            // of the middle of either "$$".
            if split == pre.len() + 1 || split == pre.len() + 3 + inner.len() {
                split -= 1;
            }
            let run = FragmentRun::from_texts([&text[..split], &text[split..]]);

            // Caret somewhere within the delimited span (open start through
            // close end, inclusive).
            let open_start = pre.len();
            let close_end = pre.len() + 4 + inner.len();
            let abs = open_start + caret_sel % (close_end - open_start + 1);
            let caret = if abs < split {
                FragmentCursor::new(0, abs)
            } else {
                FragmentCursor::new(1, abs - split)
            };

            let found = extract(&run, caret, &dollars()).unwrap();
            prop_assert_eq!(found.text, inner);
        }
    }
}
