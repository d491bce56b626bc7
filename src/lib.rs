//! Mathspan - locate and convert formula markers embedded in rich-text
//! content.
//!
//! This library handles the plumbing between a formula's two textual lives
//! inside a rich-text editor: the delimited LaTeX notation a user types
//! (`$$x+1$$`) and the MathML markup the content actually stores for
//! rendering. The heavy conversion itself is an external collaborator behind
//! the [`ConversionService`] trait; this crate owns everything around it.
//!
//! # Features
//!
//! - **Conversion façade**: LaTeX ↔ MathML through a pluggable service, with
//!   an in-memory bidirectional cache and well-defined degraded fallbacks on
//!   service failure (never an unhandled fault)
//! - **Annotation round-tripping**: the original LaTeX travels inside its
//!   MathML as a standard `<annotation encoding="LaTeX">` block, so source
//!   notation is recoverable losslessly, raw or sanitized ("safe") markup
//!   alike
//! - **Bulk scanning**: one linear pass over saved content replaces every
//!   annotated `math` element with its delimited source, tolerant of
//!   truncated markup
//! - **Positional extraction**: boundary-exact recovery of the formula
//!   enclosing a caret across a fragmented sequence of sibling text nodes
//!
//! # Example - Extracting the formula under a caret
//!
//! ```
//! use mathspan::{extract, DelimiterPair, Fragment, FragmentCursor, FragmentRun};
//!
//! // A paragraph stored as three sibling fragments, the formula split
//! // across the first and last, with a non-text node in between.
//! let run = FragmentRun::new(vec![
//!     Fragment::text("see $$E = m"),
//!     Fragment::Opaque,
//!     Fragment::text("c^2$$ above"),
//! ]);
//!
//! // Caret inside "E = m" in the first fragment.
//! let found = extract(&run, FragmentCursor::new(0, 7), &DelimiterPair::default()).unwrap();
//! assert_eq!(found.text, "E = mc^2");
//! assert_eq!(found.start, FragmentCursor::new(0, 4));
//! assert_eq!(found.end, FragmentCursor::new(2, 5));
//! ```
//!
//! # Example - Normalizing saved content back to source notation
//!
//! ```
//! use mathspan::{replace_annotated_markup, AnnotationCache, CharacterSet,
//!                insert_annotation, LATEX_ENCODING};
//!
//! // Markup as it comes back from the conversion service, annotated with
//! // its source notation.
//! let markup = insert_annotation(
//!     "<math><mi>x</mi></math>", "x", LATEX_ENCODING, &CharacterSet::RAW,
//! );
//!
//! let mut cache = AnnotationCache::new();
//! let content = format!("Let {markup} be arbitrary.");
//! let restored = replace_annotated_markup(&content, &CharacterSet::RAW, &mut cache);
//! assert_eq!(restored, "Let $$x$$ be arbitrary.");
//! ```

/// Semantic annotation handling: embedding and recovering LaTeX source
/// inside MathML fragments.
pub mod annotation;

/// Bidirectional source ↔ markup lookup cache.
pub mod cache;

/// Character-set (raw vs. safe) and delimiter-pair configuration.
pub mod charset;

/// Conversion façade and the external service boundary.
pub mod convert;

/// Unified error types.
pub mod error;

/// Escaping transforms for annotation payloads.
pub mod escape;

/// Positional formula extraction from fragmented text runs.
pub mod extract;

/// Bulk markup-to-source scanning over saved content.
pub mod scan;

// Re-export commonly used types for convenience
pub use annotation::{LATEX_ENCODING, annotation_payload, insert_annotation};
pub use cache::AnnotationCache;
pub use charset::{CharacterSet, DelimiterPair};
pub use convert::{
    ConversionService, Converted, Converter, ServiceKind, ServiceRequest, ServiceResponse,
};
pub use error::{Error, Result};
pub use extract::{ExtractedFormula, Fragment, FragmentCursor, FragmentRun, extract};
pub use scan::replace_annotated_markup;
