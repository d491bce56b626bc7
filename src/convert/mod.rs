//! Conversion façade orchestrating the external service and the cache.
//!
//! [`Converter`] is the entry point a host editor talks to: it turns
//! user-authored LaTeX into MathML for rendering and back again, consulting
//! the [`AnnotationCache`] before ever touching the service and degrading to
//! well-defined fallback values when the service fails. Neither direction
//! returns `Result` — failure is absorbed into [`Converted::Degraded`] so the
//! editor stays responsive (see [`crate::error`]).

mod service;

pub use service::{ConversionService, ServiceKind, ServiceRequest, ServiceResponse};

use crate::annotation::{self, LATEX_ENCODING};
use crate::cache::AnnotationCache;
use crate::charset::{CharacterSet, DelimiterPair};
use memchr::memmem;

/// Outcome of a conversion.
///
/// The fallback applied on service failure is a distinct variant so callers
/// cannot mistake a degraded value for a real conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Converted {
    /// A real result from the service (or the cache).
    Full(String),
    /// The fallback value: delimited raw source for LaTeX → MathML, the
    /// empty string for MathML → LaTeX.
    Degraded(String),
}

impl Converted {
    /// The converted (or fallback) text.
    pub fn text(&self) -> &str {
        match self {
            Converted::Full(s) | Converted::Degraded(s) => s,
        }
    }

    /// Consume into the underlying text.
    pub fn into_text(self) -> String {
        match self {
            Converted::Full(s) | Converted::Degraded(s) => s,
        }
    }

    /// Whether this is a fallback rather than a real conversion.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Converted::Degraded(_))
    }
}

/// Replace line breaks in service-returned markup with single spaces.
fn normalize_line_breaks(markup: &str) -> String {
    markup.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Orchestrates LaTeX ↔ MathML conversion through a [`ConversionService`],
/// backed by a shared [`AnnotationCache`].
///
/// # Examples
///
/// ```
/// use mathspan::{ConversionService, Converter, Result, ServiceRequest, ServiceResponse};
///
/// // A stand-in for the remote service.
/// struct Echo;
/// impl ConversionService for Echo {
///     fn convert(&mut self, request: &ServiceRequest) -> Result<ServiceResponse> {
///         let latex = request.latex.as_deref().unwrap_or_default();
///         Ok(ServiceResponse::ok(&format!("<math><mi>{latex}</mi></math>")))
///     }
/// }
///
/// let mut converter = Converter::new(Echo);
/// let markup = converter.source_to_markup("x", true);
/// assert!(!markup.is_degraded());
/// assert!(markup.text().contains("<annotation encoding=\"LaTeX\">x</annotation>"));
/// ```
#[derive(Debug)]
pub struct Converter<S> {
    service: S,
    cache: AnnotationCache,
}

impl<S: ConversionService> Converter<S> {
    /// Create a converter with an empty cache.
    pub fn new(service: S) -> Self {
        Self {
            service,
            cache: AnnotationCache::new(),
        }
    }

    /// Create a converter over a pre-populated cache.
    pub fn with_cache(service: S, cache: AnnotationCache) -> Self {
        Self { service, cache }
    }

    /// The shared annotation cache.
    pub fn cache(&self) -> &AnnotationCache {
        &self.cache
    }

    /// Mutable access to the shared annotation cache, e.g. for feeding it
    /// from the bulk scanner.
    pub fn cache_mut(&mut self) -> &mut AnnotationCache {
        &mut self.cache
    }

    /// Convert LaTeX source text to MathML markup.
    ///
    /// The cache is authoritative: a hit returns immediately without
    /// re-validating against the service. On a miss the service is invoked
    /// (`include_annotation` additionally asks the service to preserve the
    /// source text in its own output); successful markup gets its line
    /// breaks normalized, is annotated with the source text when the service
    /// did not already do so, and is cached. On failure the source comes
    /// back wrapped in `$$…$$` as [`Converted::Degraded`] and the cache is
    /// untouched.
    pub fn source_to_markup(&mut self, source: &str, include_annotation: bool) -> Converted {
        if let Some(markup) = self.cache.lookup_by_source(source) {
            return Converted::Full(markup.to_string());
        }

        let request = ServiceRequest::latex_to_mathml(source, include_annotation);
        let response = match self.service.convert(&request) {
            Ok(response) if response.is_ok() => response,
            _ => return Converted::Degraded(DelimiterPair::default().wrap(source)),
        };
        let Some(result) = response.result else {
            return Converted::Degraded(DelimiterPair::default().wrap(source));
        };

        let mut markup = normalize_line_breaks(&result);
        if !annotation::has_semantics(&markup, &CharacterSet::RAW) {
            markup = annotation::insert_annotation(&markup, source, LATEX_ENCODING, &CharacterSet::RAW);
        }
        if self.cache.lookup_by_source(source).is_none() {
            self.cache.populate(source, &markup);
        }
        Converted::Full(markup)
    }

    /// Convert MathML markup to LaTeX source text.
    ///
    /// On success the resulting LaTeX is embedded (entity-encoded) into an
    /// annotated copy of the markup, the cache is populated with that pair,
    /// and the plain LaTeX is returned. On failure the result is
    /// [`Converted::Degraded`] with the empty string — the absence of a
    /// formula is the signaled outcome, not an error.
    pub fn markup_to_source(&mut self, markup: &str) -> Converted {
        let request = ServiceRequest::mathml_to_latex(markup);
        let response = match self.service.convert(&request) {
            Ok(response) if response.is_ok() => response,
            _ => return Converted::Degraded(String::new()),
        };
        let Some(latex) = response.result else {
            return Converted::Degraded(String::new());
        };

        let annotated =
            annotation::insert_annotation(markup, &latex, LATEX_ENCODING, &CharacterSet::RAW);
        self.cache.populate(&latex, &annotated);
        Converted::Full(latex)
    }

    /// Replace every delimited formula in a plain content string with its
    /// MathML rendering.
    ///
    /// The inverse of [`crate::scan::replace_annotated_markup`]: scans for
    /// `delimiters.open()…delimiters.close()` pairs left to right and feeds
    /// each enclosed text through [`Self::source_to_markup`]. Spans whose
    /// conversion degrades are emitted unchanged, as is a trailing open
    /// delimiter with no close. Text outside delimiter pairs is copied
    /// verbatim.
    pub fn replace_delimited_source(&mut self, content: &str, delimiters: &DelimiterPair) -> String {
        let open = delimiters.open().as_bytes();
        let close = delimiters.close().as_bytes();
        let mut out = String::with_capacity(content.len());
        let mut pos = 0;

        while let Some(rel) = memmem::find(content[pos..].as_bytes(), open) {
            let open_start = pos + rel;
            let inner_start = open_start + delimiters.len();
            let Some(rel) = memmem::find(content[inner_start..].as_bytes(), close) else {
                break; // unclosed trailing delimiter, emit verbatim
            };
            let inner_end = inner_start + rel;
            let span_end = inner_end + delimiters.len();

            out.push_str(&content[pos..open_start]);
            match self.source_to_markup(&content[inner_start..inner_end], true) {
                Converted::Full(markup) => out.push_str(&markup),
                Converted::Degraded(_) => out.push_str(&content[open_start..span_end]),
            }
            pos = span_end;
        }
        out.push_str(&content[pos..]);
        out
    }
}
