//! Unified error types for the mathspan library.
//!
//! Conversion-service failures are deliberately *not* surfaced through this
//! type by the high-level [`crate::convert::Converter`] API — the façade
//! absorbs them into degraded fallback values so a host editor never observes
//! an unhandled fault. The variants here cover the remaining, genuinely
//! exceptional conditions: transport-level errors raised by
//! [`crate::convert::ConversionService`] implementors, and contract
//! violations caught at configuration time.
use thiserror::Error;

/// Main error type for mathspan operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure reported by a conversion-service implementor
    /// (network error, malformed response body, and so on).
    #[error("Conversion service error: {0}")]
    Service(String),

    /// A delimiter pair was configured with open/close strings of unequal
    /// byte length, or with empty strings. Offset arithmetic after stripping
    /// the delimiters requires equal lengths.
    #[error("Invalid delimiter pair: open and close must be non-empty and of equal length")]
    InvalidDelimiters,
}

/// Result type for mathspan operations.
pub type Result<T> = std::result::Result<T, Error>;
