//! Wire types and trait boundary for the external conversion service.
//!
//! The service is a blocking request/response collaborator: the core hands it
//! a [`ServiceRequest`] naming the conversion direction and the payload, and
//! gets back a [`ServiceResponse`] with a status plus, on success, the
//! converted text. Both types derive serde traits so implementors can put
//! them straight on a JSON wire. Any non-`"ok"` status, missing result, or
//! transport-level `Err` counts as failure; finer-grained error codes are not
//! interpreted by this crate.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Conversion direction discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceKind {
    /// LaTeX source notation → MathML markup.
    #[serde(rename = "latex2mathml")]
    LatexToMathml,
    /// MathML markup → LaTeX source notation.
    #[serde(rename = "mathml2latex")]
    MathmlToLatex,
}

/// One conversion request.
///
/// Exactly one of `latex` / `mml` is populated, matching `service`; use the
/// constructors rather than filling fields by hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequest {
    /// Which conversion is being requested.
    pub service: ServiceKind,
    /// LaTeX payload for [`ServiceKind::LatexToMathml`] requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latex: Option<String>,
    /// MathML payload for [`ServiceKind::MathmlToLatex`] requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mml: Option<String>,
    /// Ask the service to embed the source text in its own output.
    #[serde(rename = "saveLatex", default, skip_serializing_if = "Option::is_none")]
    pub save_latex: Option<bool>,
}

impl ServiceRequest {
    /// Build a LaTeX → MathML request.
    pub fn latex_to_mathml(latex: &str, save_latex: bool) -> Self {
        Self {
            service: ServiceKind::LatexToMathml,
            latex: Some(latex.to_string()),
            mml: None,
            save_latex: save_latex.then_some(true),
        }
    }

    /// Build a MathML → LaTeX request.
    pub fn mathml_to_latex(mml: &str) -> Self {
        Self {
            service: ServiceKind::MathmlToLatex,
            latex: None,
            mml: Some(mml.to_string()),
            save_latex: None,
        }
    }
}

/// One conversion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse {
    /// `"ok"` on success; anything else is failure.
    pub status: String,
    /// Converted text, present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl ServiceResponse {
    /// A successful response carrying `result`.
    pub fn ok(result: &str) -> Self {
        Self {
            status: "ok".to_string(),
            result: Some(result.to_string()),
        }
    }

    /// A failed response with the given status.
    pub fn failed(status: &str) -> Self {
        Self {
            status: status.to_string(),
            result: None,
        }
    }

    /// Whether the service reported success.
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// The external conversion service boundary.
///
/// Implementors own transport concerns (retries, timeouts, concurrency);
/// from this crate's perspective the call blocks and either returns a
/// response or fails outright, in which case the façade's fallback policy
/// applies.
pub trait ConversionService {
    /// Perform one conversion.
    fn convert(&mut self, request: &ServiceRequest) -> Result<ServiceResponse>;
}
