/// Shown when every PDF strategy ran but none produced enough text.
pub const PDF_UNREADABLE: &str =
    "unable to read text; file may be scanned or contain non-selectable content.";

/// Shown when every PDF strategy failed outright.
pub const PDF_FAILED: &str =
    "PDF extraction failed; file may be password-protected, scanned, or corrupted.";

/// Shown when a DOCX body holds no non-whitespace text.
pub const DOCX_EMPTY: &str = "DOCX contains no readable text.";

/// The tagged result of running an extraction pipeline over one document.
///
/// `Success` carries real extracted text (trimmed, and long enough to pass
/// the pipeline's quality gate).  `Warning` and `Failure` carry one of the
/// fixed diagnostic sentences above — never a mix of diagnostic and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { text: String },
    Warning { text: String },
    Failure { reason: String },
}

impl Outcome {
    pub fn success(text: impl Into<String>) -> Self {
        Outcome::Success { text: text.into() }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Outcome::Warning { text: text.into() }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Outcome::Failure { reason: reason.into() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}
