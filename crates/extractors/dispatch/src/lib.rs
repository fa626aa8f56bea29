use std::path::Path;

use doctext_common::config::ExtractionConfig;
use doctext_common::error::ExtractError;
use doctext_common::outcome::Outcome;
use tracing::debug;

/// File kinds the service understands.
///
/// Classification looks only at the trailing extension, matched ASCII
/// case-insensitively (`FILE.PDF` is a PDF).  Every path maps to exactly one
/// kind; anything that is neither PDF nor DOCX is `Unsupported`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Docx,
    Unsupported,
}

impl FileKind {
    pub fn classify(path: &str) -> FileKind {
        let p = Path::new(path);
        if doctext_extract_pdf::accepts(p) {
            FileKind::Pdf
        } else if doctext_extract_docx::accepts(p) {
            FileKind::Docx
        } else {
            FileKind::Unsupported
        }
    }
}

/// Route in-memory bytes to the pipeline matching the path's kind.
///
/// PDF failures are absorbed into `Outcome::Failure` by the pipeline itself;
/// DOCX parse errors propagate so the request boundary can log them and
/// answer with a generic extraction error.
pub fn dispatch_from_bytes(
    bytes: &[u8],
    name: &str,
    cfg: &ExtractionConfig,
) -> Result<Outcome, ExtractError> {
    let kind = FileKind::classify(name);
    debug!("dispatching '{name}' as {kind:?} ({} bytes)", bytes.len());

    match kind {
        FileKind::Pdf => Ok(doctext_extract_pdf::extract_from_bytes(bytes, name, cfg)),
        FileKind::Docx => doctext_extract_docx::extract_outcome(bytes),
        FileKind::Unsupported => {
            let ext = Path::new(name)
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("none");
            Err(ExtractError::UnsupportedFormat(ext.to_string()))
        }
    }
}
