use std::path::Path;

use doctext_common::config::ExtractionConfig;
use doctext_common::error::ExtractError;
use doctext_common::outcome::{Outcome, PDF_FAILED, PDF_UNREADABLE};
use tracing::warn;

/// One extraction strategy: raw PDF bytes in, plain text out.
pub type Strategy = fn(&[u8]) -> Result<String, ExtractError>;

/// Ordered strategy list.  Strategies run sequentially; the first one whose
/// trimmed output passes the quality gate wins, and later entries never run.
/// pdf-extract handles most encoders; lopdf is an independent second reader
/// for PDFs where pdf-extract legitimately comes back empty.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("pdf-extract", extract_pdf_extract),
    ("lopdf", extract_lopdf),
];

/// Check if a file is a PDF based on extension.
pub fn accepts(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Run the PDF pipeline over raw bytes.
///
/// Never returns an error: strategy failures degrade through the list, and a
/// fully failed run becomes `Outcome::Failure` with a fixed diagnostic.
pub fn extract_from_bytes(bytes: &[u8], name: &str, cfg: &ExtractionConfig) -> Outcome {
    run_strategies(STRATEGIES, bytes, name, cfg.min_text_len)
}

fn run_strategies(
    strategies: &[(&str, Strategy)],
    bytes: &[u8],
    name: &str,
    min_text_len: usize,
) -> Outcome {
    let mut extracted_any = false;

    for (label, run) in strategies {
        match run(bytes) {
            Ok(text) => {
                extracted_any = true;
                let trimmed = text.trim();
                if trimmed.chars().count() >= min_text_len {
                    return Outcome::success(trimmed);
                }
                warn!(
                    "{label} produced insufficient text for '{name}' ({} chars)",
                    trimmed.chars().count()
                );
            }
            Err(e) => warn!("{label} failed for '{name}': {e}"),
        }
    }

    if extracted_any {
        Outcome::warning(PDF_UNREADABLE)
    } else {
        Outcome::failure(PDF_FAILED)
    }
}

/// Primary strategy: pdf-extract.
///
/// pdf-extract can panic on malformed PDFs; catch_unwind turns that into a
/// recoverable error so the fallback still gets its turn.  The panic hook is
/// swapped out around the call so malformed uploads don't spam stderr.
fn extract_pdf_extract(bytes: &[u8]) -> Result<String, ExtractError> {
    let owned = bytes.to_vec();
    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(|_| {}));
    let result = std::panic::catch_unwind(move || pdf_extract::extract_text_from_mem(&owned));
    std::panic::set_hook(prev_hook);

    match result {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ExtractError::Malformed(e.to_string())),
        Err(_) => Err(ExtractError::Panicked),
    }
}

/// Fallback strategy: lopdf, page by page.
///
/// Per-page text is joined with a single space, preserving page order.
/// Pages whose content streams fail to decode contribute nothing rather
/// than failing the whole document.
fn extract_lopdf(bytes: &[u8]) -> Result<String, ExtractError> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| ExtractError::Malformed(e.to_string()))?;
    let pages: Vec<String> = doc
        .get_pages()
        .keys()
        .filter_map(|&page_num| doc.extract_text(&[page_num]).ok())
        .collect();
    Ok(pages.join(" "))
}
