use std::io::{Cursor, Read};
use std::path::Path;

use doctext_common::error::ExtractError;
use doctext_common::outcome::{Outcome, DOCX_EMPTY};
use quick_xml::events::Event;

/// Check if a file is a DOCX based on extension.
pub fn accepts(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("docx"))
        .unwrap_or(false)
}

/// Run the DOCX pipeline over raw bytes.
///
/// Single stage, no fallback — the format's text model is unambiguous, so a
/// parse failure means the container itself is broken and the error
/// propagates to the request boundary.
pub fn extract_outcome(bytes: &[u8]) -> Result<Outcome, ExtractError> {
    let text = extract_from_bytes(bytes)?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Ok(Outcome::warning(DOCX_EMPTY))
    } else {
        Ok(Outcome::success(trimmed))
    }
}

/// Unwrap the DOCX container and return its body text, one blank line
/// between paragraphs.
pub fn extract_from_bytes(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::Malformed(format!("not a DOCX container: {e}")))?;

    let xml = {
        let mut entry = archive
            .by_name("word/document.xml")
            .map_err(|e| ExtractError::Malformed(format!("missing word/document.xml: {e}")))?;
        let mut s = String::new();
        entry
            .read_to_string(&mut s)
            .map_err(|e| ExtractError::Malformed(format!("unreadable document part: {e}")))?;
        s
    };

    Ok(parse_paragraphs(&xml).join("\n\n"))
}

/// Collect non-empty paragraphs from word/document.xml: `w:t` text runs
/// accumulate into the enclosing `w:p` paragraph.
fn parse_paragraphs(xml: &str) -> Vec<String> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current_para = String::new();
    let mut in_t = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:t" => in_t = true,
                b"w:p" => current_para.clear(),
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_t = false,
                b"w:p" => {
                    let text = current_para.trim().to_string();
                    if !text.is_empty() {
                        paragraphs.push(text);
                    }
                    current_para.clear();
                }
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_t {
                    if let Ok(text) = e.unescape() {
                        current_para.push_str(&text);
                    }
                }
            }
            Ok(Event::Eof) => break,
            _ => {}
        }
        buf.clear();
    }
    paragraphs
}
