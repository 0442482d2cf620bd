//! Customer reference extraction.
//!
//! The reference lives in the PDF under a `Ref` heading, in a layout like:
//!
//! ```text
//! Ref
//! Customer PO No
//! DENLOU1-15
//! ```
//!
//! When the PDF yields nothing, the reference token of the filename
//! convention (`WG_Invoice<NUM>_<REF>_...`) is used as a fallback.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ExtractionError;

/// Where a reference was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceSource {
    Pdf,
    Filename,
}

/// A successfully extracted customer reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedReference {
    /// The reference value, trailing punctuation removed.
    pub reference: String,

    /// Strategy that produced it.
    pub source: ReferenceSource,
}

/// Labels that may sit between the `Ref` heading and the actual value.
const SKIP_LABELS: [&str; 3] = ["customer po no", "customer:", "customer"];

/// How many lines after a `Ref` heading are inspected for a value.
const LOOKAHEAD_LINES: usize = 3;

/// Scan extracted PDF text for the reference under a `Ref` heading.
///
/// Lines are trimmed and blank lines dropped before scanning. After each
/// case-insensitive `ref` line, up to [`LOOKAHEAD_LINES`] following lines
/// are examined; known labels are skipped and the first space-free line
/// longer than one character is taken, with trailing `.,;:` stripped.
pub fn reference_from_text(text: &str) -> Result<String, ExtractionError> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    for (i, line) in lines.iter().enumerate() {
        if !line.eq_ignore_ascii_case("ref") {
            continue;
        }
        for candidate in lines.iter().skip(i + 1).take(LOOKAHEAD_LINES) {
            let lower = candidate.to_lowercase();
            if SKIP_LABELS.contains(&lower.as_str()) {
                continue;
            }
            if !candidate.contains(' ') && candidate.len() > 1 {
                let reference = candidate.trim_end_matches(['.', ',', ';', ':']).to_string();
                debug!(%reference, "extracted reference from PDF text");
                return Ok(reference);
            }
        }
    }

    Err(ExtractionError::PdfReferenceNotFound)
}

/// Recover the reference from the filename's third underscore token.
///
/// The token is rejected when it is purely numeric or carries no
/// alphabetic character, so date and time fragments never masquerade as
/// references.
pub fn reference_from_filename(filename: &str) -> Result<String, ExtractionError> {
    let name = filename.strip_suffix(".pdf").unwrap_or(filename);
    let parts: Vec<&str> = name.split('_').collect();

    if let Some(reference) = parts.get(2) {
        let all_digits = !reference.is_empty() && reference.bytes().all(|b| b.is_ascii_digit());
        let has_alpha = reference.bytes().any(|b| b.is_ascii_alphabetic());
        if !all_digits && has_alpha {
            debug!(%reference, "extracted reference from filename");
            return Ok((*reference).to_string());
        }
    }

    Err(ExtractionError::FilenameReferenceNotFound)
}

/// Combined extraction: PDF text first, filename as fallback.
///
/// `pdf_text` is `None` when text extraction itself failed; that counts as
/// a PDF-strategy miss, not a hard error.
pub fn extract_reference(
    pdf_text: Option<&str>,
    filename: &str,
) -> Result<ExtractedReference, ExtractionError> {
    if let Some(text) = pdf_text {
        if let Ok(reference) = reference_from_text(text) {
            return Ok(ExtractedReference {
                reference,
                source: ReferenceSource::Pdf,
            });
        }
    }

    let reference = reference_from_filename(filename)?;
    Ok(ExtractedReference {
        reference,
        source: ReferenceSource::Filename,
    })
}
