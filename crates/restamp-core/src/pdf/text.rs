//! Embedded-text extraction from PDF bytes.

use tracing::debug;

use super::Result;
use crate::error::DocumentError;

/// Extract the embedded text of a PDF.
///
/// Scanned or corrupted documents surface as [`DocumentError::TextExtraction`];
/// callers treating text as optional (the reference extractor) downgrade
/// that to a strategy miss.
pub fn extract_text(pdf_bytes: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(pdf_bytes)
        .map_err(|e| DocumentError::TextExtraction(e.to_string()))?;

    debug!(chars = text.len(), "extracted PDF text");
    Ok(text)
}
