//! Error types for the restamp-core library.

use thiserror::Error;

/// Main error type for the restamp library.
#[derive(Error, Debug)]
pub enum RestampError {
    /// Invoice ledger error.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Filename parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Reference extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// PDF document error.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors from the invoice-number ledger.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Ledger file could not be read.
    #[error("failed to read ledger file: {0}")]
    Read(std::io::Error),

    /// Ledger file could not be written.
    #[error("failed to write ledger file: {0}")]
    Write(std::io::Error),

    /// Ledger file exists but is not valid ledger JSON.
    #[error("ledger file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Errors from parsing the invoice filename grammar.
///
/// Display strings are part of the API contract: the HTTP layer forwards
/// them verbatim to clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No `Invoice<digits>` substring in the filename.
    #[error("Could not find invoice number in filename")]
    MissingInvoiceNumber,

    /// No day/month/year token triple in the filename.
    #[error("Could not find date pattern in filename")]
    MissingDatePattern,

    /// A date triple was found but its month token is not an English
    /// month name or abbreviation.
    #[error("Invalid month: {0}")]
    InvalidMonth(String),

    /// The day/month/year triple does not form a real calendar date.
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// Errors from customer reference extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// No qualifying reference after a `Ref` line in the PDF text.
    #[error("Could not find reference field in PDF")]
    PdfReferenceNotFound,

    /// The filename's reference token is missing or not reference-shaped.
    #[error("Filename does not match expected format")]
    FilenameReferenceNotFound,
}

/// Errors from PDF document handling.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Failed to write the stamp overlay into the document.
    #[error("failed to stamp PDF: {0}")]
    Stamp(String),

    /// Failed to render a preview image.
    #[error("failed to render preview: {0}")]
    Preview(String),

    /// Failed to extract text from the PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),
}

/// Result type for the restamp library.
pub type Result<T> = std::result::Result<T, RestampError>;
