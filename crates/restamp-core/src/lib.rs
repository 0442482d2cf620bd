//! Core library for invoice re-stamping.
//!
//! This crate provides:
//! - A persistent invoice-number ledger (sequential, file-backed)
//! - Filename parsing for the `WG_Invoice..._DAY_MONTH_YEAR_...` convention
//! - Customer reference extraction from PDF text, with filename fallback
//! - PDF stamping (invoice number/date/ABN overlay, fixed-region redaction)
//! - First-page preview rendering

pub mod config;
pub mod error;
pub mod ledger;
pub mod parse;
pub mod pdf;

pub use config::{RestampConfig, StampLayout};
pub use error::{DocumentError, ExtractionError, LedgerError, ParseError, RestampError, Result};
pub use ledger::{InvoiceLedger, LedgerState};
pub use parse::{
    extract_reference, parse_invoice_filename, ExtractedReference, ParsedFilename,
    ReferenceSource,
};
pub use pdf::{extract_text, render_preview, stamp_invoice, StampRequest};
