//! Filename and reference parsing for the invoice naming convention.

mod filename;
mod patterns;
mod reference;

pub use filename::{parse_invoice_filename, ParsedFilename};
pub use reference::{
    extract_reference, reference_from_filename, reference_from_text, ExtractedReference,
    ReferenceSource,
};
