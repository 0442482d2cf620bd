//! PDF document handling: stamping, preview rendering, text extraction.

mod preview;
mod stamper;
mod text;

pub use preview::render_preview;
pub use stamper::{stamp_invoice, StampRequest};
pub use text::extract_text;

use crate::error::DocumentError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, DocumentError>;
