//! Regex patterns for the invoice filename grammar.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Invoice number embedded in the filename: "Invoice" followed by digits.
    pub static ref INVOICE_NUMBER: Regex = Regex::new(r"Invoice(\d+)").unwrap();
}
