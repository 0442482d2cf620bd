//! Request/response data transfer objects.

use serde::{Deserialize, Serialize};

use restamp_core::ReferenceSource;

#[derive(Debug, Deserialize)]
pub struct ParseFilenameRequest {
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NextInvoiceNumberResponse {
    pub success: bool,
    #[serde(rename = "invoiceNumber")]
    pub invoice_number: String,
}

/// Parser result envelope: `{success, invoice_number, invoice_date}` on
/// success, `{success, error}` on a grammar mismatch.
#[derive(Debug, Serialize)]
pub struct ParseFilenameResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParseFilenameResponse {
    pub fn ok(invoice_number: String, invoice_date: String) -> Self {
        Self {
            success: true,
            invoice_number: Some(invoice_number),
            invoice_date: Some(invoice_date),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            invoice_number: None,
            invoice_date: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReferenceResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ReferenceSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProcessInvoiceResponse {
    pub success: bool,
    pub message: String,
    pub filename: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
