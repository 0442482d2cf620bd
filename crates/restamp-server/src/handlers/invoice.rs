//! Invoice numbering, parsing, and processing handlers.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, info, warn};

use restamp_core::{parse_invoice_filename, pdf, stamp_invoice, StampRequest};

use super::{read_multipart, require_pdf_upload};
use crate::dto::{
    NextInvoiceNumberResponse, ParseFilenameRequest, ParseFilenameResponse,
    ProcessInvoiceResponse, ReferenceResponse,
};
use crate::error::ApiError;
use crate::storage::{sanitize_filename, upload_timestamp};
use crate::SharedState;

/// `GET /api/next-invoice-number` - peek without consuming a number.
pub async fn next_invoice_number(
    State(state): State<SharedState>,
) -> Result<Json<NextInvoiceNumberResponse>, ApiError> {
    let next = state.ledger.lock().await.peek_next()?;

    Ok(Json(NextInvoiceNumberResponse {
        success: true,
        invoice_number: next.to_string(),
    }))
}

/// `POST /api/parse-filename` - extract invoice number and date from a
/// filename. Grammar mismatches come back as a `success: false` envelope
/// rather than an HTTP error.
pub async fn parse_filename(Json(request): Json<ParseFilenameRequest>) -> Response {
    let Some(filename) = request.filename.filter(|f| !f.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ParseFilenameResponse::err("No filename provided")),
        )
            .into_response();
    };

    match parse_invoice_filename(&filename) {
        Ok(parsed) => Json(ParseFilenameResponse::ok(
            parsed.invoice_number,
            parsed.invoice_date.format("%Y-%m-%d").to_string(),
        ))
        .into_response(),
        Err(err) => {
            warn!(%filename, error = %err, "filename did not parse");
            Json(ParseFilenameResponse::err(err.to_string())).into_response()
        }
    }
}

/// `POST /api/extract-reference` - customer reference from an uploaded
/// PDF, falling back to its filename.
pub async fn extract_reference(
    mut multipart: Multipart,
) -> Result<Json<ReferenceResponse>, ApiError> {
    let form = read_multipart(&mut multipart).await?;
    let (filename, data) = require_pdf_upload(&form)?;

    // A scanned or unreadable PDF is a strategy miss, not a request error.
    let text = pdf::extract_text(data)
        .map_err(|err| warn!(error = %err, "PDF text extraction failed"))
        .ok();

    match restamp_core::extract_reference(text.as_deref(), filename) {
        Ok(found) => Ok(Json(ReferenceResponse {
            success: true,
            reference: Some(found.reference),
            source: Some(found.source),
            error: None,
        })),
        Err(err) => Ok(Json(ReferenceResponse {
            success: false,
            reference: None,
            source: None,
            error: Some(err.to_string()),
        })),
    }
}

/// `POST /api/process-invoice` - stamp an uploaded invoice and, on
/// success, consume the next ledger number.
pub async fn process_invoice(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Json<ProcessInvoiceResponse>, ApiError> {
    let form = read_multipart(&mut multipart).await?;

    if form.file.is_none() {
        return Err(ApiError::BadRequest("No file uploaded".to_string()));
    }

    let invoice_number = form
        .fields
        .get("invoiceNumber")
        .filter(|v| !v.is_empty())
        .cloned();
    let invoice_date = form
        .fields
        .get("invoiceDate")
        .filter(|v| !v.is_empty())
        .cloned();
    let (Some(invoice_number), Some(invoice_date)) = (invoice_number, invoice_date) else {
        return Err(ApiError::BadRequest("Missing invoice details".to_string()));
    };

    let (filename, data) = require_pdf_upload(&form)?;

    let timestamp = upload_timestamp();
    let input_name = format!("{timestamp}_{}", sanitize_filename(filename));
    state
        .storage
        .save_upload(&input_name, data)
        .map_err(|e| ApiError::Internal(format!("Failed to store upload: {e}")))?;

    let request = StampRequest {
        invoice_number: invoice_number.clone(),
        invoice_date,
        customer_abn: form
            .fields
            .get("customerABN")
            .filter(|v| !v.is_empty())
            .cloned(),
        exclude_discount: form
            .fields
            .get("excludeDiscount")
            .map(|v| v == "true")
            .unwrap_or(true),
    };

    let stamped = stamp_invoice(data, &request, &state.config.stamp).map_err(|err| {
        error!(error = %err, "invoice processing failed");
        ApiError::Internal("Failed to process invoice".to_string())
    })?;

    let output_name = format!("invoice_{invoice_number}_{timestamp}.pdf");
    state
        .storage
        .save_output(&output_name, &stamped)
        .map_err(|e| ApiError::Internal(format!("Failed to store output: {e}")))?;

    // A number is consumed only once the stamped file is safely on disk.
    let committed = state.ledger.lock().await.commit_next()?;
    info!(%output_name, committed, "invoice processed");

    Ok(Json(ProcessInvoiceResponse {
        success: true,
        message: "Invoice processed successfully".to_string(),
        filename: output_name,
    }))
}
