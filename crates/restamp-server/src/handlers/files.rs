//! Preview and download handlers.

use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tracing::error;

use restamp_core::render_preview;

use super::{read_multipart, require_pdf_upload};
use crate::error::ApiError;
use crate::storage::is_safe_component;
use crate::SharedState;

/// `POST /api/preview` - preview image of an uploaded PDF.
pub async fn preview_upload(mut multipart: Multipart) -> Result<Response, ApiError> {
    let form = read_multipart(&mut multipart).await?;
    let (_, data) = require_pdf_upload(&form)?;

    let png = render_preview(data).map_err(|err| {
        error!(error = %err, "preview rendering failed");
        ApiError::Internal("Failed to generate preview".to_string())
    })?;
    Ok(png_response(png))
}

/// `GET /api/preview-processed/:filename` - preview image of a stamped
/// output file.
pub async fn preview_processed(
    State(state): State<SharedState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let data = read_output_checked(&state, &filename, "File not found".to_string())?;

    let png = render_preview(&data).map_err(|err| {
        error!(error = %err, "preview rendering failed");
        ApiError::Internal("Failed to generate preview".to_string())
    })?;
    Ok(png_response(png))
}

/// `GET /api/download/:filename` - stamped output file as an attachment.
pub async fn download(
    State(state): State<SharedState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let data = read_output_checked(&state, &filename, format!("File not found: {filename}"))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        data,
    )
        .into_response())
}

fn read_output_checked(
    state: &SharedState,
    filename: &str,
    not_found: String,
) -> Result<Vec<u8>, ApiError> {
    if !is_safe_component(filename) {
        return Err(ApiError::NotFound(not_found));
    }
    state
        .storage
        .read_output(filename)
        .map_err(|_| ApiError::NotFound(not_found))
}

fn png_response(png: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "image/png")], png).into_response()
}
