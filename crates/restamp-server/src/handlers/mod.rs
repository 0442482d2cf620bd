//! Request handlers.

pub mod files;
pub mod health;
pub mod invoice;

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::error::ApiError;

/// A decoded multipart upload: at most one file part plus text fields.
pub(crate) struct UploadForm {
    pub file: Option<(String, Vec<u8>)>,
    pub fields: HashMap<String, String>,
}

/// Drain a multipart body into an [`UploadForm`].
pub(crate) async fn read_multipart(multipart: &mut Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm {
        file: None,
        fields: HashMap::new(),
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            form.file = Some((filename, data.to_vec()));
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

/// Validate that the form carries a named PDF upload.
pub(crate) fn require_pdf_upload(form: &UploadForm) -> Result<(&str, &[u8]), ApiError> {
    let (filename, data) = form
        .file
        .as_ref()
        .ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;

    if filename.is_empty() {
        return Err(ApiError::BadRequest("No file selected".to_string()));
    }
    if !filename.ends_with(".pdf") {
        return Err(ApiError::BadRequest("File must be a PDF".to_string()));
    }

    Ok((filename.as_str(), data.as_slice()))
}
