//! Multipart form reading shared by both upload endpoints.

use std::collections::HashMap;

use axum::extract::Multipart;
use tracing::debug;

use crate::documents::Document;
use crate::errors::AppError;

/// A fully-read multipart form: uploaded documents in arrival order plus any
/// plain text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub documents: Vec<Document>,
    pub text_fields: HashMap<String, String>,
}

impl UploadForm {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.text_fields.get(name).map(String::as_str)
    }
}

/// Reads every field of the form. Fields named in `file_fields` become
/// documents; all others are read as UTF-8 text.
pub async fn read_form(
    mut multipart: Multipart,
    file_fields: &[&str],
) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if file_fields.contains(&name.as_str()) {
            let filename = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Could not read file '{filename}': {e}")))?;
            debug!(field = %name, file = %filename, size = bytes.len(), "Received upload");
            form.documents
                .push(Document::new(filename, content_type, bytes));
        } else {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Could not read field '{name}': {e}")))?;
            let value = String::from_utf8(bytes.to_vec())
                .map_err(|_| AppError::Validation(format!("Field '{name}' is not valid UTF-8")))?;
            form.text_fields.insert(name, value);
        }
    }

    Ok(form)
}
