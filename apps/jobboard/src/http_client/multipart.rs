//! Multipart bodies: named parts that are either scalar text fields or files.

use std::path::Path;

use bytes::Bytes;
use reqwest::multipart::{Form, Part};

use crate::errors::{ApiError, ApiResult};

const PDF_MIME: &str = "application/pdf";
const OCTET_STREAM_MIME: &str = "application/octet-stream";

/// A file to upload: raw bytes plus the filename and mime type sent with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl FilePart {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn pdf(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self::new(file_name, PDF_MIME, bytes.into())
    }

    /// Reads a file from disk; the mime type is guessed from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime_type = mime_for_extension(path);
        Ok(Self::new(file_name, mime_type, Bytes::from(bytes)))
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn mime_for_extension(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("pdf") => PDF_MIME,
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("txt") => "text/plain",
        _ => OCTET_STREAM_MIME,
    }
}

#[derive(Debug, Clone)]
enum PartValue {
    Text(String),
    File(FilePart),
}

/// Ordered list of named multipart parts.
#[derive(Debug, Clone, Default)]
pub struct MultipartBody {
    parts: Vec<(String, PartValue)>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.parts
            .push((name.to_string(), PartValue::Text(value.into())));
        self
    }

    pub fn file(mut self, name: &str, file: FilePart) -> Self {
        self.parts.push((name.to_string(), PartValue::File(file)));
        self
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.parts.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub(crate) fn into_form(self) -> ApiResult<Form> {
        let mut form = Form::new();
        for (name, value) in self.parts {
            form = match value {
                PartValue::Text(text) => form.text(name, text),
                PartValue::File(file) => {
                    let part = Part::bytes(file.bytes.to_vec())
                        .file_name(file.file_name)
                        .mime_str(&file.mime_type)
                        .map_err(|e| {
                            ApiError::Validation(format!("invalid mime type for '{name}': {e}"))
                        })?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}
