use std::collections::HashMap;

use axum::extract::{multipart::MultipartRejection, Multipart};
use bytes::Bytes;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use super::{response::ApiError, validation::single};

/// A file part of a multipart form with a sanitized name.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub body: Bytes,
}

/// Text fields of a multipart form plus at most one file.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl FormData {
    /// `None` when the field was not sent at all.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }
}

/// Reduces a client supplied name to a single safe path component.
pub fn sanitize_filename(name: &str) -> Result<String, &'static str> {
    lazy_static! {
        static ref UNSAFE_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._-]").unwrap();
    }
    if name.contains("..") {
        return Err("file name must not contain '..'");
    }
    let base = name.rsplit(|c| c == '/' || c == '\\').next().unwrap_or("").trim();
    let cleaned = UNSAFE_CHARS.replace_all(base, "_");
    if cleaned.is_empty() || cleaned.starts_with('.') {
        return Err("invalid file name");
    }
    Ok(cleaned.into_owned())
}

/// Drains a multipart body. Only `file_field` may carry a file, and only one.
pub async fn read_form(
    multipart: Result<Multipart, MultipartRejection>,
    file_field: &str,
) -> Result<FormData, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "expected multipart body");
        ApiError::Validation(single("body", "invalid multipart form"))
    })?;
    let mut form = FormData::default();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "malformed multipart body");
                return Err(ApiError::Validation(single("body", "invalid multipart form")));
            }
        };
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == file_field {
            let raw_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let body = field.bytes().await.map_err(|e| {
                warn!(error = %e, "failed to read upload");
                ApiError::Validation(single(file_field, "could not read file"))
            })?;
            // Browsers send an empty part when no file was chosen.
            if raw_name.is_empty() && body.is_empty() {
                continue;
            }
            if form.file.is_some() {
                return Err(ApiError::Validation(single(
                    file_field,
                    "at most one file per request",
                )));
            }
            let file_name = sanitize_filename(&raw_name)
                .map_err(|reason| ApiError::Validation(single(file_field, reason)))?;
            form.file = Some(UploadedFile {
                file_name,
                content_type,
                body,
            });
        } else if field.file_name().is_some() {
            warn!(field = %name, "file sent under a text field");
            return Err(ApiError::Validation(single(
                &name,
                &format!("files are only accepted as '{file_field}'"),
            )));
        } else {
            let value = field.text().await.map_err(|e| {
                warn!(error = %e, field = %name, "failed to read form field");
                ApiError::Validation(single(&name, "invalid text field"))
            })?;
            form.fields.insert(name, value);
        }
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_plain_names() {
        assert_eq!(sanitize_filename("avatar.png").unwrap(), "avatar.png");
    }

    #[test]
    fn strips_directories() {
        assert_eq!(sanitize_filename("/etc/avatar.png").unwrap(), "avatar.png");
        assert_eq!(sanitize_filename(r"C:\Users\me\photo.jpg").unwrap(), "photo.jpg");
    }

    #[test]
    fn rejects_traversal() {
        assert!(sanitize_filename("../../etc/passwd").is_err());
        assert!(sanitize_filename("a..b.png").is_err());
    }

    #[test]
    fn replaces_unsafe_characters() {
        assert_eq!(sanitize_filename("my photo (1).jpg").unwrap(), "my_photo__1_.jpg");
    }

    #[test]
    fn rejects_hidden_and_empty_names() {
        assert!(sanitize_filename(".env").is_err());
        assert!(sanitize_filename("dir/").is_err());
        assert!(sanitize_filename("").is_err());
    }
}
