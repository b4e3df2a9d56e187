//! Multipart intake and on-disk storage for applicant documents.

use axum::extract::Multipart;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};
use thiserror::Error;
use uuid::Uuid;

const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];
const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const PDF_MAGIC: [u8; 4] = *b"%PDF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Jpeg,
    Png,
    Pdf,
}

impl FileKind {
    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Jpeg => "jpg",
            FileKind::Png => "png",
            FileKind::Pdf => "pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            FileKind::Jpeg => "image/jpeg",
            FileKind::Png => "image/png",
            FileKind::Pdf => "application/pdf",
        }
    }

    pub fn from_extension(name: &str) -> Option<FileKind> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(FileKind::Jpeg),
            "png" => Some(FileKind::Png),
            "pdf" => Some(FileKind::Pdf),
            _ => None,
        }
    }
}

pub const IMAGE_KINDS: &[FileKind] = &[FileKind::Jpeg, FileKind::Png];
pub const DOCUMENT_KINDS: &[FileKind] = &[FileKind::Pdf];

/// Identifies a file by its leading bytes, ignoring whatever name or
/// content type the client claimed.
pub fn detect_kind(bytes: &[u8]) -> Option<FileKind> {
    if bytes.starts_with(&JPEG_MAGIC) {
        Some(FileKind::Jpeg)
    } else if bytes.starts_with(&PNG_MAGIC) {
        Some(FileKind::Png)
    } else if bytes.starts_with(&PDF_MAGIC) {
        Some(FileKind::Pdf)
    } else {
        None
    }
}

pub fn ensure_kind(field: &str, bytes: &[u8], allowed: &[FileKind]) -> Result<FileKind, UploadError> {
    detect_kind(bytes)
        .filter(|kind| allowed.contains(kind))
        .ok_or_else(|| UploadError::InvalidSignature(field.to_string()))
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("{0} file is required")]
    Missing(String),
    #[error("File too large. Maximum size is {limit} bytes ({field}).")]
    TooLarge { field: String, limit: usize },
    #[error("Invalid file formats detected via signature verification")]
    InvalidSignature(String),
    #[error("Malformed multipart body: {0}")]
    Malformed(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub bytes: Vec<u8>,
}

/// A fully buffered multipart body: text fields plus file parts.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }

    pub fn take_file(&mut self, name: &str) -> Result<UploadedFile, UploadError> {
        self.files
            .remove(name)
            .ok_or_else(|| UploadError::Missing(name.to_string()))
    }

    pub fn insert_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn insert_file(&mut self, file: UploadedFile) {
        self.files.insert(file.field.clone(), file);
    }
}

/// Buffers every part of `multipart`. Parts with a file name are files and
/// are capped at `max_file_bytes` each; everything else is a text field.
pub async fn read_multipart(
    mut multipart: Multipart,
    max_file_bytes: usize,
) -> Result<MultipartForm, crate::error::AppError> {
    let mut form = MultipartForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match field.file_name() {
            Some(_) => {
                let bytes = field.bytes().await?;
                if bytes.len() > max_file_bytes {
                    return Err(UploadError::TooLarge {
                        field: name,
                        limit: max_file_bytes,
                    }
                    .into());
                }
                if bytes.is_empty() {
                    continue;
                }
                form.insert_file(UploadedFile {
                    field: name,
                    bytes: bytes.to_vec(),
                });
            }
            None => {
                let value = field.text().await?;
                form.insert_text(name, value);
            }
        }
    }

    Ok(form)
}

/// Accepts only a bare file name: no separators, no parent references, no NUL.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
        && !name.contains("..")
        && Path::new(name).file_name().and_then(|f| f.to_str()) == Some(name)
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Writes `bytes` under a generated `{uuid}.{ext}` name and returns that name.
    pub async fn save(&self, kind: FileKind, bytes: &[u8]) -> Result<String, UploadError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let name = format!("{}.{}", Uuid::new_v4(), kind.extension());
        tokio::fs::write(self.root.join(&name), bytes).await?;
        Ok(name)
    }

    /// Best effort; a file that is already gone is not an error.
    pub async fn remove(&self, name: &str) {
        if !is_plain_file_name(name) {
            return;
        }
        if let Err(err) = tokio::fs::remove_file(self.root.join(name)).await {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(file = name, error = %err, "Failed to remove stored upload");
            }
        }
    }

    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        is_plain_file_name(name).then(|| self.root.join(name))
    }
}
