//! Payloads of individual form fields

use crate::error::Result;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Media type used when a source carries no explicit hint
pub const DEFAULT_MEDIA_TYPE: &str = "text/plain";

/// Where a field's bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Inline text value
    Text(String),
    /// File on disk, read when the form is encoded
    File(PathBuf),
    /// In-memory bytes presented to the server as an uploaded file
    Buffer {
        /// File name reported in the part's `filename` parameter
        file_name: String,
        /// File contents
        bytes: Vec<u8>,
    },
}

/// Payload of one multipart form part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSource {
    kind: SourceKind,
    media_type: Option<String>,
}

impl ContentSource {
    /// Inline text
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Text(value.into()),
            media_type: None,
        }
    }

    /// File on disk; nothing is read until encoding
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: SourceKind::File(path.into()),
            media_type: None,
        }
    }

    /// In-memory buffer uploaded under `file_name`
    pub fn buffer(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: SourceKind::Buffer {
                file_name: file_name.into(),
                bytes: bytes.into(),
            },
            media_type: None,
        }
    }

    /// Override the media type hint
    #[must_use]
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Underlying source
    pub const fn kind(&self) -> &SourceKind {
        &self.kind
    }

    /// Media type hint, `text/plain` unless overridden
    pub fn media_type(&self) -> &str {
        self.media_type.as_deref().unwrap_or(DEFAULT_MEDIA_TYPE)
    }

    /// Text value, if this is an inline text source
    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            SourceKind::Text(value) => Some(value),
            _ => None,
        }
    }

    /// File name to report for file-like sources; `None` for text
    pub fn file_name(&self) -> Option<String> {
        match &self.kind {
            SourceKind::Text(_) => None,
            SourceKind::File(path) => Some(display_name(path)),
            SourceKind::Buffer { file_name, .. } => Some(file_name.clone()),
        }
    }

    /// Bytes of the payload, reading file-backed sources from disk now
    pub fn read_bytes(&self) -> Result<Cow<'_, [u8]>> {
        match &self.kind {
            SourceKind::Text(value) => Ok(Cow::Borrowed(value.as_bytes())),
            SourceKind::File(path) => Ok(Cow::Owned(std::fs::read(path)?)),
            SourceKind::Buffer { bytes, .. } => Ok(Cow::Borrowed(bytes)),
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
