//! Error type shared by the document model, codecs, and session registry

use std::path::{Path, PathBuf};

use crate::model::DocumentId;

/// Errors surfaced to the shell
///
/// `InvalidSize` should be unreachable through the toolbar, which only offers
/// supported sizes. The remaining kinds are shown as dismissible notifications
/// and leave document state unchanged.
#[derive(Debug)]
pub enum ScribbleError {
    /// Font size outside the supported domain
    InvalidSize { size: u32 },
    /// Rich markup could not be parsed
    MalformedDocument { reason: String },
    /// File system read/write failure
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Path does not exist on open
    NotFound { path: PathBuf },
    /// The id names no open document (its tab was already closed)
    UnknownDocument { id: DocumentId },
}

pub type Result<T> = std::result::Result<T, ScribbleError>;

impl ScribbleError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            reason: reason.into(),
        }
    }

    /// Classify an I/O failure for `path`; a missing file becomes `NotFound`
    pub fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// A write failure for `path`; unlike reads, a missing target is not `NotFound`
    pub fn write_failed(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Get a user-friendly message for a notification
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidSize { size } => format!("Font size {} is not available", size),
            Self::MalformedDocument { reason } => {
                format!("The document could not be read: {}", reason)
            }
            Self::Io { path, source } => {
                format!("Error accessing {}: {}", filename_for_display(path), source)
            }
            Self::NotFound { path } => format!("File not found: {}", filename_for_display(path)),
            Self::UnknownDocument { .. } => "The document is no longer open".to_string(),
        }
    }
}

impl std::fmt::Display for ScribbleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSize { size } => write!(f, "invalid font size: {}", size),
            Self::MalformedDocument { reason } => write!(f, "malformed document: {}", reason),
            Self::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            Self::NotFound { path } => write!(f, "not found: {}", path.display()),
            Self::UnknownDocument { id } => write!(f, "unknown document {}", id.0),
        }
    }
}

impl std::error::Error for ScribbleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Get the filename from a path for display in error messages
pub fn filename_for_display(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
