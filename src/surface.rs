//! Collaborator boundaries
//!
//! The core never renders, captures input, or shows dialogs. It queries the
//! input surface for selections, the file system for bytes, and the shell for
//! decisions through these traits.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::codec::FormatHint;
use crate::model::{Document, DocumentId, TextRange};

// ============================================================================
// Input surface
// ============================================================================

/// Read-only view of caret and selection state owned by the input surface
pub trait SelectionSource {
    /// Active selection, or a caret-only range `[pos, pos)`
    fn selection(&self, doc: DocumentId) -> TextRange;

    fn caret_position(&self, doc: DocumentId) -> usize {
        self.selection(doc).end
    }
}

/// A fixed range serves as the selection of every document
impl SelectionSource for TextRange {
    fn selection(&self, _doc: DocumentId) -> TextRange {
        *self
    }
}

// ============================================================================
// File system
// ============================================================================

/// Byte-level file access
pub trait FileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Replace the file at `path` so that readers see either the old
    /// content or the complete new content, never a partial write
    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

/// The local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFileSystem;

impl FileSystem for DiskFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Temp file in the same directory so the final rename stays on one filesystem
        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        temp.write_all(bytes)?;
        temp.flush()?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| e.error)?;

        tracing::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

// ============================================================================
// Shell prompts
// ============================================================================

/// Answer to the "unsaved changes" prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    Save,
    Discard,
    Cancel,
}

/// Decisions the shell collects from the user during the close protocol
pub trait ClosePrompt {
    /// Ask what to do with a dirty document that is being closed
    fn confirm_unsaved(&mut self, doc: &Document) -> CloseDecision;

    /// Ask where to save a document that has no path yet.
    /// `None` means the user backed out.
    fn choose_save_path(&mut self, doc: &Document) -> Option<(PathBuf, FormatHint)>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_text_range_as_selection_source() {
        let range = TextRange::new(7, 3);
        assert_eq!(range.selection(DocumentId(1)), TextRange::new(3, 7));
        assert_eq!(range.caret_position(DocumentId(9)), 7);
    }

    #[test]
    fn test_write_atomic_replaces_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("note.txt");
        std::fs::write(&path, "old content that is longer").unwrap();

        DiskFileSystem.write_atomic(&path, b"new").unwrap();
        assert_eq!(DiskFileSystem.read(&path).unwrap(), b"new");
    }

    #[test]
    fn test_write_atomic_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("note.html");
        DiskFileSystem.write_atomic(&path, b"<p>x</p>").unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_atomic_missing_directory_fails_cleanly() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("note.txt");
        assert!(DiskFileSystem.write_atomic(&path, b"x").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_read_missing_file() {
        let err = DiskFileSystem
            .read(Path::new("/nonexistent/scribble/file.txt"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
