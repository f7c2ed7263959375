//! Tab session registry - the ordered set of open documents
//!
//! Owns every `Document`, hands out identities and untitled names, and runs
//! the open/save/close protocols against the file system and shell prompts.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::attributes::{FormatFlag, FormattingAttributes};
use super::document::{Document, DocumentIdentity};
use super::runs::{FormatRunList, TextRange};
use crate::codec::{decode_rich, FormatHint, PersistFormat};
use crate::config::{EditorConfig, UntitledNumbering};
use crate::error::{Result, ScribbleError};
use crate::surface::{CloseDecision, ClosePrompt, FileSystem, SelectionSource};

/// Title of the built-in informational page
pub const ABOUT_TITLE: &str = "About Scribble";

const ABOUT_PAGE: &str = concat!(
    "<!DOCTYPE html>\n<html>\n<body>\n",
    "<h1><span style=\"font-size:20pt; font-weight:700;\">About Scribble</span></h1>\n",
    "<p>Scribble is a small tabbed notepad for formatted notes.</p>\n",
    "<p>Select text, or place the caret inside a word, and use ",
    "<b>bold</b>, <i>italic</i>, <u>underline</u> or <s>strikethrough</s> ",
    "to format it.</p>\n",
    "<p>Files ending in <b>.html</b> keep their formatting. ",
    "Any other file is saved as plain text.</p>\n",
    "<p><span style=\"font-size:10pt;\">Version ",
    env!("CARGO_PKG_VERSION"),
    "</span></p>\n",
    "</body>\n</html>\n"
);

/// Unique identifier for an open document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DocumentId(pub u64);

/// Result of asking to close a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The document may be removed
    Proceed,
    /// The document stays open, untouched (and still dirty if it was)
    Cancelled,
}

/// What a completed write produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub path: PathBuf,
    pub format: PersistFormat,
    /// Plain text was written for content that carried formatting
    pub formatting_discarded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(SaveReport),
    /// The document has no path yet; the shell should ask for one and call save-as
    NeedsPath,
    /// Read-only documents are never written
    ReadOnly,
}

/// Ordered sequence of open documents
#[derive(Debug)]
pub struct TabSessionRegistry {
    documents: Vec<Document>,
    config: EditorConfig,
    next_document_id: u64,
    next_untitled_number: u32,
}

impl Default for TabSessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TabSessionRegistry {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            documents: Vec::new(),
            config,
            next_document_id: 1,
            next_untitled_number: 1,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents in tab order
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    pub fn ids(&self) -> Vec<DocumentId> {
        self.documents.iter().map(|d| d.id).collect()
    }

    pub fn get(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn get_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.iter_mut().find(|d| d.id == id)
    }

    /// Tab index of a document
    pub fn position(&self, id: DocumentId) -> Option<usize> {
        self.documents.iter().position(|d| d.id == id)
    }

    /// Find the document already bound to `path`
    pub fn find_by_path(&self, path: &Path) -> Option<DocumentId> {
        self.documents
            .iter()
            .find(|d| d.path().is_some_and(|p| same_file(p, path)))
            .map(|d| d.id)
    }

    fn document(&self, id: DocumentId) -> Result<&Document> {
        self.get(id).ok_or(ScribbleError::UnknownDocument { id })
    }

    fn document_mut(&mut self, id: DocumentId) -> Result<&mut Document> {
        self.get_mut(id).ok_or(ScribbleError::UnknownDocument { id })
    }

    // =========================================================================
    // Creation
    // =========================================================================

    fn next_document_id(&mut self) -> DocumentId {
        let id = DocumentId(self.next_document_id);
        self.next_document_id += 1;
        id
    }

    fn next_untitled_number(&mut self) -> u32 {
        match self.config.untitled_numbering {
            UntitledNumbering::Monotonic => {
                let n = self.next_untitled_number;
                self.next_untitled_number += 1;
                n
            }
            UntitledNumbering::OpenCount => self.documents.len() as u32 + 1,
        }
    }

    /// Attributes of unformatted text under the configured default size
    pub fn plain_attributes(&self) -> FormattingAttributes {
        FormattingAttributes::default()
            .with_point_size(self.config.default_point_size)
            .unwrap_or_default()
    }

    fn add(&mut self, doc: Document) -> DocumentId {
        let id = doc.id;
        self.documents.push(doc);
        id
    }

    /// Add an empty `Untitled-N` document at the end of the tab order
    pub fn create_untitled(&mut self) -> &Document {
        let id = self.next_document_id();
        let number = self.next_untitled_number();

        let doc = Document::new(
            id,
            DocumentIdentity::Untitled(number),
            FormatRunList::empty_with(self.plain_attributes()),
        );
        tracing::info!("Created {}", doc.display_name());
        let index = self.documents.len();
        self.documents.push(doc);
        &self.documents[index]
    }

    pub fn new_document(&mut self) -> DocumentId {
        self.create_untitled().id
    }

    /// Open `path`, decoding by extension.
    ///
    /// A path that is already open returns the existing document instead of
    /// adding a second tab.
    pub fn open_document(&mut self, path: &Path, fs: &dyn FileSystem) -> Result<DocumentId> {
        if let Some(existing) = self.find_by_path(path) {
            tracing::debug!("{} is already open", path.display());
            return Ok(existing);
        }

        let bytes = fs.read(path).map_err(|e| {
            tracing::warn!("Failed to read {}: {}", path.display(), e);
            ScribbleError::from_io(path, e)
        })?;
        let format = PersistFormat::from_path(path);
        let runs = format.decode_with(&bytes, self.plain_attributes()).map_err(|e| {
            tracing::warn!("Failed to decode {}: {}", path.display(), e);
            e
        })?;

        let id = self.next_document_id();
        let doc = Document::new(id, DocumentIdentity::Path(path.to_path_buf()), runs);
        tracing::info!(
            "Opened {} as {} ({} runs)",
            path.display(),
            format.display_name(),
            doc.runs().run_count()
        );
        Ok(self.add(doc))
    }

    /// Show the built-in read-only page, reusing its tab if already open
    pub fn open_about(&mut self) -> Result<DocumentId> {
        if let Some(doc) = self
            .documents
            .iter()
            .find(|d| *d.identity() == DocumentIdentity::Page(ABOUT_TITLE))
        {
            return Ok(doc.id);
        }

        let runs = decode_rich(ABOUT_PAGE.as_bytes())?;
        let id = self.next_document_id();
        let doc =
            Document::new(id, DocumentIdentity::Page(ABOUT_TITLE), runs).with_read_only(true);
        Ok(self.add(doc))
    }

    // =========================================================================
    // Saving
    // =========================================================================

    /// Write a document to its own path in its remembered format.
    ///
    /// Untitled documents are not written and report `NeedsPath`. On failure
    /// the document stays dirty and the target file keeps its old content.
    pub fn save_document(&mut self, id: DocumentId, fs: &dyn FileSystem) -> Result<SaveOutcome> {
        let doc = self.document(id)?;
        if doc.is_read_only() {
            return Ok(SaveOutcome::ReadOnly);
        }
        let (Some(path), Some(format)) = (doc.path(), doc.persist_format()) else {
            return Ok(SaveOutcome::NeedsPath);
        };
        let path = path.to_path_buf();

        let report = write_document(doc, &path, format, self.plain_attributes(), fs)?;
        self.document_mut(id)?.mark_clean();
        Ok(SaveOutcome::Saved(report))
    }

    /// Write a document to `path` and rebind it there.
    ///
    /// The format comes from `hint`, falling back to the extension, and is
    /// remembered for later saves. A path open in another tab is rejected.
    pub fn save_document_as(
        &mut self,
        id: DocumentId,
        path: &Path,
        hint: FormatHint,
        fs: &dyn FileSystem,
    ) -> Result<SaveOutcome> {
        if let Some(other) = self.find_by_path(path).filter(|&other| other != id) {
            tracing::warn!(
                "Refusing to save over {}, open in document {}",
                path.display(),
                other.0
            );
            return Err(ScribbleError::write_failed(
                path,
                std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "the file is open in another tab",
                ),
            ));
        }

        let doc = self.document(id)?;
        if doc.is_read_only() {
            return Ok(SaveOutcome::ReadOnly);
        }

        let format = hint.resolve(path);
        let report = write_document(doc, path, format, self.plain_attributes(), fs)?;

        let doc = self.document_mut(id)?;
        doc.retarget(path.to_path_buf(), format);
        doc.mark_clean();
        Ok(SaveOutcome::Saved(report))
    }

    // =========================================================================
    // Formatting
    // =========================================================================

    pub fn toggle(
        &mut self,
        id: DocumentId,
        flag: FormatFlag,
        surface: &dyn SelectionSource,
    ) -> Result<Option<TextRange>> {
        Ok(self.document_mut(id)?.toggle(flag, surface))
    }

    pub fn toggle_bold(
        &mut self,
        id: DocumentId,
        surface: &dyn SelectionSource,
    ) -> Result<Option<TextRange>> {
        self.toggle(id, FormatFlag::Bold, surface)
    }

    pub fn toggle_italic(
        &mut self,
        id: DocumentId,
        surface: &dyn SelectionSource,
    ) -> Result<Option<TextRange>> {
        self.toggle(id, FormatFlag::Italic, surface)
    }

    pub fn toggle_underline(
        &mut self,
        id: DocumentId,
        surface: &dyn SelectionSource,
    ) -> Result<Option<TextRange>> {
        self.toggle(id, FormatFlag::Underline, surface)
    }

    pub fn toggle_strikethrough(
        &mut self,
        id: DocumentId,
        surface: &dyn SelectionSource,
    ) -> Result<Option<TextRange>> {
        self.toggle(id, FormatFlag::Strikethrough, surface)
    }

    /// Set the point size; only sizes listed in the config are accepted
    pub fn set_font_size(
        &mut self,
        id: DocumentId,
        size: u32,
        surface: &dyn SelectionSource,
    ) -> Result<Option<TextRange>> {
        let Self {
            documents, config, ..
        } = self;
        let doc = documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(ScribbleError::UnknownDocument { id })?;
        doc.set_font_size(surface, size, &config.font_sizes)
    }

    pub fn current_formatting_state(
        &self,
        id: DocumentId,
        surface: &dyn SelectionSource,
    ) -> Result<FormattingAttributes> {
        Ok(self.document(id)?.current_formatting_state(surface))
    }

    // =========================================================================
    // Closing
    // =========================================================================

    /// Decide whether a document may close.
    ///
    /// Clean documents proceed at once. For dirty ones the shell chooses:
    /// `Discard` proceeds, `Cancel` keeps the document, and `Save` proceeds
    /// only if the save succeeds. A failed save returns its error and leaves
    /// the document open and dirty. Saving an untitled document asks the
    /// shell for a path first; backing out of that cancels the close. The
    /// document is not removed here; call [`Self::remove`] after `Proceed`.
    pub fn request_close(
        &mut self,
        id: DocumentId,
        prompt: &mut dyn ClosePrompt,
        fs: &dyn FileSystem,
    ) -> Result<CloseOutcome> {
        let doc = self.document(id)?;
        if !doc.is_dirty() {
            return Ok(CloseOutcome::Proceed);
        }

        match prompt.confirm_unsaved(doc) {
            CloseDecision::Cancel => {
                tracing::debug!("Close of {} cancelled", doc.display_name());
                Ok(CloseOutcome::Cancelled)
            }
            CloseDecision::Discard => {
                tracing::info!("Discarding unsaved changes in {}", doc.display_name());
                Ok(CloseOutcome::Proceed)
            }
            CloseDecision::Save => {
                let saved = match self.save_document(id, fs) {
                    Ok(SaveOutcome::NeedsPath) => {
                        let doc = self.document(id)?;
                        match prompt.choose_save_path(doc) {
                            Some((path, hint)) => self.save_document_as(id, &path, hint, fs),
                            None => {
                                tracing::debug!("No save path chosen, close cancelled");
                                return Ok(CloseOutcome::Cancelled);
                            }
                        }
                    }
                    other => other,
                };

                match saved {
                    Ok(SaveOutcome::Saved(_)) | Ok(SaveOutcome::ReadOnly) => {
                        Ok(CloseOutcome::Proceed)
                    }
                    Ok(SaveOutcome::NeedsPath) => Ok(CloseOutcome::Cancelled),
                    Err(e) => {
                        tracing::warn!("Save before close failed, keeping document open: {}", e);
                        Err(e)
                    }
                }
            }
        }
    }

    /// Drop a document from the session; call only after `CloseOutcome::Proceed`
    pub fn remove(&mut self, id: DocumentId) -> Option<Document> {
        let index = self.position(id)?;
        let doc = self.documents.remove(index);
        tracing::info!("Closed {}", doc.display_name());
        Some(doc)
    }
}

fn write_document(
    doc: &Document,
    path: &Path,
    format: PersistFormat,
    plain: FormattingAttributes,
    fs: &dyn FileSystem,
) -> Result<SaveReport> {
    let bytes = format.encode(doc.runs());
    fs.write_atomic(path, &bytes).map_err(|e| {
        tracing::warn!("Failed to save {}: {}", path.display(), e);
        ScribbleError::write_failed(path, e)
    })?;

    let formatting_discarded = format.is_lossy() && doc.runs().has_formatting_beyond(plain);
    tracing::info!(
        "Saved {} as {} ({} bytes)",
        path.display(),
        format.display_name(),
        bytes.len()
    );
    Ok(SaveReport {
        path: path.to_path_buf(),
        format,
        formatting_discarded,
    })
}

/// Compare paths by their canonical form when both exist on disk
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
