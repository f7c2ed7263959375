//! Document model - formatted content plus file identity and dirty state

use std::path::{Path, PathBuf};

use super::attributes::{FormatFlag, FormattingAttributes};
use super::registry::DocumentId;
use super::runs::{FormatRunList, TextRange};
use crate::codec::PersistFormat;
use crate::error::{filename_for_display, Result, ScribbleError};
use crate::surface::SelectionSource;

/// What a document is bound to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentIdentity {
    /// Backed by a file on disk
    Path(PathBuf),
    /// Never saved; shown as `Untitled-N`
    Untitled(u32),
    /// Built-in informational page with a fixed title
    Page(&'static str),
}

/// Document state - the formatted content and associated file metadata
#[derive(Debug, Clone)]
pub struct Document {
    /// Unique identifier assigned by the registry
    pub id: DocumentId,
    identity: DocumentIdentity,
    /// Format chosen by "Save As"; overrides the extension
    format_override: Option<PersistFormat>,
    runs: FormatRunList,
    /// Whether the content has unsaved changes
    is_modified: bool,
    read_only: bool,
}

impl Document {
    /// A clean document bound to `identity`
    pub fn new(id: DocumentId, identity: DocumentIdentity, runs: FormatRunList) -> Self {
        Self {
            id,
            identity,
            format_override: None,
            runs,
            is_modified: false,
            read_only: false,
        }
    }

    /// Mark the document as non-editable
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn identity(&self) -> &DocumentIdentity {
        &self.identity
    }

    pub fn runs(&self) -> &FormatRunList {
        &self.runs
    }

    pub fn text(&self) -> String {
        self.runs.text()
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        match &self.identity {
            DocumentIdentity::Path(path) => Some(path),
            _ => None,
        }
    }

    /// Format used by a plain "Save"; `None` until the document has a path
    pub fn persist_format(&self) -> Option<PersistFormat> {
        let path = self.path()?;
        Some(self.format_override.unwrap_or_else(|| PersistFormat::from_path(path)))
    }

    pub fn is_dirty(&self) -> bool {
        self.is_modified
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Clear the dirty flag after a successful save
    pub fn mark_clean(&mut self) {
        self.is_modified = false;
    }

    /// Name shown to the user: the file name, `Untitled-N`, or the page title
    pub fn display_name(&self) -> String {
        match &self.identity {
            DocumentIdentity::Path(path) => filename_for_display(path),
            DocumentIdentity::Untitled(n) => format!("Untitled-{}", n),
            DocumentIdentity::Page(title) => (*title).to_string(),
        }
    }

    /// Tab label, with a trailing `*` while there are unsaved changes
    pub fn tab_title(&self) -> String {
        if self.is_modified {
            format!("{}*", self.display_name())
        } else {
            self.display_name()
        }
    }

    /// Rebind to a new file after "Save As"
    pub(crate) fn retarget(&mut self, path: PathBuf, format: PersistFormat) {
        self.format_override = (format != PersistFormat::from_path(&path)).then_some(format);
        self.identity = DocumentIdentity::Path(path);
    }

    // =========================================================================
    // Formatting
    // =========================================================================

    /// Flip `flag` over the active selection, or over the word under a bare caret.
    ///
    /// Returns the range that changed. Read-only documents and carets outside
    /// any word are left untouched and return `None`.
    pub fn toggle(&mut self, flag: FormatFlag, surface: &dyn SelectionSource) -> Option<TextRange> {
        self.apply(surface, |attrs| attrs.toggle(flag))
    }

    pub fn toggle_bold(&mut self, surface: &dyn SelectionSource) -> Option<TextRange> {
        self.toggle(FormatFlag::Bold, surface)
    }

    pub fn toggle_italic(&mut self, surface: &dyn SelectionSource) -> Option<TextRange> {
        self.toggle(FormatFlag::Italic, surface)
    }

    pub fn toggle_underline(&mut self, surface: &dyn SelectionSource) -> Option<TextRange> {
        self.toggle(FormatFlag::Underline, surface)
    }

    pub fn toggle_strikethrough(&mut self, surface: &dyn SelectionSource) -> Option<TextRange> {
        self.toggle(FormatFlag::Strikethrough, surface)
    }

    /// Set the point size over the active selection (or caret word).
    ///
    /// Sizes outside `supported` fail with `InvalidSize` before anything else
    /// is checked, read-only documents included.
    pub fn set_font_size(
        &mut self,
        surface: &dyn SelectionSource,
        size: u32,
        supported: &[u32],
    ) -> Result<Option<TextRange>> {
        if !supported.contains(&size) {
            return Err(ScribbleError::InvalidSize { size });
        }
        // Also rejects 0 when the configured set contains it
        FormattingAttributes::default().with_point_size(size)?;

        Ok(self.apply(surface, |attrs| FormattingAttributes {
            point_size: size,
            ..attrs
        }))
    }

    /// Attributes the toolbar should show for the live caret or selection
    pub fn current_formatting_state(&self, surface: &dyn SelectionSource) -> FormattingAttributes {
        self.runs.attributes_at(surface.selection(self.id))
    }

    fn apply<F>(&mut self, surface: &dyn SelectionSource, transform: F) -> Option<TextRange>
    where
        F: Fn(FormattingAttributes) -> FormattingAttributes,
    {
        if self.read_only {
            tracing::debug!("Ignoring formatting on read-only {}", self.display_name());
            return None;
        }

        let selection = surface.selection(self.id);
        let changed = self.runs.apply_over_range(selection, transform);
        match changed {
            Some(range) => {
                self.is_modified = true;
                tracing::trace!(
                    "Formatted {}..{} in {}",
                    range.start,
                    range.end,
                    self.display_name()
                );
            }
            None => tracing::trace!(
                "No word at caret {} in {}, formatting skipped",
                selection.start,
                self.display_name()
            ),
        }
        changed
    }

    // =========================================================================
    // Text editing
    // =========================================================================

    /// Insert `text` at `offset`, picking up the attributes at that caret.
    ///
    /// Returns false when nothing changed (read-only document or empty text).
    pub fn insert_text(&mut self, offset: usize, text: &str) -> bool {
        if self.read_only {
            tracing::debug!("Ignoring insert on read-only {}", self.display_name());
            return false;
        }
        if text.is_empty() {
            return false;
        }

        let attrs = self.runs.attributes_at(TextRange::caret(offset));
        self.runs.insert(offset, text, attrs);
        self.is_modified = true;
        true
    }

    /// Delete the characters in `range`. Returns false when nothing changed.
    pub fn delete_range(&mut self, range: TextRange) -> bool {
        if self.read_only {
            tracing::debug!("Ignoring delete on read-only {}", self.display_name());
            return false;
        }
        let len = self.runs.len();
        let range = TextRange::new(range.start.min(len), range.end.min(len));
        if range.is_empty() {
            return false;
        }

        self.runs.remove(range);
        self.is_modified = true;
        true
    }
}
