//! Message types for the Elm-style architecture
//!
//! Every shell action on the document core flows through these types.

use std::path::PathBuf;

use crate::codec::FormatHint;
use crate::model::{DocumentId, FormatFlag, TextRange};

/// Formatting toolbar messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatMsg {
    /// Flip a flag over the selection, or the word under the caret
    Toggle(FormatFlag),
    /// Apply a point size from the size menu
    SetFontSize(u32),
    /// Caret or selection moved; recompute the toolbar's checked state
    CaretMoved,
}

/// Text edits reported by the input surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentMsg {
    /// Typed or pasted text; picks up the attributes at the caret
    InsertText { offset: usize, text: String },
    /// Backspace/Delete/cut over a range
    DeleteRange(TextRange),
}

/// File menu messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileMsg {
    /// New untitled tab
    New,
    /// Open a file in a new tab
    Open(PathBuf),
    /// Save to the document's own path
    Save(DocumentId),
    /// Save As dialog returned a path (or None if cancelled)
    SaveAsDialogResult {
        document_id: DocumentId,
        path: Option<PathBuf>,
        hint: FormatHint,
    },
    /// Show the built-in About page
    OpenAbout,
}

/// Tab bar messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabMsg {
    /// User clicked the tab's close button
    CloseRequested(DocumentId),
}

/// Top-level message type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Format(DocumentId, FormatMsg),
    Document(DocumentId, DocumentMsg),
    File(FileMsg),
    Tab(TabMsg),
}

impl Msg {
    pub fn toggle_bold(doc: DocumentId) -> Self {
        Msg::Format(doc, FormatMsg::Toggle(FormatFlag::Bold))
    }

    pub fn toggle_italic(doc: DocumentId) -> Self {
        Msg::Format(doc, FormatMsg::Toggle(FormatFlag::Italic))
    }

    pub fn toggle_underline(doc: DocumentId) -> Self {
        Msg::Format(doc, FormatMsg::Toggle(FormatFlag::Underline))
    }

    pub fn toggle_strikethrough(doc: DocumentId) -> Self {
        Msg::Format(doc, FormatMsg::Toggle(FormatFlag::Strikethrough))
    }

    pub fn insert_text(doc: DocumentId, offset: usize, text: impl Into<String>) -> Self {
        Msg::Document(
            doc,
            DocumentMsg::InsertText {
                offset,
                text: text.into(),
            },
        )
    }

    pub fn close(doc: DocumentId) -> Self {
        Msg::Tab(TabMsg::CloseRequested(doc))
    }
}
