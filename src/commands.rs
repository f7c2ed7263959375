//! Command types for the Elm-style architecture
//!
//! Commands are the follow-up work `update()` hands back to the shell.

use crate::model::{DocumentId, FormattingAttributes};

/// Side effects the shell should perform after an update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Repaint tabs and content
    Redraw,
    /// Make a document the active tab
    FocusDocument(DocumentId),
    /// Update the toolbar's checked buttons and size label
    RefreshToolbar(FormattingAttributes),
    /// Show native save dialog; the answer comes back as `FileMsg::SaveAsDialogResult`
    ShowSaveFileDialog {
        document_id: DocumentId,
        suggested_name: String,
    },
    /// Informational notice, e.g. formatting lost to a plain-text save
    ShowNotice(String),
    /// Dismissible error notification
    ShowError(String),
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None => false,
            Cmd::Redraw => true,
            Cmd::FocusDocument(_) => true,
            Cmd::RefreshToolbar(_) => true,
            // Dialogs report back through messages
            Cmd::ShowSaveFileDialog { .. } => false,
            Cmd::ShowNotice(_) => false,
            Cmd::ShowError(_) => false,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
        }
    }
}
