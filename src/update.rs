//! Update functions for the Elm-style architecture
//!
//! All shell-driven state changes flow through `update()`. Errors never
//! escape: they become `Cmd::ShowError` notifications and leave the session
//! as it was.

use crate::commands::Cmd;
use crate::error::ScribbleError;
use crate::messages::{DocumentMsg, FileMsg, FormatMsg, Msg, TabMsg};
use crate::model::{CloseOutcome, DocumentId, SaveOutcome, SaveReport, TabSessionRegistry};
use crate::surface::{ClosePrompt, FileSystem, SelectionSource};

/// The outside world an update may consult
pub struct Collaborators<'a> {
    pub surface: &'a dyn SelectionSource,
    pub fs: &'a dyn FileSystem,
    pub prompt: &'a mut dyn ClosePrompt,
}

/// Main update function - dispatches to sub-handlers
pub fn update(
    session: &mut TabSessionRegistry,
    msg: Msg,
    env: &mut Collaborators<'_>,
) -> Option<Cmd> {
    let result = match msg {
        Msg::Format(doc, m) => update_format(session, doc, m, env.surface),
        Msg::Document(doc, m) => update_document(session, doc, m),
        Msg::File(m) => update_file(session, m, env.fs),
        Msg::Tab(m) => update_tab(session, m, env),
    };

    result.unwrap_or_else(|e| {
        tracing::warn!("{}", e);
        Some(Cmd::ShowError(e.user_message()))
    })
}

/// Handle toolbar messages
pub fn update_format(
    session: &mut TabSessionRegistry,
    doc: DocumentId,
    msg: FormatMsg,
    surface: &dyn SelectionSource,
) -> Result<Option<Cmd>, ScribbleError> {
    let changed = match msg {
        FormatMsg::Toggle(flag) => session.toggle(doc, flag, surface)?,
        FormatMsg::SetFontSize(size) => session.set_font_size(doc, size, surface)?,
        FormatMsg::CaretMoved => None,
    };

    let state = session.current_formatting_state(doc, surface)?;
    let refresh = Cmd::RefreshToolbar(state);
    Ok(Some(match changed {
        Some(_) => Cmd::batch(vec![Cmd::Redraw, refresh]),
        None => refresh,
    }))
}

/// Handle text edits
pub fn update_document(
    session: &mut TabSessionRegistry,
    doc: DocumentId,
    msg: DocumentMsg,
) -> Result<Option<Cmd>, ScribbleError> {
    let document = session
        .get_mut(doc)
        .ok_or(ScribbleError::UnknownDocument { id: doc })?;

    let changed = match msg {
        DocumentMsg::InsertText { offset, text } => document.insert_text(offset, &text),
        DocumentMsg::DeleteRange(range) => document.delete_range(range),
    };
    Ok(changed.then_some(Cmd::Redraw))
}

/// Handle file menu messages
pub fn update_file(
    session: &mut TabSessionRegistry,
    msg: FileMsg,
    fs: &dyn FileSystem,
) -> Result<Option<Cmd>, ScribbleError> {
    match msg {
        FileMsg::New => {
            let id = session.new_document();
            Ok(Some(Cmd::FocusDocument(id)))
        }
        FileMsg::Open(path) => {
            let id = session.open_document(&path, fs)?;
            Ok(Some(Cmd::FocusDocument(id)))
        }
        FileMsg::OpenAbout => {
            let id = session.open_about()?;
            Ok(Some(Cmd::FocusDocument(id)))
        }
        FileMsg::Save(doc) => {
            let outcome = session.save_document(doc, fs)?;
            Ok(save_followup(session, doc, outcome))
        }
        FileMsg::SaveAsDialogResult {
            document_id,
            path,
            hint,
        } => {
            let Some(path) = path else {
                tracing::debug!("Save As cancelled");
                return Ok(None);
            };
            let outcome = session.save_document_as(document_id, &path, hint, fs)?;
            Ok(save_followup(session, document_id, outcome))
        }
    }
}

fn save_followup(
    session: &TabSessionRegistry,
    doc: DocumentId,
    outcome: SaveOutcome,
) -> Option<Cmd> {
    match outcome {
        SaveOutcome::Saved(report) => Some(saved_cmd(&report)),
        SaveOutcome::NeedsPath => Some(Cmd::ShowSaveFileDialog {
            document_id: doc,
            suggested_name: session
                .get(doc)
                .map(|d| d.display_name())
                .unwrap_or_default(),
        }),
        SaveOutcome::ReadOnly => None,
    }
}

fn saved_cmd(report: &SaveReport) -> Cmd {
    if report.formatting_discarded {
        Cmd::batch(vec![
            Cmd::Redraw,
            Cmd::ShowNotice(
                "Saving as plain text removed rich text formatting like bold and italics."
                    .to_string(),
            ),
        ])
    } else {
        Cmd::Redraw
    }
}

/// Handle tab bar messages
pub fn update_tab(
    session: &mut TabSessionRegistry,
    msg: TabMsg,
    env: &mut Collaborators<'_>,
) -> Result<Option<Cmd>, ScribbleError> {
    match msg {
        TabMsg::CloseRequested(doc) => {
            match session.request_close(doc, &mut *env.prompt, env.fs)? {
                CloseOutcome::Proceed => {
                    session.remove(doc);
                    Ok(Some(Cmd::Redraw))
                }
                CloseOutcome::Cancelled => Ok(None),
            }
        }
    }
}
