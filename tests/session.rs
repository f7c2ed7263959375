//! Session tests
//!
//! Open/save/close protocols against a real temporary directory.

mod common;

use common::{bold, plain, registry_with_text, runs_of, ReadOnlyDisk, ScriptedPrompt};
use scribble::messages::FileMsg;
use scribble::model::{CloseOutcome, SaveOutcome, TabSessionRegistry, TextRange};
use scribble::update::{update, Collaborators};
use scribble::{CloseDecision, Cmd, DiskFileSystem, FormatHint, Msg, PersistFormat, ScribbleError};
use tempfile::tempdir;

// ========================================================================
// Extension-Driven Persistence
// ========================================================================

#[test]
fn test_html_save_preserves_bold_on_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.html");
    let (mut registry, id) = registry_with_text("hello world");
    registry.toggle_bold(id, &TextRange::caret(1)).unwrap();

    registry
        .save_document_as(id, &path, FormatHint::FromExtension, &DiskFileSystem)
        .unwrap();

    let mut reopened = TabSessionRegistry::new();
    let again = reopened.open_document(&path, &DiskFileSystem).unwrap();
    let doc = reopened.get(again).unwrap();
    assert_eq!(
        doc.runs(),
        &runs_of(&[("hello", bold()), (" world", plain())])
    );
    assert!(!doc.is_dirty());
}

#[test]
fn test_txt_save_reopens_as_unformatted_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    let (mut registry, id) = registry_with_text("hello world");
    registry.toggle_bold(id, &TextRange::caret(1)).unwrap();

    let outcome = registry
        .save_document_as(id, &path, FormatHint::FromExtension, &DiskFileSystem)
        .unwrap();
    let SaveOutcome::Saved(report) = &outcome else {
        panic!("expected a write, got {:?}", outcome);
    };
    assert!(report.formatting_discarded);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello world");

    let mut reopened = TabSessionRegistry::new();
    let again = reopened.open_document(&path, &DiskFileSystem).unwrap();
    let doc = reopened.get(again).unwrap();
    assert_eq!(doc.runs().run_count(), 1);
    assert!(!doc.runs().has_formatting());
    assert_eq!(doc.text(), "hello world");
}

#[test]
fn test_plain_save_without_formatting_reports_nothing_lost() {
    let dir = tempdir().unwrap();
    let (mut registry, id) = registry_with_text("just words");
    let outcome = registry
        .save_document_as(
            id,
            &dir.path().join("a.txt"),
            FormatHint::FromExtension,
            &DiskFileSystem,
        )
        .unwrap();
    assert!(matches!(
        outcome,
        SaveOutcome::Saved(ref report) if !report.formatting_discarded
    ));
}

#[test]
fn test_save_overwrites_existing_file_in_place() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("list.html");
    std::fs::write(&path, "<p>old</p>").unwrap();

    let mut registry = TabSessionRegistry::new();
    let id = registry.open_document(&path, &DiskFileSystem).unwrap();
    registry.get_mut(id).unwrap().insert_text(3, " and new");
    assert_eq!(registry.get(id).unwrap().tab_title(), "list.html*");

    let outcome = registry.save_document(id, &DiskFileSystem).unwrap();
    assert!(matches!(outcome, SaveOutcome::Saved(ref r) if r.format == PersistFormat::Rich));
    assert_eq!(registry.get(id).unwrap().tab_title(), "list.html");

    let mut reopened = TabSessionRegistry::new();
    let again = reopened.open_document(&path, &DiskFileSystem).unwrap();
    assert_eq!(reopened.get(again).unwrap().text(), "old and new");
}

#[test]
fn test_failed_save_leaves_target_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("keep.txt");
    std::fs::write(&path, "original").unwrap();

    let mut registry = TabSessionRegistry::new();
    let id = registry.open_document(&path, &ReadOnlyDisk).unwrap();
    registry.get_mut(id).unwrap().insert_text(0, "edited ");

    let err = registry.save_document(id, &ReadOnlyDisk).unwrap_err();
    assert!(matches!(err, ScribbleError::Io { .. }));
    assert!(registry.get(id).unwrap().is_dirty());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "original");
}

#[test]
fn test_open_missing_file_reports_not_found() {
    let dir = tempdir().unwrap();
    let mut registry = TabSessionRegistry::new();
    let err = registry
        .open_document(&dir.path().join("ghost.html"), &DiskFileSystem)
        .unwrap_err();
    assert!(matches!(err, ScribbleError::NotFound { .. }));
}

#[test]
fn test_open_directory_reports_io_error() {
    let dir = tempdir().unwrap();
    let mut registry = TabSessionRegistry::new();
    let err = registry
        .open_document(dir.path(), &DiskFileSystem)
        .unwrap_err();
    assert!(matches!(err, ScribbleError::Io { .. }));
}

#[test]
fn test_open_through_equivalent_path_reuses_tab() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("same.txt");
    std::fs::write(&path, "x").unwrap();
    let detour = dir.path().join(".").join("same.txt");

    let mut registry = TabSessionRegistry::new();
    let first = registry.open_document(&path, &DiskFileSystem).unwrap();
    let second = registry.open_document(&detour, &DiskFileSystem).unwrap();
    assert_eq!(first, second);
    assert_eq!(registry.len(), 1);
}

// ========================================================================
// Close Protocol
// ========================================================================

fn dirty_file_document(dir: &std::path::Path) -> (TabSessionRegistry, scribble::DocumentId) {
    let path = dir.join("draft.txt");
    std::fs::write(&path, "draft").unwrap();
    let mut registry = TabSessionRegistry::new();
    let id = registry.open_document(&path, &DiskFileSystem).unwrap();
    registry.get_mut(id).unwrap().insert_text(5, " two");
    (registry, id)
}

#[test]
fn test_close_cancel_keeps_dirty_document() {
    let dir = tempdir().unwrap();
    let (mut registry, id) = dirty_file_document(dir.path());
    let mut prompt = ScriptedPrompt::answering(CloseDecision::Cancel);

    let outcome = registry
        .request_close(id, &mut prompt, &DiskFileSystem)
        .unwrap();
    assert_eq!(outcome, CloseOutcome::Cancelled);
    assert_eq!(prompt.confirmations.get(), 1);
    assert!(registry.get(id).unwrap().is_dirty());
    assert_eq!(std::fs::read_to_string(dir.path().join("draft.txt")).unwrap(), "draft");
}

#[test]
fn test_close_discard_proceeds_without_writing() {
    let dir = tempdir().unwrap();
    let (mut registry, id) = dirty_file_document(dir.path());
    let mut prompt = ScriptedPrompt::answering(CloseDecision::Discard);

    let outcome = registry
        .request_close(id, &mut prompt, &DiskFileSystem)
        .unwrap();
    assert_eq!(outcome, CloseOutcome::Proceed);
    registry.remove(id);
    assert!(registry.is_empty());
    assert_eq!(std::fs::read_to_string(dir.path().join("draft.txt")).unwrap(), "draft");
}

#[test]
fn test_close_save_success_proceeds() {
    let dir = tempdir().unwrap();
    let (mut registry, id) = dirty_file_document(dir.path());
    let mut prompt = ScriptedPrompt::answering(CloseDecision::Save);

    let outcome = registry
        .request_close(id, &mut prompt, &DiskFileSystem)
        .unwrap();
    assert_eq!(outcome, CloseOutcome::Proceed);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("draft.txt")).unwrap(),
        "draft two"
    );
}

#[test]
fn test_close_save_failure_reports_error_and_stays_dirty() {
    let dir = tempdir().unwrap();
    let (mut registry, id) = dirty_file_document(dir.path());
    let mut prompt = ScriptedPrompt::answering(CloseDecision::Save);

    let err = registry
        .request_close(id, &mut prompt, &ReadOnlyDisk)
        .unwrap_err();
    assert!(matches!(err, ScribbleError::Io { .. }));
    assert!(registry.get(id).unwrap().is_dirty());
    assert_eq!(registry.len(), 1);
    assert_eq!(std::fs::read_to_string(dir.path().join("draft.txt")).unwrap(), "draft");
}

#[test]
fn test_close_save_as_failure_reports_error() {
    let dir = tempdir().unwrap();
    let (mut registry, id) = registry_with_text("unsaved");
    registry.get_mut(id).unwrap().insert_text(0, "*");
    let mut prompt =
        ScriptedPrompt::saving_to(dir.path().join("new.html"), FormatHint::FromExtension);

    let err = registry
        .request_close(id, &mut prompt, &ReadOnlyDisk)
        .unwrap_err();
    assert!(matches!(err, ScribbleError::Io { .. }));
    assert!(registry.get(id).unwrap().is_dirty());
    assert_eq!(registry.get(id).unwrap().path(), None);
    assert!(!dir.path().join("new.html").exists());
}

#[test]
fn test_close_save_untitled_asks_for_path() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("fresh.html");
    let (mut registry, id) = registry_with_text("brand new");
    registry.get_mut(id).unwrap().insert_text(0, "*");
    let mut prompt = ScriptedPrompt::saving_to(target.clone(), FormatHint::FromExtension);

    let outcome = registry
        .request_close(id, &mut prompt, &DiskFileSystem)
        .unwrap();
    assert_eq!(outcome, CloseOutcome::Proceed);
    assert_eq!(registry.get(id).unwrap().path(), Some(target.as_path()));

    let mut reopened = TabSessionRegistry::new();
    let again = reopened.open_document(&target, &DiskFileSystem).unwrap();
    assert_eq!(reopened.get(again).unwrap().text(), "*brand new");
}

#[test]
fn test_close_clean_document_skips_prompt() {
    let (mut registry, id) = registry_with_text("saved already");
    let mut prompt = ScriptedPrompt::answering(CloseDecision::Cancel);

    let outcome = registry
        .request_close(id, &mut prompt, &DiskFileSystem)
        .unwrap();
    assert_eq!(outcome, CloseOutcome::Proceed);
    assert_eq!(prompt.confirmations.get(), 0);
}

// ========================================================================
// Shell Dispatch
// ========================================================================

#[test]
fn test_update_save_as_plain_shows_notice() {
    let dir = tempdir().unwrap();
    let (mut registry, id) = registry_with_text("hello");
    registry.toggle_bold(id, &TextRange::caret(0)).unwrap();

    let selection = TextRange::caret(0);
    let mut prompt = ScriptedPrompt::answering(CloseDecision::Cancel);
    let mut env = Collaborators {
        surface: &selection,
        fs: &DiskFileSystem,
        prompt: &mut prompt,
    };
    let cmd = update(
        &mut registry,
        Msg::File(FileMsg::SaveAsDialogResult {
            document_id: id,
            path: Some(dir.path().join("out.txt")),
            hint: FormatHint::FromExtension,
        }),
        &mut env,
    );

    let Some(Cmd::Batch(cmds)) = &cmd else {
        panic!("expected batch, got {:?}", cmd);
    };
    assert!(cmds.iter().any(|c| matches!(c, Cmd::ShowNotice(_))));
    assert!(!registry.get(id).unwrap().is_dirty());
}

#[test]
fn test_update_close_save_failure_shows_error() {
    let dir = tempdir().unwrap();
    let (mut registry, id) = dirty_file_document(dir.path());
    let selection = TextRange::caret(0);
    let mut prompt = ScriptedPrompt::answering(CloseDecision::Save);
    let mut env = Collaborators {
        surface: &selection,
        fs: &ReadOnlyDisk,
        prompt: &mut prompt,
    };

    let cmd = update(&mut registry, Msg::close(id), &mut env);
    let Some(Cmd::ShowError(message)) = &cmd else {
        panic!("expected an error notice, got {:?}", cmd);
    };
    assert!(message.contains("draft.txt"));
    assert!(message.contains("write-protected"));
    assert!(registry.get(id).unwrap().is_dirty());
}

#[test]
fn test_update_close_flow_removes_tab() {
    let (mut registry, id) = registry_with_text("x");
    let selection = TextRange::caret(0);
    let mut prompt = ScriptedPrompt::answering(CloseDecision::Cancel);
    let mut env = Collaborators {
        surface: &selection,
        fs: &DiskFileSystem,
        prompt: &mut prompt,
    };

    let cmd = update(&mut registry, Msg::close(id), &mut env);
    assert_eq!(cmd, Some(Cmd::Redraw));
    assert!(registry.is_empty());
}
