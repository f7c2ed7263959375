//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::Cell;
use std::io;
use std::path::{Path, PathBuf};

use scribble::model::{Document, DocumentId, TabSessionRegistry};
use scribble::{
    CloseDecision, ClosePrompt, DiskFileSystem, FileSystem, FormatFlag, FormatHint, FormatRun,
    FormatRunList, FormattingAttributes,
};

/// Default attributes
pub fn plain() -> FormattingAttributes {
    FormattingAttributes::default()
}

/// Default attributes with the given flags set
pub fn with_flags(flags: &[FormatFlag]) -> FormattingAttributes {
    flags.iter().fold(plain(), |attrs, &flag| attrs.toggle(flag))
}

pub fn bold() -> FormattingAttributes {
    with_flags(&[FormatFlag::Bold])
}

/// Build a canonical run list from `(text, attributes)` pairs
pub fn runs_of(parts: &[(&str, FormattingAttributes)]) -> FormatRunList {
    FormatRunList::from_runs(
        parts
            .iter()
            .map(|(text, attrs)| FormatRun::new(*text, *attrs)),
    )
}

/// A document exercising every attribute, unicode and line breaks
pub fn sample_runs() -> FormatRunList {
    let big = plain().with_point_size(20).unwrap();
    runs_of(&[
        ("Shopping list\n", with_flags(&[FormatFlag::Bold]).with_point_size(18).unwrap()),
        ("- eggs & ", plain()),
        ("milk", with_flags(&[FormatFlag::Italic, FormatFlag::Underline])),
        ("\n- ", plain()),
        ("<crème brûlée>", with_flags(&[FormatFlag::Strikethrough])),
        ("\n", plain()),
        ("done ✓", big),
    ])
}

/// Deterministic xorshift so failures reproduce
pub struct Rng(pub u64);

impl Rng {
    pub fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    pub fn below(&mut self, n: usize) -> usize {
        (self.next() % n.max(1) as u64) as usize
    }
}

/// Panic with a readable message when structural invariants are broken
pub fn assert_canonical(runs: &FormatRunList) {
    if let Err(e) = runs.check_invariants() {
        panic!("run list not canonical: {} in {:?}", e, runs.runs());
    }
}

/// Per-character attributes, for comparing run lists offset by offset
pub fn attributes_per_char(runs: &FormatRunList) -> Vec<(char, FormattingAttributes)> {
    runs.runs()
        .iter()
        .flat_map(|run| run.text.chars().map(move |c| (c, run.attributes)))
        .collect()
}

/// Registry holding one untitled document with `text`, marked clean
pub fn registry_with_text(text: &str) -> (TabSessionRegistry, DocumentId) {
    let mut registry = TabSessionRegistry::new();
    let id = registry.new_document();
    let doc = registry.get_mut(id).unwrap();
    doc.insert_text(0, text);
    doc.mark_clean();
    (registry, id)
}

/// Close prompt with a scripted answer that counts how often it was asked
pub struct ScriptedPrompt {
    pub decision: CloseDecision,
    pub save_path: Option<(PathBuf, FormatHint)>,
    pub confirmations: Cell<usize>,
}

impl ScriptedPrompt {
    pub fn answering(decision: CloseDecision) -> Self {
        Self {
            decision,
            save_path: None,
            confirmations: Cell::new(0),
        }
    }

    pub fn saving_to(path: PathBuf, hint: FormatHint) -> Self {
        Self {
            decision: CloseDecision::Save,
            save_path: Some((path, hint)),
            confirmations: Cell::new(0),
        }
    }
}

impl ClosePrompt for ScriptedPrompt {
    fn confirm_unsaved(&mut self, _doc: &Document) -> CloseDecision {
        self.confirmations.set(self.confirmations.get() + 1);
        self.decision
    }

    fn choose_save_path(&mut self, _doc: &Document) -> Option<(PathBuf, FormatHint)> {
        self.save_path.clone()
    }
}

/// Real disk reads; every write fails
pub struct ReadOnlyDisk;

impl FileSystem for ReadOnlyDisk {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        DiskFileSystem.read(path)
    }

    fn write_atomic(&self, _path: &Path, _bytes: &[u8]) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "disk is write-protected",
        ))
    }
}
