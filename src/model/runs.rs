//! Formatting runs - the document content as (text, attributes) spans
//!
//! A `FormatRunList` covers the whole document with no gaps or overlaps.
//! Adjacent runs never share attributes, so the list length is bounded by the
//! number of formatting changes rather than by the number of characters.
//! The only empty run allowed is the single sentinel of an empty document;
//! it carries the attributes text typed into that document will pick up.
//!
//! All offsets are char offsets.

use serde::Serialize;

use super::attributes::FormattingAttributes;
use crate::util::word_span_at;

/// Half-open char range `[start, end)`; empty when it is a bare caret
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    /// Create a range, ordering the endpoints (selections may be reversed)
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Collapsed range at a caret position
    pub fn caret(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    fn clamped(self, max: usize) -> Self {
        Self {
            start: self.start.min(max),
            end: self.end.min(max),
        }
    }
}

/// A span of text sharing one set of attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatRun {
    pub text: String,
    pub attributes: FormattingAttributes,
}

impl FormatRun {
    pub fn new(text: impl Into<String>, attributes: FormattingAttributes) -> Self {
        Self {
            text: text.into(),
            attributes,
        }
    }

    /// Length in chars
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Ordered, maximally merged runs covering the whole document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatRunList {
    runs: Vec<FormatRun>,
}

impl Default for FormatRunList {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatRunList {
    /// Empty document: a single empty run with default attributes
    pub fn new() -> Self {
        Self::empty_with(FormattingAttributes::default())
    }

    /// Empty document whose sentinel carries `attributes`
    pub fn empty_with(attributes: FormattingAttributes) -> Self {
        Self {
            runs: vec![FormatRun::new(String::new(), attributes)],
        }
    }

    /// A single run spanning `text`
    pub fn from_text(text: &str, attributes: FormattingAttributes) -> Self {
        Self {
            runs: vec![FormatRun::new(text, attributes)],
        }
    }

    /// Build a canonical list from arbitrary runs, dropping empty runs and
    /// coalescing neighbours with equal attributes
    pub fn from_runs(runs: impl IntoIterator<Item = FormatRun>) -> Self {
        let mut list = Self { runs: Vec::new() };
        for run in runs {
            list.push(&run.text, run.attributes);
        }
        if list.runs.is_empty() {
            list.runs.push(FormatRun::new(
                String::new(),
                FormattingAttributes::default(),
            ));
        }
        list
    }

    /// Append text at the end, merging into the last run when attributes match
    pub(crate) fn push(&mut self, text: &str, attributes: FormattingAttributes) {
        if text.is_empty() {
            return;
        }
        match self.runs.last_mut() {
            Some(last) if last.text.is_empty() => {
                // Replace the empty-document sentinel
                *last = FormatRun::new(text, attributes);
            }
            Some(last) if last.attributes == attributes => last.text.push_str(text),
            _ => self.runs.push(FormatRun::new(text, attributes)),
        }
    }

    pub fn runs(&self) -> &[FormatRun] {
        &self.runs
    }

    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Total length in chars
    pub fn len(&self) -> usize {
        self.runs.iter().map(FormatRun::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(FormatRun::is_empty)
    }

    /// Concatenated text of all runs
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Whether any run carries non-default attributes
    pub fn has_formatting(&self) -> bool {
        self.has_formatting_beyond(FormattingAttributes::default())
    }

    /// Whether any run's attributes differ from `base`, the attributes of
    /// unformatted text
    pub fn has_formatting_beyond(&self, base: FormattingAttributes) -> bool {
        self.runs
            .iter()
            .any(|r| !r.is_empty() && r.attributes != base)
    }

    /// The attributes to report as "current" for a range.
    ///
    /// A selection reports the run containing its start offset. A caret
    /// reports the run holding the character just before it, or the first
    /// run when the caret is at the document start.
    pub fn attributes_at(&self, range: TextRange) -> FormattingAttributes {
        let range = range.clamped(self.len());
        let index = if range.is_empty() {
            match range.start.checked_sub(1) {
                Some(prev) => prev,
                None => return self.runs[0].attributes,
            }
        } else {
            range.start
        };

        let mut pos = 0;
        for run in &self.runs {
            let len = run.len();
            if index < pos + len {
                return run.attributes;
            }
            pos += len;
        }
        self.runs[self.runs.len() - 1].attributes
    }

    /// Apply `transform` to every character in `range`.
    ///
    /// An empty range expands to the word enclosing the caret; with no
    /// enclosing word nothing changes. Returns the range that was actually
    /// transformed.
    pub fn apply_over_range<F>(&mut self, range: TextRange, transform: F) -> Option<TextRange>
    where
        F: Fn(FormattingAttributes) -> FormattingAttributes,
    {
        let range = self.effective_range(range)?;

        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        for run in &mut self.runs[first..last] {
            run.attributes = transform(run.attributes);
        }
        self.coalesce();

        debug_assert!(self.check_invariants().is_ok(), "{:?}", self.check_invariants());
        Some(range)
    }

    /// Resolve the range a formatting operation targets: the selection as
    /// given, or the word under a bare caret
    pub fn effective_range(&self, range: TextRange) -> Option<TextRange> {
        let range = range.clamped(self.len());
        if !range.is_empty() {
            return Some(range);
        }
        let chars: Vec<char> = self.runs.iter().flat_map(|r| r.text.chars()).collect();
        word_span_at(&chars, range.start).map(|(start, end)| TextRange::new(start, end))
    }

    /// Insert `text` at `offset` with the given attributes
    pub fn insert(&mut self, offset: usize, text: &str, attributes: FormattingAttributes) {
        if text.is_empty() {
            return;
        }
        if self.is_empty() {
            self.runs = vec![FormatRun::new(text, attributes)];
            return;
        }

        let offset = offset.min(self.len());
        let idx = self.split_at(offset);
        self.runs.insert(idx, FormatRun::new(text, attributes));
        self.coalesce();

        debug_assert!(self.check_invariants().is_ok(), "{:?}", self.check_invariants());
    }

    /// Remove the characters in `range`.
    ///
    /// Deleting everything leaves the sentinel carrying the attributes of the
    /// first removed character.
    pub fn remove(&mut self, range: TextRange) {
        let range = range.clamped(self.len());
        if range.is_empty() {
            return;
        }

        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        let removed: Vec<FormatRun> = self.runs.drain(first..last).collect();
        if self.runs.is_empty() {
            let attributes = removed
                .first()
                .map(|r| r.attributes)
                .unwrap_or_default();
            self.runs.push(FormatRun::new(String::new(), attributes));
        }
        self.coalesce();

        debug_assert!(self.check_invariants().is_ok(), "{:?}", self.check_invariants());
    }

    /// Ensure a run boundary at `offset`, returning the index of the run that
    /// starts there (or `runs.len()` at the document end)
    fn split_at(&mut self, offset: usize) -> usize {
        let mut pos = 0;
        for idx in 0..self.runs.len() {
            if offset == pos {
                return idx;
            }
            let len = self.runs[idx].len();
            if offset < pos + len {
                let split_byte = self.runs[idx]
                    .text
                    .char_indices()
                    .nth(offset - pos)
                    .map(|(byte, _)| byte)
                    .unwrap_or(self.runs[idx].text.len());
                let tail = self.runs[idx].text.split_off(split_byte);
                let attributes = self.runs[idx].attributes;
                self.runs.insert(idx + 1, FormatRun::new(tail, attributes));
                return idx + 1;
            }
            pos += len;
        }
        self.runs.len()
    }

    /// Merge neighbours with equal attributes and drop empty runs
    fn coalesce(&mut self) {
        let sentinel_attributes = self
            .runs
            .first()
            .map(|r| r.attributes)
            .unwrap_or_default();
        let mut merged: Vec<FormatRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.attributes == run.attributes => last.text.push_str(&run.text),
                _ => merged.push(run),
            }
        }
        if merged.is_empty() {
            merged.push(FormatRun::new(String::new(), sentinel_attributes));
        }
        self.runs = merged;
    }

    /// Verify the structural invariants: at least one run, no empty run
    /// except a lone sentinel, and no two neighbours with equal attributes.
    /// Coverage holds by construction since the runs own the text.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.runs.is_empty() {
            return Err("run list has no runs".to_string());
        }
        if self.runs.len() > 1 {
            if let Some(idx) = self.runs.iter().position(FormatRun::is_empty) {
                return Err(format!("empty run at index {}", idx));
            }
        }
        for (idx, pair) in self.runs.windows(2).enumerate() {
            if pair[0].attributes == pair[1].attributes {
                return Err(format!(
                    "runs {} and {} share attributes {:?}",
                    idx,
                    idx + 1,
                    pair[0].attributes
                ));
            }
        }
        Ok(())
    }
}
