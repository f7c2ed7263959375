//! Persistence format selection
//!
//! The format is chosen from the file extension, never by sniffing content:
//! `.html` (any case) is rich, everything else is plain.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{FormatRunList, FormattingAttributes};

/// How a document is written to and read from disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistFormat {
    /// HTML markup preserving every formatting attribute
    Rich,
    /// Bare text; formatting is discarded
    Plain,
}

impl PersistFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Self {
        if ext.eq_ignore_ascii_case("html") {
            PersistFormat::Rich
        } else {
            PersistFormat::Plain
        }
    }

    /// Detect format from file path
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(PersistFormat::Plain)
    }

    /// Whether writing in this format loses formatting
    pub fn is_lossy(&self) -> bool {
        matches!(self, PersistFormat::Plain)
    }

    pub fn encode(&self, runs: &FormatRunList) -> Vec<u8> {
        match self {
            PersistFormat::Rich => super::rich::encode_rich(runs),
            PersistFormat::Plain => super::plain::encode_plain(runs),
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<FormatRunList> {
        self.decode_with(bytes, FormattingAttributes::default())
    }

    /// Decode with `base` as the attributes of unformatted plain text.
    /// Rich markup carries its own sizes and ignores `base`.
    pub fn decode_with(&self, bytes: &[u8], base: FormattingAttributes) -> Result<FormatRunList> {
        match self {
            PersistFormat::Rich => super::rich::decode_rich(bytes),
            PersistFormat::Plain => super::plain::decode_plain_with(bytes, base),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PersistFormat::Rich => "HTML",
            PersistFormat::Plain => "Plain Text",
        }
    }
}

/// Format requested by a "Save As" dialog filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FormatHint {
    /// Pick the format from the target path's extension
    #[default]
    FromExtension,
    Rich,
    Plain,
}

impl FormatHint {
    pub fn resolve(self, path: &Path) -> PersistFormat {
        match self {
            FormatHint::FromExtension => PersistFormat::from_path(path),
            FormatHint::Rich => PersistFormat::Rich,
            FormatHint::Plain => PersistFormat::Plain,
        }
    }
}
