//! Session state dump for diagnostics
//!
//! Serializes the open documents and their run lists to JSON so a
//! formatting bug can be attached to a report verbatim.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::codec::PersistFormat;
use crate::model::{Document, DocumentId, FormatRun, TabSessionRegistry};

#[derive(Debug, Serialize)]
pub struct SessionDump {
    pub unix_time: u64,
    pub document_count: usize,
    pub documents: Vec<DocumentDump>,
}

#[derive(Debug, Serialize)]
pub struct DocumentDump {
    pub id: DocumentId,
    pub title: String,
    pub file_path: Option<String>,
    pub format: Option<PersistFormat>,
    pub is_modified: bool,
    pub read_only: bool,
    pub char_count: usize,
    pub runs: Vec<FormatRun>,
}

impl DocumentDump {
    fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id,
            title: doc.tab_title(),
            file_path: doc.path().map(|p| p.display().to_string()),
            format: doc.persist_format(),
            is_modified: doc.is_dirty(),
            read_only: doc.is_read_only(),
            char_count: doc.runs().len(),
            runs: doc.runs().runs().to_vec(),
        }
    }
}

impl SessionDump {
    pub fn from_session(session: &TabSessionRegistry) -> Self {
        let unix_time = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        Self {
            unix_time,
            document_count: session.len(),
            documents: session.iter().map(DocumentDump::from_document).collect(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }

    /// Write `<dir>/<unix_time>-session-dump.json`, creating `dir` if needed
    pub fn save_to_dir(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}-session-dump.json", self.unix_time));
        std::fs::write(&path, self.to_json())?;
        tracing::info!(path = %path.display(), "Wrote session dump");
        Ok(path)
    }
}
