//! Scribble - rich-text document core for a tabbed notepad
//!
//! This crate holds the document model (formatted runs, documents, the tab
//! session) and its persistence codecs. Rendering, input capture and dialogs
//! belong to the shell, which talks to the core through the traits in
//! [`surface`] and the Elm-style [`update`] loop.

pub mod codec;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod debug_dump;
pub mod error;
pub mod messages;
pub mod model;
pub mod surface;
pub mod tracing;
pub mod update;
pub mod util;

// Re-export commonly used types
pub use codec::{FormatHint, PersistFormat};
pub use commands::Cmd;
pub use config::EditorConfig;
pub use error::{Result, ScribbleError};
pub use messages::Msg;
pub use model::{
    Document, DocumentId, FormatFlag, FormatRun, FormatRunList, FormattingAttributes,
    TabSessionRegistry, TextRange,
};
pub use surface::{CloseDecision, ClosePrompt, DiskFileSystem, FileSystem, SelectionSource};
