//! Document model - formatting attributes, run lists, documents and the tab session
//!
//! Everything here is plain state with no rendering concerns; the shell reads
//! it and drives it through `update()` or the registry methods directly.

pub mod attributes;
pub mod document;
pub mod registry;
pub mod runs;

pub use attributes::{FormatFlag, FormattingAttributes, DEFAULT_POINT_SIZE};
pub use document::{Document, DocumentIdentity};
pub use registry::{
    CloseOutcome, DocumentId, SaveOutcome, SaveReport, TabSessionRegistry, ABOUT_TITLE,
};
pub use runs::{FormatRun, FormatRunList, TextRange};
