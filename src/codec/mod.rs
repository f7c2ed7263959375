//! Conversion between run lists and bytes on disk
//!
//! Two formats exist: rich HTML that keeps every attribute, and plain text
//! that keeps none. The format for a file comes from its extension.

mod format;
mod plain;
mod rich;

pub use format::{FormatHint, PersistFormat};
pub use plain::{decode_plain, decode_plain_with, encode_plain};
pub use rich::{decode_rich, encode_rich};
