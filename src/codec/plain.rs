//! Plain text persistence

use crate::error::{Result, ScribbleError};
use crate::model::{FormatRunList, FormattingAttributes};

/// Concatenate run text, discarding every formatting attribute.
///
/// This is lossy and one-way: bold, italic, underline, strikethrough and
/// point sizes are gone after a plain round trip. Shells should warn the
/// user before saving formatted content this way.
pub fn encode_plain(runs: &FormatRunList) -> Vec<u8> {
    runs.text().into_bytes()
}

/// Read text as a single run with default attributes.
///
/// A leading byte-order mark is dropped. Bytes that are not UTF-8 fail with
/// `MalformedDocument`, so a later save never rewrites them.
pub fn decode_plain(bytes: &[u8]) -> Result<FormatRunList> {
    decode_plain_with(bytes, FormattingAttributes::default())
}

/// Like [`decode_plain`], with the whole text carrying `attributes`
pub fn decode_plain_with(bytes: &[u8], attributes: FormattingAttributes) -> Result<FormatRunList> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let text = std::str::from_utf8(bytes).map_err(|e| {
        ScribbleError::malformed(format!(
            "not UTF-8 text (invalid byte at offset {})",
            e.valid_up_to()
        ))
    })?;
    Ok(FormatRunList::from_text(text, attributes))
}
