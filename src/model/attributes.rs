//! Character formatting attributes

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScribbleError};

/// Point size used for text that carries no explicit size
pub const DEFAULT_POINT_SIZE: u32 = 14;

/// A boolean formatting flag that can be toggled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatFlag {
    Bold,
    Italic,
    Underline,
    Strikethrough,
}

/// Formatting of a character range. Immutable; edits produce new values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormattingAttributes {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub point_size: u32,
}

impl Default for FormattingAttributes {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
            point_size: DEFAULT_POINT_SIZE,
        }
    }
}

impl FormattingAttributes {
    /// Flip exactly one flag
    #[must_use]
    pub fn toggle(self, flag: FormatFlag) -> Self {
        let mut next = self;
        match flag {
            FormatFlag::Bold => next.bold = !next.bold,
            FormatFlag::Italic => next.italic = !next.italic,
            FormatFlag::Underline => next.underline = !next.underline,
            FormatFlag::Strikethrough => next.strikethrough = !next.strikethrough,
        }
        next
    }

    /// Copy with a different point size
    pub fn with_point_size(self, size: u32) -> Result<Self> {
        if size == 0 {
            return Err(ScribbleError::InvalidSize { size });
        }
        Ok(Self {
            point_size: size,
            ..self
        })
    }

    /// Read a single flag
    pub fn flag(&self, flag: FormatFlag) -> bool {
        match flag {
            FormatFlag::Bold => self.bold,
            FormatFlag::Italic => self.italic,
            FormatFlag::Underline => self.underline,
            FormatFlag::Strikethrough => self.strikethrough,
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}
