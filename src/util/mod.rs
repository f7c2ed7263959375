//! Utility modules

pub mod text;

pub use text::{char_type, is_punctuation, word_span_at, CharType};
