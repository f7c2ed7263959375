//! Utility functions for text editing

/// Check if a character is a punctuation/symbol boundary (not whitespace)
pub fn is_punctuation(ch: char) -> bool {
    matches!(
        ch,
        '/' | ':'
            | ','
            | '.'
            | '-'
            | '('
            | ')'
            | '{'
            | '}'
            | '['
            | ']'
            | ';'
            | '"'
            | '\''
            | '<'
            | '>'
            | '='
            | '+'
            | '*'
            | '&'
            | '|'
            | '!'
            | '@'
            | '#'
            | '$'
            | '%'
            | '^'
            | '~'
            | '`'
            | '\\'
            | '?'
    )
}

/// Character type for word selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharType {
    /// Whitespace characters
    Whitespace,
    /// Alphanumeric characters (word characters)
    WordChar,
    /// Punctuation and symbols
    Punctuation,
}

/// Get the character type for word selection
pub fn char_type(ch: char) -> CharType {
    if ch.is_whitespace() {
        CharType::Whitespace
    } else if is_punctuation(ch) {
        CharType::Punctuation
    } else {
        CharType::WordChar
    }
}

/// Find the word enclosing a caret, as a half-open char range.
///
/// Word characters are those `char_type` classifies as `WordChar`. A caret
/// touching a word on either side belongs to that word, so
/// `"hello world"` with the caret at 5 yields `0..5`. Returns `None` when
/// neither neighbour of the caret is a word character.
pub fn word_span_at(chars: &[char], caret: usize) -> Option<(usize, usize)> {
    let caret = caret.min(chars.len());

    let mut start = caret;
    while start > 0 && char_type(chars[start - 1]) == CharType::WordChar {
        start -= 1;
    }

    let mut end = caret;
    while end < chars.len() && char_type(chars[end]) == CharType::WordChar {
        end += 1;
    }

    if start == end {
        None
    } else {
        Some((start, end))
    }
}
