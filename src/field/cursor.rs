//! Cursor state and character-offset splicing.

use serde::{Deserialize, Serialize};

/// A selection `(start, end)` in character offsets, `start <= end`.
///
/// `start == end` is a plain caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Cursor {
    pub start: usize,
    pub end: usize,
}

impl Cursor {
    /// Build a cursor from two offsets in either order.
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn caret(position: usize) -> Self {
        Self::new(position, position)
    }

    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    /// Number of selected characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.is_caret()
    }

    /// Clamp both ends to a value of `char_len` characters.
    pub fn clamp(self, char_len: usize) -> Self {
        Self::new(self.start.min(char_len), self.end.min(char_len))
    }

    /// Build a cursor from offsets in UTF-16 code units, as browsers report
    /// `selectionStart`/`selectionEnd`.
    ///
    /// An offset that falls inside a surrogate pair rounds up to the end of
    /// that character.
    pub fn from_utf16(value: &str, start: usize, end: usize) -> Self {
        Self::new(utf16_to_char(value, start), utf16_to_char(value, end))
    }

    /// This cursor's `(start, end)` in UTF-16 code units of `value`.
    pub fn to_utf16(self, value: &str) -> (usize, usize) {
        (char_to_utf16(value, self.start), char_to_utf16(value, self.end))
    }
}

fn utf16_to_char(value: &str, units: usize) -> usize {
    let mut seen = 0;
    for (index, c) in value.chars().enumerate() {
        if seen >= units {
            return index;
        }
        seen += c.len_utf16();
    }
    value.chars().count()
}

fn char_to_utf16(value: &str, chars: usize) -> usize {
    value.chars().take(chars).map(char::len_utf16).sum()
}

/// Replace the selected range of `value` with `fragment`.
///
/// Returns the new value and a caret placed right after the fragment.
/// Offsets past the end of `value` are clamped.
pub fn splice(value: &str, cursor: Cursor, fragment: &str) -> (String, Cursor) {
    let cursor = cursor.clamp(value.chars().count());
    let start = byte_offset(value, cursor.start);
    let end = byte_offset(value, cursor.end);

    let mut spliced = String::with_capacity(value.len() - (end - start) + fragment.len());
    spliced.push_str(&value[..start]);
    spliced.push_str(fragment);
    spliced.push_str(&value[end..]);

    let caret = cursor.start + fragment.chars().count();
    (spliced, Cursor::caret(caret))
}

fn byte_offset(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
