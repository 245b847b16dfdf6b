//! Open document state and symbol lookup
//!
//! Positions follow LSP: a zero-based line and a UTF-16 code unit offset
//! within that line.

use tower_lsp::lsp_types::Position;

pub struct DocumentState {
    /// Full document text (the server uses full sync)
    pub text: String,
    /// Language identifier sent by the editor
    pub language_id: String,
}

impl DocumentState {
    pub fn word_at(&self, position: Position) -> Option<&str> {
        word_at(&self.text, position)
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

/// Find the identifier touching `position`.
///
/// A cursor just after the last character of a word still selects it.
/// Returns `None` when the position is out of range or not on a word.
pub fn word_at(text: &str, position: Position) -> Option<&str> {
    let line = text.lines().nth(position.line as usize)?;

    // Byte offset of the cursor
    let mut utf16 = 0u32;
    let mut cursor = None;
    for (idx, ch) in line.char_indices() {
        if utf16 >= position.character {
            cursor = Some(idx);
            break;
        }
        utf16 += ch.len_utf16() as u32;
    }
    let cursor = match cursor {
        Some(idx) => idx,
        None if utf16 >= position.character => line.len(),
        None => return None,
    };

    let start = line[..cursor]
        .char_indices()
        .rev()
        .take_while(|(_, ch)| is_word_char(*ch))
        .last()
        .map_or(cursor, |(idx, _)| idx);
    let end = line[cursor..]
        .char_indices()
        .find(|(_, ch)| !is_word_char(*ch))
        .map_or(line.len(), |(idx, _)| cursor + idx);

    if start == end {
        return None;
    }
    Some(&line[start..end])
}
