//! Single-line input buffer for the chat view.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Make pasted or typed text safe for a one-line field
///
/// Tabs become four spaces, line breaks become a single space and other
/// control characters are dropped.
pub fn sanitize_line_input(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\t' => sanitized.push_str("    "),
            '\r' | '\n' => {
                if !sanitized.ends_with(' ') {
                    sanitized.push(' ');
                }
            }
            _ if !c.is_control() => sanitized.push(c),
            _ => {}
        }
    }

    sanitized
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputLine {
    text: String,
}

impl InputLine {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn insert_char(&mut self, c: char) {
        let mut buf = [0_u8; 4];
        self.insert_str(c.encode_utf8(&mut buf));
    }

    pub fn insert_str(&mut self, text: &str) {
        self.text.push_str(&sanitize_line_input(text));
    }

    /// Removes the last user-perceived character.
    pub fn backspace(&mut self) {
        if let Some((index, _)) = self.text.grapheme_indices(true).next_back() {
            self.text.truncate(index);
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Returns the current text and leaves the field empty.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    /// Terminal columns occupied by the text.
    pub fn display_width(&self) -> usize {
        self.text.width()
    }
}
