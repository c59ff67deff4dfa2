//! Character cursor over the input text.
//!
//! A [`Cursor`] owns a read position into a borrowed `&str` and advances one
//! character at a time. The grammar engine drives it; it performs no
//! validation of its own and never fails.

/// Sentinel returned by [`Cursor::skip_white`] and [`Cursor::next`] once the
/// input is exhausted.
pub const END: char = '\0';

/// A read position into the input text.
///
/// One cursor is created per parse call and discarded afterwards; it is not
/// meant to be shared between parses.
///
/// # Examples
///
/// ```
/// use jsonlax::Cursor;
///
/// let mut cursor = Cursor::new("  abc");
/// assert_eq!(cursor.skip_white(), 'a');
/// assert_eq!(cursor.next(), 'b');
/// assert!(!cursor.at_end());
/// ```
#[derive(Debug)]
pub struct Cursor<'a> {
    text: &'a str,
    len: usize,
    pos: usize,
    mark: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the start of `text`.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            len: text.len(),
            pos: 0,
            mark: 0,
        }
    }

    fn current(&self) -> char {
        self.text[self.pos..].chars().next().unwrap_or(END)
    }

    /// Advances past whitespace and returns the current character, or [`END`]
    /// if the input is exhausted. Does not advance past a non-whitespace
    /// character.
    pub fn skip_white(&mut self) -> char {
        while let Some(c) = self.text[self.pos..].chars().next() {
            if !c.is_whitespace() {
                return c;
            }
            self.pos += c.len_utf8();
        }
        END
    }

    /// Advances one character and returns the new current character, or
    /// [`END`] if the input is exhausted.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> char {
        if let Some(c) = self.text[self.pos..].chars().next() {
            self.pos += c.len_utf8();
        }
        self.current()
    }

    /// Whether the read position is past the last character.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.pos >= self.len
    }

    /// Whether the text immediately after the current character starts with
    /// `prefix`. Does not advance.
    #[must_use]
    pub fn follows(&self, prefix: &str) -> bool {
        let mut chars = self.text[self.pos..].chars();
        chars.next().is_some() && chars.as_str().starts_with(prefix)
    }

    /// Records the current position for a later [`Cursor::marked`] extraction.
    pub fn mark(&mut self) {
        self.mark = self.pos;
    }

    /// Returns the raw text between the mark and the current position.
    ///
    /// Degrades to the remainder of the input when the current position is
    /// past the end, and to the empty string when the mark itself is.
    #[must_use]
    pub fn marked(&self) -> &'a str {
        if self.mark >= self.len {
            return "";
        }
        if self.pos < self.len {
            &self.text[self.mark..self.pos]
        } else {
            &self.text[self.mark..]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cursor, END};

    #[test]
    fn skip_white_stops_at_content() {
        let mut cursor = Cursor::new(" \t\n x");
        assert_eq!(cursor.skip_white(), 'x');
        // Idempotent: still on the same character.
        assert_eq!(cursor.skip_white(), 'x');
    }

    #[test]
    fn skip_white_on_blank_input_returns_sentinel() {
        let mut cursor = Cursor::new("   ");
        assert_eq!(cursor.skip_white(), END);
        assert!(cursor.at_end());
    }

    #[test]
    fn next_walks_characters_then_yields_sentinel() {
        let mut cursor = Cursor::new("ab");
        assert_eq!(cursor.next(), 'b');
        assert_eq!(cursor.next(), END);
        assert!(cursor.at_end());
        assert_eq!(cursor.next(), END);
    }

    #[test]
    fn next_handles_multibyte_characters() {
        let mut cursor = Cursor::new("é1");
        assert_eq!(cursor.next(), '1');
        assert_eq!(cursor.next(), END);
    }

    #[test]
    fn follows_looks_past_the_current_character() {
        let mut cursor = Cursor::new("abc");
        assert!(cursor.follows("bc"));
        assert!(!cursor.follows("ab"));
        cursor.next();
        assert!(cursor.follows("c"));
        cursor.next();
        assert!(!cursor.follows("c"));
    }

    #[test]
    fn marked_extracts_the_spanned_text() {
        let mut cursor = Cursor::new("abcdef");
        cursor.next();
        cursor.mark();
        cursor.next();
        cursor.next();
        assert_eq!(cursor.marked(), "bc");
    }

    #[test]
    fn marked_clamps_to_the_remainder_at_end() {
        let mut cursor = Cursor::new("ab");
        cursor.mark();
        cursor.next();
        cursor.next();
        assert_eq!(cursor.marked(), "ab");
    }

    #[test]
    fn marked_is_empty_when_the_mark_is_past_the_end() {
        let mut cursor = Cursor::new("ab");
        cursor.next();
        cursor.next();
        cursor.mark();
        assert_eq!(cursor.marked(), "");
    }
}
