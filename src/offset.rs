//! Character→byte offset translation.
//!
//! The input annotations count **characters** (what annotation tools and
//! humans count); Rust string APIs count **bytes**. For Cyrillic text the two
//! disagree from the first letter on, so every entity span has to be
//! translated before any substring or search operation can use it.
//!
//! ```text
//! Text:  "Мы в NYC"
//! Chars:  М  ы     в     N  Y  C        char offsets 0..8
//! Bytes:  0-1 2-3 4 5-6 7 8  9  10      М/ы/в are 2 bytes each
//! ```
//!
//! [`CharIndex`] is built once per document and answers "byte offset of
//! character `i`" in O(1), since every entity of a document needs the lookup.

/// Precomputed character-offset → byte-offset table for one text.
#[derive(Debug, Clone)]
pub struct CharIndex {
    /// Byte offset of each character, plus a final entry holding the text
    /// length so the usual exclusive end offset resolves too.
    byte_of_char: Vec<usize>,
}

impl CharIndex {
    /// Index a text.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut byte_of_char: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        byte_of_char.push(text.len());
        Self { byte_of_char }
    }

    /// Number of characters in the indexed text.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.byte_of_char.len() - 1
    }

    /// Byte offset of the character at `char_idx`.
    ///
    /// `char_idx == char_count()` resolves to the text length (an exclusive
    /// end offset); anything past that is `None`.
    #[must_use]
    pub fn byte(&self, char_idx: usize) -> Option<usize> {
        self.byte_of_char.get(char_idx).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_identity() {
        let idx = CharIndex::new("John lives");
        assert_eq!(idx.char_count(), 10);
        for i in 0..=10 {
            assert_eq!(idx.byte(i), Some(i));
        }
        assert_eq!(idx.byte(11), None);
    }

    #[test]
    fn cyrillic_chars_are_two_bytes() {
        let text = "Мы в NYC";
        let idx = CharIndex::new(text);
        assert_eq!(idx.char_count(), 8);
        assert_eq!(idx.byte(0), Some(0)); // М
        assert_eq!(idx.byte(1), Some(2)); // ы
        assert_eq!(idx.byte(2), Some(4)); // space
        assert_eq!(idx.byte(5), Some(8)); // N
        assert_eq!(idx.byte(8), Some(text.len()));
        assert_eq!(&text[idx.byte(5).unwrap()..idx.byte(8).unwrap()], "NYC");
    }

    #[test]
    fn astral_plane_chars() {
        let text = "a🌍b";
        let idx = CharIndex::new(text);
        assert_eq!(idx.char_count(), 3);
        assert_eq!(idx.byte(1), Some(1));
        assert_eq!(idx.byte(2), Some(5)); // emoji is 4 bytes
    }

    #[test]
    fn empty_text() {
        let idx = CharIndex::new("");
        assert_eq!(idx.char_count(), 0);
        assert_eq!(idx.byte(0), Some(0));
        assert_eq!(idx.byte(1), None);
    }
}
