//! Sentence segmentation and word tokenization.
//!
//! Sentences come from UAX #29 sentence boundaries (locale-aware enough for
//! news-style prose, and what the rest of the ecosystem standardizes on).
//! Segments are trimmed, so a sentence is generally *findable* in the source
//! text but not at a statically known offset — the caller re-locates it with
//! a forward search (see [`crate::convert`]).
//!
//! Word tokens are alphanumeric runs (keeping word-internal hyphens and
//! apostrophes) plus one token per punctuation character, with one deliberate
//! exception: double quotes are normalized to the Penn Treebank markers
//! `` `` `` (opening) and `''` (closing). Those markers do not occur in the
//! source text, which is exactly the case the alignment fallback in
//! [`crate::align`] exists for.

use unicode_segmentation::UnicodeSegmentation;

/// Opening double-quote marker (Penn Treebank convention).
pub const OPEN_QUOTE: &str = "``";

/// Closing double-quote marker (Penn Treebank convention).
pub const CLOSE_QUOTE: &str = "''";

/// Quote characters that always open: `“`, `«`, `„`.
const OPENING_QUOTES: &[char] = &['\u{201C}', '\u{00AB}', '\u{201E}'];

/// Quote characters that always close: `”`, `»`.
const CLOSING_QUOTES: &[char] = &['\u{201D}', '\u{00BB}'];

/// Split a document into trimmed, non-empty sentence strings, in order.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split_sentence_bounds()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Word-tokenize one sentence.
///
/// Returns plain strings, not offsets: downstream alignment re-locates every
/// token in the source text, because normalized quote tokens have no source
/// offset to begin with.
#[must_use]
pub fn word_tokenize(sentence: &str) -> Vec<String> {
    let chars: Vec<char> = sentence.chars().collect();
    let mut tokens = Vec::new();
    let mut word = String::new();
    let mut prev: Option<char> = None;

    for (i, &c) in chars.iter().enumerate() {
        let next_alnum = chars.get(i + 1).is_some_and(|n| n.is_alphanumeric());
        if c.is_alphanumeric() {
            word.push(c);
        } else if (c == '-' || c == '\'') && !word.is_empty() && next_alnum {
            // Word-internal hyphen or apostrophe: "Санкт-Петербург", "o'clock".
            word.push(c);
        } else {
            if !word.is_empty() {
                tokens.push(std::mem::take(&mut word));
            }
            if !c.is_whitespace() {
                tokens.push(quote_normalize(c, prev));
            }
        }
        prev = Some(c);
    }
    if !word.is_empty() {
        tokens.push(word);
    }
    tokens
}

/// Map a punctuation character to its token text, normalizing double quotes
/// to the PTB markers. A plain `"` opens after whitespace (or at the start)
/// and closes otherwise; typographic quotes carry their own direction.
fn quote_normalize(c: char, prev: Option<char>) -> String {
    if OPENING_QUOTES.contains(&c) {
        OPEN_QUOTE.to_string()
    } else if CLOSING_QUOTES.contains(&c) {
        CLOSE_QUOTE.to_string()
    } else if c == '"' {
        let opens = prev.map_or(true, |p| p.is_whitespace() || p == '(' || p == '[');
        if opens { OPEN_QUOTE.to_string() } else { CLOSE_QUOTE.to_string() }
    } else {
        c.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_simple_sentences() {
        let sents = split_sentences("John lives in Paris. He likes it there.");
        assert_eq!(sents, ["John lives in Paris.", "He likes it there."]);
    }

    #[test]
    fn single_sentence_document() {
        assert_eq!(split_sentences("No terminator here"), ["No terminator here"]);
    }

    #[test]
    fn whitespace_only_segments_are_dropped() {
        assert_eq!(split_sentences("  \n\t "), Vec::<&str>::new());
        assert_eq!(split_sentences(""), Vec::<&str>::new());
    }

    #[test]
    fn tokenizes_words_and_punctuation() {
        assert_eq!(
            word_tokenize("John lives in Paris."),
            ["John", "lives", "in", "Paris", "."]
        );
    }

    #[test]
    fn keeps_hyphenated_words_together() {
        assert_eq!(
            word_tokenize("Он жил в Санкт-Петербурге."),
            ["Он", "жил", "в", "Санкт-Петербурге", "."]
        );
    }

    #[test]
    fn trailing_hyphen_is_its_own_token() {
        assert_eq!(word_tokenize("pre- and post"), ["pre", "-", "and", "post"]);
    }

    #[test]
    fn normalizes_ascii_double_quotes() {
        assert_eq!(
            word_tokenize(r#"He said "hello" loudly."#),
            ["He", "said", "``", "hello", "''", "loudly", "."]
        );
    }

    #[test]
    fn normalizes_guillemets() {
        assert_eq!(word_tokenize("Он сказал «привет»."), [
            "Он", "сказал", "``", "привет", "''", "."
        ]);
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert_eq!(word_tokenize(""), Vec::<String>::new());
        assert_eq!(word_tokenize("   "), Vec::<String>::new());
    }
}
