//! Byte-offset → token-index alignment.
//!
//! The tokenizer returns plain token strings; this module pins each token
//! back onto the source text by scanning forward from the sentence start and
//! records, for every byte a token covers, which token index covers it.
//! Entity byte offsets are then resolved against that map.
//!
//! Tokens that do not literally occur in the text — the normalized quote
//! markers from [`crate::segment`] — are anchored by a fallback: skip
//! whitespace at the cursor and claim whatever single character sits there.
//!
//! Nothing in here fails the run. Anything that cannot be aligned is reported
//! as a [`Skip`] value by the caller and the conversion moves on.

use std::collections::HashMap;

use crate::segment::{CLOSE_QUOTE, OPEN_QUOTE};

// =============================================================================
// Skip diagnostics
// =============================================================================

/// Why a sentence or entity was left out of the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Sentence text was not found by forward search from the cursor.
    SentenceNotFound,
    /// The tokenizer produced no tokens for the sentence.
    EmptyTokenization,
    /// An entity span had no token coverage at one of its ends, or its
    /// character offsets point past the end of the document.
    UnmappedEntity {
        /// Entity type label.
        label: String,
        /// Character span start (inclusive) in the document.
        start: usize,
        /// Character span end (exclusive) in the document.
        end: usize,
    },
}

impl SkipReason {
    /// Whether this skip lost a whole sentence (as opposed to one entity).
    #[must_use]
    pub fn is_sentence(&self) -> bool {
        matches!(
            self,
            SkipReason::SentenceNotFound | SkipReason::EmptyTokenization
        )
    }
}

/// One skipped sentence or dropped entity, with enough context to report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skip {
    /// String form of the source document id.
    pub doc_id: String,
    /// Sentence index within the document, when the skip is tied to one.
    pub sentence: Option<usize>,
    /// What went wrong.
    pub reason: SkipReason,
}

// =============================================================================
// Token map
// =============================================================================

/// Byte-offset → token-index map for one located sentence.
///
/// Every byte covered by a token maps to that token's index; whitespace
/// between tokens maps to nothing, which is what makes entity spans that
/// start or end on a gap detectable (and droppable) downstream.
#[derive(Debug, Default)]
pub struct TokenMap {
    map: HashMap<usize, usize>,
}

impl TokenMap {
    /// Build the map for `tokens`, scanning `text` forward from
    /// `sentence_start` (a byte offset on a character boundary).
    ///
    /// The cursor is monotonic: each token is searched for strictly after the
    /// previous token's match, so repeated substrings resolve to the right
    /// occurrence. A token with no literal match triggers the quote fallback;
    /// if even that runs off the end of the text, mapping stops and the map
    /// stays partial.
    #[must_use]
    pub fn build<S: AsRef<str>>(text: &str, sentence_start: usize, tokens: &[S]) -> Self {
        let mut map = HashMap::new();
        let mut pos = sentence_start;

        for (index, token) in tokens.iter().enumerate() {
            let token = token.as_ref();
            let found = text
                .get(pos..)
                .and_then(|rest| rest.find(token))
                .map(|rel| (pos + rel, token.len()));

            let (start, len) = match found {
                Some(span) => span,
                None => {
                    if token != OPEN_QUOTE && token != CLOSE_QUOTE {
                        log::debug!(
                            "token {:?} (#{index}) not found after byte {pos}, anchoring",
                            token
                        );
                    }
                    match next_non_space(text, pos) {
                        Some(anchor) => anchor,
                        None => {
                            log::debug!(
                                "token {:?} (#{index}) has nothing left to anchor to, \
                                 stopping map construction",
                                token
                            );
                            break;
                        }
                    }
                }
            };

            for byte in start..start + len {
                map.insert(byte, index);
            }
            pos = start + len;
        }

        Self { map }
    }

    /// Token index covering byte offset `byte`, if any.
    #[must_use]
    pub fn token_at(&self, byte: usize) -> Option<usize> {
        self.map.get(&byte).copied()
    }

    /// Number of mapped bytes (test/diagnostic helper).
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no bytes are mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Position and byte length of the first non-whitespace character at or after
/// `pos`.
fn next_non_space(text: &str, pos: usize) -> Option<(usize, usize)> {
    text.get(pos..)?
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(rel, c)| (pos + rel, c.len_utf8()))
}
