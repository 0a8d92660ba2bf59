//! # nerprep
//!
//! Prepare character-span NER corpora for span-based model training.
//!
//! Input is JSONL: one document per line with an `id`, the full text under
//! `sentences`, and `ners` as `[start_char, end_char, type]` triples
//! (character offsets, end exclusive). Output is one record per sentence
//! that retains at least one entity after remapping: the sentence's tokens,
//! its entities as token-index spans, and the adjacent sentences' tokens as
//! unlabeled context (`ltokens`/`rtokens`). A corpus run also produces the
//! entity-type registry and a validation/training split of the document list.
//!
//! ```rust
//! use nerprep::convert::convert_document;
//! use nerprep::RawDocument;
//!
//! let doc: RawDocument = serde_json::from_str(
//!     r#"{"id": 1, "sentences": "John lives in Paris.", "ners": [[0, 4, "PER"], [14, 19, "LOC"]]}"#,
//! ).unwrap();
//!
//! let out = convert_document(&doc);
//! let record = &out.examples[0];
//! assert_eq!(record.tokens, ["John", "lives", "in", "Paris", "."]);
//! assert_eq!(record.entities[0].start, 0);
//! assert_eq!(record.entities[0].end, 1);
//! ```
//!
//! ## Pipeline
//!
//! 1. [`segment`]: UAX #29 sentence split, word tokenization with PTB-style
//!    double-quote normalization.
//! 2. [`offset`] + [`align`]: character→byte translation, then a forward-
//!    search byte→token-index map per sentence (with the quote fallback for
//!    tokens the normalization rewrote).
//! 3. [`convert`]: entity remapping, context tokens, document partitioning,
//!    JSONL in / JSON artifacts out.
//!
//! ## Failure model
//!
//! The converter is best-effort on content and strict on input: unlocatable
//! sentences, empty tokenizations and unmappable entity spans are skipped and
//! reported as [`align::Skip`] values in the result; a malformed input line
//! or an unreadable file aborts the run with an [`Error`].

#![warn(missing_docs)]

pub mod align;
pub mod convert;
mod error;
pub mod offset;
pub mod record;
pub mod segment;

pub use convert::{convert_corpus, convert_document, ConvertedCorpus, DEFAULT_VAL_FRAC};
pub use error::{Error, Result};
pub use record::{RawDocument, TrainingExample, TypeRegistry};
