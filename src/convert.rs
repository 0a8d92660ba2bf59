//! The document → training-record transformation, corpus partitioning, and
//! artifact I/O.
//!
//! One document goes through [`convert_document`]: sentence split, per-
//! sentence token alignment, entity remapping, context-token attachment.
//! [`convert_corpus`] partitions the document list (validation prefix,
//! training suffix), runs every document, and merges the per-document
//! accumulators — observed entity types and skip diagnostics travel in the
//! return values, never in shared state.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::align::{Skip, SkipReason, TokenMap};
use crate::error::{Error, Result};
use crate::offset::CharIndex;
use crate::record::{CharEntity, RawDocument, TokenEntity, TrainingExample, TypeRegistry};
use crate::segment::{split_sentences, word_tokenize};

/// Default fraction of documents held out as the validation prefix.
pub const DEFAULT_VAL_FRAC: f64 = 0.1;

// =============================================================================
// Per-document conversion
// =============================================================================

/// Everything one document conversion produced.
#[derive(Debug, Default)]
pub struct DocumentOutput {
    /// One record per sentence that kept at least one entity.
    pub examples: Vec<TrainingExample>,
    /// Entity type labels observed in the emitted records.
    pub types: BTreeSet<String>,
    /// Sentences and entities this document lost, with reasons.
    pub skips: Vec<Skip>,
}

/// How one entity relates to the sentence currently being processed.
enum Remap {
    /// Not contained in this sentence; no diagnostic, another sentence may
    /// claim it (or it straddles a boundary and silently dies everywhere).
    Outside,
    /// Contained and both ends resolved to tokens.
    Mapped(TokenEntity),
    /// Contained, but at least one end fell on a byte no token covers.
    Unmapped,
}

/// Convert one raw document into zero or more sentence-level records.
///
/// Each output record covers exactly one sentence; entities whose character
/// spans cross a sentence boundary are dropped, sentences that end up with no
/// valid entity produce no record. The search cursor over the document text
/// only ever moves forward, so repeated sentence texts resolve in order.
#[must_use]
pub fn convert_document(doc: &RawDocument) -> DocumentOutput {
    let text = doc.sentences.as_str();
    let doc_id = doc.id.to_string();
    let mut out = DocumentOutput::default();

    let chars = CharIndex::new(text);
    let sentences = split_sentences(text);
    // Tokenized up front: sentence i's tokens double as ltokens/rtokens of
    // its neighbors.
    let tokenized: Vec<Vec<String>> = sentences.iter().map(|s| word_tokenize(s)).collect();

    // Entity char spans resolved to byte spans (first byte, last char's first
    // byte) once per document. Spans past the end of the text are dead on
    // arrival and reported exactly once.
    let byte_spans: Vec<Option<(usize, usize)>> = doc
        .ners
        .iter()
        .map(|e| {
            let span = (e.end > e.start)
                .then(|| Some((chars.byte(e.start)?, chars.byte(e.end - 1)?)))
                .flatten();
            if span.is_none() {
                log::warn!(
                    "doc {doc_id}: entity {:?} [{}, {}) outside document text, dropped",
                    e.label,
                    e.start,
                    e.end
                );
                out.skips.push(Skip {
                    doc_id: doc_id.clone(),
                    sentence: None,
                    reason: SkipReason::UnmappedEntity {
                        label: e.label.clone(),
                        start: e.start,
                        end: e.end,
                    },
                });
            }
            span
        })
        .collect();

    let mut cursor = 0usize;
    for (i, sentence) in sentences.iter().enumerate() {
        let tokens = &tokenized[i];
        if tokens.is_empty() {
            log::warn!("doc {doc_id}: sentence {i} tokenized to nothing, skipping");
            out.skips.push(Skip {
                doc_id: doc_id.clone(),
                sentence: Some(i),
                reason: SkipReason::EmptyTokenization,
            });
            continue;
        }

        let Some(rel) = text.get(cursor..).and_then(|rest| rest.find(sentence)) else {
            log::warn!("doc {doc_id}: sentence {i} not found after byte {cursor}, skipping");
            out.skips.push(Skip {
                doc_id: doc_id.clone(),
                sentence: Some(i),
                reason: SkipReason::SentenceNotFound,
            });
            continue;
        };
        let sent_start = cursor + rel;
        let sent_end = sent_start + sentence.len();

        let map = TokenMap::build(text, sent_start, tokens);

        let mut entities = Vec::new();
        for (entity, byte_span) in doc.ners.iter().zip(&byte_spans) {
            let Some(span) = *byte_span else { continue };
            match remap_entity(entity, span, sent_start, sent_end, &map) {
                Remap::Outside => {}
                Remap::Mapped(mapped) => {
                    out.types.insert(mapped.label.clone());
                    entities.push(mapped);
                }
                Remap::Unmapped => {
                    log::debug!(
                        "doc {doc_id}: entity {:?} [{}, {}) in sentence {i} has no token \
                         coverage, dropped",
                        entity.label,
                        entity.start,
                        entity.end
                    );
                    out.skips.push(Skip {
                        doc_id: doc_id.clone(),
                        sentence: Some(i),
                        reason: SkipReason::UnmappedEntity {
                            label: entity.label.clone(),
                            start: entity.start,
                            end: entity.end,
                        },
                    });
                }
            }
        }

        if !entities.is_empty() {
            let ltokens = if i > 0 { tokenized[i - 1].clone() } else { Vec::new() };
            let rtokens = tokenized.get(i + 1).cloned().unwrap_or_default();
            out.examples.push(TrainingExample {
                tokens: tokens.clone(),
                entities,
                relations: Vec::new(),
                orig_id: doc_id.clone(),
                ltokens,
                rtokens,
            });
        }

        cursor = sent_end;
    }

    out
}

/// Resolve one entity against the current sentence.
///
/// `span` is the entity's (first byte, last character's first byte) pair; the
/// exclusive character end has already been turned into the inclusive last
/// character, so a successful lookup converts back with `+ 1`.
fn remap_entity(
    entity: &CharEntity,
    (first, last): (usize, usize),
    sent_start: usize,
    sent_end: usize,
    map: &TokenMap,
) -> Remap {
    if first < sent_start || last >= sent_end {
        return Remap::Outside;
    }
    match (map.token_at(first), map.token_at(last)) {
        (Some(start), Some(end)) => Remap::Mapped(TokenEntity {
            label: entity.label.clone(),
            start,
            end: end + 1,
        }),
        _ => Remap::Unmapped,
    }
}

// =============================================================================
// Corpus-level conversion
// =============================================================================

/// The full conversion result: both partitions, the type registry, and every
/// skip diagnostic collected along the way.
#[derive(Debug, Default)]
pub struct ConvertedCorpus {
    /// Records from the validation prefix of the document list.
    pub validation: Vec<TrainingExample>,
    /// Records from the training suffix.
    pub training: Vec<TrainingExample>,
    /// Every entity type observed in either partition.
    pub types: TypeRegistry,
    /// Skipped sentences and dropped entities, in processing order.
    pub skips: Vec<Skip>,
}

/// Partition documents into `(validation, training)`.
///
/// Validation is the first `floor(frac * len)` documents, training the rest;
/// the split happens before sentence expansion, so whole documents land on
/// one side or the other.
#[must_use]
pub fn split_corpus(mut docs: Vec<RawDocument>, frac: f64) -> (Vec<RawDocument>, Vec<RawDocument>) {
    let take = ((docs.len() as f64) * frac).floor() as usize;
    let take = take.min(docs.len());
    let training = docs.split_off(take);
    (docs, training)
}

/// Convert a whole corpus: partition, transform every document, merge.
#[must_use]
pub fn convert_corpus(docs: Vec<RawDocument>, frac: f64) -> ConvertedCorpus {
    let total = docs.len();
    let (val_docs, train_docs) = split_corpus(docs, frac);

    let mut labels = BTreeSet::new();
    let mut skips = Vec::new();
    let validation = convert_partition(&val_docs, &mut labels, &mut skips);
    let training = convert_partition(&train_docs, &mut labels, &mut skips);

    log::info!(
        "converted {total} documents into {} validation + {} training records \
         ({} entity types, {} skips)",
        validation.len(),
        training.len(),
        labels.len(),
        skips.len()
    );

    ConvertedCorpus {
        validation,
        training,
        types: TypeRegistry::from_labels(labels),
        skips,
    }
}

fn convert_partition(
    docs: &[RawDocument],
    labels: &mut BTreeSet<String>,
    skips: &mut Vec<Skip>,
) -> Vec<TrainingExample> {
    let mut examples = Vec::new();
    for doc in docs {
        let DocumentOutput {
            examples: mut doc_examples,
            types,
            skips: mut doc_skips,
        } = convert_document(doc);
        labels.extend(types);
        skips.append(&mut doc_skips);
        examples.append(&mut doc_examples);
    }
    examples
}

// =============================================================================
// Artifact I/O
// =============================================================================

/// Read a JSONL corpus: one document per non-empty line.
///
/// Unlike the per-sentence best-effort conversion, reading is strict — a
/// malformed line is a fatal [`Error::Parse`].
pub fn read_corpus(path: impl AsRef<Path>) -> Result<Vec<RawDocument>> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);

    let mut docs = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let doc = serde_json::from_str(trimmed).map_err(|source| Error::Parse {
            line: idx + 1,
            source,
        })?;
        docs.push(doc);
    }
    log::info!("read {} documents from {}", docs.len(), path.as_ref().display());
    Ok(docs)
}

/// Write the three derived artifacts into `dir`:
/// `<prefix>_val.json` and `<prefix>_train.json` (compact) and
/// `<prefix>_types.json` (pretty-printed).
pub fn write_artifacts(corpus: &ConvertedCorpus, dir: impl AsRef<Path>, prefix: &str) -> Result<()> {
    let dir = dir.as_ref();
    write_json(&dir.join(format!("{prefix}_val.json")), &corpus.validation, false)?;
    write_json(&dir.join(format!("{prefix}_train.json")), &corpus.training, false)?;
    write_json(&dir.join(format!("{prefix}_types.json")), &corpus.types, true)?;
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    if pretty {
        serde_json::to_writer_pretty(&mut file, value)?;
    } else {
        serde_json::to_writer(&mut file, value)?;
    }
    file.flush()?;
    Ok(())
}
