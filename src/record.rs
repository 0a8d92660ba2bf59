//! Serde data model for the converter.
//!
//! Input side: one JSON object per line carrying the full document text and
//! character-span entity annotations. Output side: SpERT-style sentence
//! records with token-indexed entities, plus the corpus-wide entity-type
//! registry.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Input records
// =============================================================================

/// Document identifier as it appears in the source data: string or number.
///
/// Whatever form it arrives in, it leaves the converter as a string
/// (`orig_id` in [`TrainingExample`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocId {
    /// Numeric id.
    Num(i64),
    /// String id.
    Str(String),
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocId::Num(n) => write!(f, "{}", n),
            DocId::Str(s) => f.write_str(s),
        }
    }
}

/// A character-span entity annotation, serialized as `[start, end, type]`.
///
/// `start` and `end` are zero-based **character** (not byte) offsets into the
/// document text; `start` inclusive, `end` exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(usize, usize, String)", into = "(usize, usize, String)")]
pub struct CharEntity {
    /// First character of the span.
    pub start: usize,
    /// One past the last character of the span.
    pub end: usize,
    /// Entity type label (e.g. "PER", "ORG").
    pub label: String,
}

impl From<(usize, usize, String)> for CharEntity {
    fn from((start, end, label): (usize, usize, String)) -> Self {
        Self { start, end, label }
    }
}

impl From<CharEntity> for (usize, usize, String) {
    fn from(e: CharEntity) -> Self {
        (e.start, e.end, e.label)
    }
}

/// One raw document: a full text with character-span entity annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    /// Opaque source identifier.
    pub id: DocId,
    /// The full, unsegmented document text. The field name is historical:
    /// the source format calls it `sentences` even though it is one string.
    pub sentences: String,
    /// Entity annotations with character offsets into [`Self::sentences`].
    pub ners: Vec<CharEntity>,
}

// =============================================================================
// Output records
// =============================================================================

/// An entity remapped to token indices within one sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEntity {
    /// Entity type label, unchanged from the input.
    #[serde(rename = "type")]
    pub label: String,
    /// First token of the span (inclusive).
    pub start: usize,
    /// One past the last token of the span.
    pub end: usize,
}

/// One sentence-level training record.
///
/// Emitted only for sentences that kept at least one entity after remapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    /// Tokens of this sentence.
    pub tokens: Vec<String>,
    /// Entities with token-index spans into [`Self::tokens`].
    pub entities: Vec<TokenEntity>,
    /// Always empty: this converter does not populate relations.
    pub relations: Vec<serde_json::Value>,
    /// String form of the source document id.
    pub orig_id: String,
    /// Tokens of the previous sentence (context only, unlabeled). Empty at
    /// the start of a document.
    pub ltokens: Vec<String>,
    /// Tokens of the next sentence. Empty at the end of a document.
    pub rtokens: Vec<String>,
}

// =============================================================================
// Type registry
// =============================================================================

/// Registry entry for one entity or relation type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeEntry {
    /// Short display name (same as the type label).
    pub short: String,
    /// Verbose display name (same as the type label).
    pub verbose: String,
}

/// The corpus-wide type registry artifact.
///
/// `entities` maps every observed entity type to its display names;
/// `relations` stays empty. `BTreeMap` keeps the artifact deterministic
/// across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeRegistry {
    /// Entity types observed across the whole corpus.
    pub entities: BTreeMap<String, TypeEntry>,
    /// Relation types: always empty for this converter.
    pub relations: BTreeMap<String, TypeEntry>,
}

impl TypeRegistry {
    /// Build a registry from observed entity type labels.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entities = labels
            .into_iter()
            .map(|label| {
                let label = label.into();
                let entry = TypeEntry {
                    short: label.clone(),
                    verbose: label.clone(),
                };
                (label, entry)
            })
            .collect();
        Self {
            entities,
            relations: BTreeMap::new(),
        }
    }

    /// Whether an entity type label is registered.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.entities.contains_key(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_id_display_matches_source_form() {
        assert_eq!(DocId::Num(17).to_string(), "17");
        assert_eq!(DocId::Str("doc-17".into()).to_string(), "doc-17");
    }

    #[test]
    fn raw_document_parses_tuple_entities() {
        let doc: RawDocument = serde_json::from_str(
            r#"{"id": 1, "sentences": "John lives in Paris.", "ners": [[0, 4, "PER"], [14, 19, "LOC"]]}"#,
        )
        .unwrap();
        assert_eq!(doc.id, DocId::Num(1));
        assert_eq!(doc.ners.len(), 2);
        assert_eq!(doc.ners[0].start, 0);
        assert_eq!(doc.ners[0].end, 4);
        assert_eq!(doc.ners[0].label, "PER");
    }

    #[test]
    fn raw_document_accepts_string_id() {
        let doc: RawDocument =
            serde_json::from_str(r#"{"id": "a17", "sentences": "x", "ners": []}"#).unwrap();
        assert_eq!(doc.id.to_string(), "a17");
    }

    #[test]
    fn char_entity_serializes_back_to_tuple() {
        let e = CharEntity {
            start: 3,
            end: 9,
            label: "ORG".into(),
        };
        assert_eq!(serde_json::to_string(&e).unwrap(), r#"[3,9,"ORG"]"#);
    }

    #[test]
    fn token_entity_uses_type_key() {
        let e = TokenEntity {
            label: "PER".into(),
            start: 0,
            end: 1,
        };
        assert_eq!(
            serde_json::to_string(&e).unwrap(),
            r#"{"type":"PER","start":0,"end":1}"#
        );
    }

    #[test]
    fn registry_shape_matches_artifact_format() {
        let reg = TypeRegistry::from_labels(["LOC", "PER"]);
        let json = serde_json::to_value(&reg).unwrap();
        assert_eq!(json["entities"]["PER"]["short"], "PER");
        assert_eq!(json["entities"]["PER"]["verbose"], "PER");
        assert_eq!(json["entities"]["LOC"]["short"], "LOC");
        assert!(json["relations"].as_object().unwrap().is_empty());
        assert!(reg.contains("PER"));
        assert!(!reg.contains("MISC"));
    }
}
