//! Core data models used throughout recipe-search.
//!
//! These types represent the documents, index records, and query matches
//! that flow between the corpus, the embedding client, and the vector index.

use serde::{Deserialize, Serialize};

/// A recipe document from the bundled corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub content: String,
}

impl Document {
    pub fn new(id: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
        }
    }

    /// Metadata stored alongside this document's vector.
    pub fn metadata(&self) -> RecordMetadata {
        RecordMetadata {
            title: self.title.clone(),
            content: self.content.clone(),
        }
    }
}

/// Metadata attached to every index record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// A vector plus metadata stored under a document id.
///
/// Serializes to the `{ id, values, metadata }` shape the vector
/// database's upsert endpoint expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: RecordMetadata,
}

impl IndexRecord {
    pub fn for_document(doc: &Document, values: Vec<f32>) -> Self {
        Self {
            id: doc.id.clone(),
            values,
            metadata: doc.metadata(),
        }
    }
}

/// A single nearest-neighbour match returned by a vector query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMatch {
    pub id: String,
    pub score: f32,
    #[serde(default)]
    pub metadata: Option<RecordMetadata>,
}
