//! Vector index abstraction for recipe-search.
//!
//! The hosted vector database is split along its own seam:
//!
//! | Trait | Plane | Operations |
//! |-------|-------|------------|
//! | [`IndexCatalog`] | control | list, describe, create, open a handle |
//! | [`VectorIndex`] | data | upsert one record, query by vector |
//!
//! Production code talks to Pinecone through these traits; tests and
//! offline runs use the [`memory`] backend.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{IndexRecord, QueryMatch};

/// Similarity metric an index is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Cosine,
    Euclidean,
    Dotproduct,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Metric::Cosine => "cosine",
            Metric::Euclidean => "euclidean",
            Metric::Dotproduct => "dotproduct",
        };
        f.write_str(s)
    }
}

/// The metric every recipe index uses.
pub const INDEX_METRIC: Metric = Metric::Cosine;

/// Serverless placement: no capacity provisioning, scoped to a cloud region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerlessSpec {
    pub cloud: String,
    pub region: String,
}

/// Deployment section of an index creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentSpec {
    pub serverless: ServerlessSpec,
}

/// Everything needed to create an index.
///
/// Serializes to the body of the control plane's `POST /indexes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexSpec {
    pub name: String,
    pub dimension: usize,
    pub metric: Metric,
    pub spec: DeploymentSpec,
}

impl IndexSpec {
    pub fn serverless(
        name: impl Into<String>,
        dimension: usize,
        metric: Metric,
        cloud: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            dimension,
            metric,
            spec: DeploymentSpec {
                serverless: ServerlessSpec {
                    cloud: cloud.into(),
                    region: region.into(),
                },
            },
        }
    }
}

/// An index as reported by the control plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDescription {
    pub name: String,
    pub dimension: usize,
    pub metric: Metric,
    /// Data-plane host serving upsert and query for this index.
    pub host: String,
    /// Whether the index accepts data-plane traffic yet.
    pub ready: bool,
}

/// Data-plane handle to one index.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Index name this handle writes to.
    fn name(&self) -> &str;

    /// Insert `record`, or fully replace the record with the same id.
    async fn upsert(&self, record: &IndexRecord) -> Result<()>;

    /// Return up to `top_k` nearest records with metadata, ordered by
    /// non-increasing score.
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<QueryMatch>>;
}

/// Control-plane access to the vector database.
#[async_trait]
pub trait IndexCatalog: Send + Sync {
    /// List every index in the project.
    async fn list_indexes(&self) -> Result<Vec<IndexDescription>>;

    /// Fetch the current state of one index.
    async fn describe_index(&self, name: &str) -> Result<IndexDescription>;

    /// Create an index. Fails if one with the same name exists.
    async fn create_index(&self, spec: &IndexSpec) -> Result<IndexDescription>;

    /// Build a data-plane handle for a described index.
    fn open(&self, index: &IndexDescription) -> Result<Arc<dyn VectorIndex>>;
}
