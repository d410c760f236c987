//! In-memory [`IndexCatalog`] and [`VectorIndex`] implementation for
//! testing and offline runs.
//!
//! Uses `BTreeMap` behind `std::sync::RwLock` for thread safety and
//! deterministic iteration. Query is brute-force cosine similarity over
//! all stored vectors.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;

use crate::embedding::{check_dims, cosine_similarity};
use crate::models::{IndexRecord, QueryMatch};
use crate::search::rank_matches;

use super::{IndexCatalog, IndexDescription, IndexSpec, Metric, VectorIndex};

/// A single in-memory index.
pub struct InMemoryIndex {
    name: String,
    dimension: usize,
    metric: Metric,
    records: RwLock<BTreeMap<String, IndexRecord>>,
}

impl InMemoryIndex {
    pub fn new(name: impl Into<String>, dimension: usize, metric: Metric) -> Self {
        Self {
            name: name.into(),
            dimension,
            metric,
            records: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch a stored record by id.
    pub fn get(&self, id: &str) -> Option<IndexRecord> {
        self.records.read().ok()?.get(id).cloned()
    }

    fn score(&self, a: &[f32], b: &[f32]) -> f32 {
        match self.metric {
            Metric::Cosine => cosine_similarity(a, b),
            Metric::Dotproduct => a.iter().zip(b).map(|(x, y)| x * y).sum(),
            Metric::Euclidean => {
                -a.iter()
                    .zip(b)
                    .map(|(x, y)| (x - y) * (x - y))
                    .sum::<f32>()
                    .sqrt()
            }
        }
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    fn name(&self) -> &str {
        &self.name
    }

    async fn upsert(&self, record: &IndexRecord) -> Result<()> {
        check_dims(&record.values, self.dimension)?;
        let mut records = self
            .records
            .write()
            .map_err(|_| anyhow!("index '{}' lock poisoned", self.name))?;
        records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<QueryMatch>> {
        check_dims(vector, self.dimension)?;
        let records = self
            .records
            .read()
            .map_err(|_| anyhow!("index '{}' lock poisoned", self.name))?;
        let matches: Vec<QueryMatch> = records
            .values()
            .map(|r| QueryMatch {
                id: r.id.clone(),
                score: self.score(vector, &r.values),
                metadata: Some(r.metadata.clone()),
            })
            .collect();
        Ok(rank_matches(matches, top_k))
    }
}

/// In-memory control plane holding any number of [`InMemoryIndex`]es.
///
/// Counts creation calls so callers can verify idempotent setup.
pub struct InMemoryCatalog {
    indexes: RwLock<HashMap<String, (IndexDescription, Arc<InMemoryIndex>)>>,
    create_calls: AtomicUsize,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            indexes: RwLock::new(HashMap::new()),
            create_calls: AtomicUsize::new(0),
        }
    }

    /// Number of [`create_index`](IndexCatalog::create_index) calls made so far.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Direct access to an index's storage, bypassing the trait.
    pub fn index(&self, name: &str) -> Option<Arc<InMemoryIndex>> {
        self.indexes
            .read()
            .ok()?
            .get(name)
            .map(|(_, idx)| Arc::clone(idx))
    }

    /// Register a pre-existing index, as if created by an earlier run.
    pub fn insert_existing(&self, description: IndexDescription) -> Result<()> {
        let index = Arc::new(InMemoryIndex::new(
            description.name.clone(),
            description.dimension,
            description.metric,
        ));
        self.indexes
            .write()
            .map_err(|_| anyhow!("catalog lock poisoned"))?
            .insert(description.name.clone(), (description, index));
        Ok(())
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IndexCatalog for InMemoryCatalog {
    async fn list_indexes(&self) -> Result<Vec<IndexDescription>> {
        let indexes = self
            .indexes
            .read()
            .map_err(|_| anyhow!("catalog lock poisoned"))?;
        let mut out: Vec<IndexDescription> = indexes.values().map(|(d, _)| d.clone()).collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn describe_index(&self, name: &str) -> Result<IndexDescription> {
        let indexes = self
            .indexes
            .read()
            .map_err(|_| anyhow!("catalog lock poisoned"))?;
        indexes
            .get(name)
            .map(|(d, _)| d.clone())
            .ok_or_else(|| anyhow!("index '{}' not found", name))
    }

    async fn create_index(&self, spec: &IndexSpec) -> Result<IndexDescription> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let mut indexes = self
            .indexes
            .write()
            .map_err(|_| anyhow!("catalog lock poisoned"))?;
        if indexes.contains_key(&spec.name) {
            bail!("index '{}' already exists", spec.name);
        }
        let description = IndexDescription {
            name: spec.name.clone(),
            dimension: spec.dimension,
            metric: spec.metric,
            host: format!("memory://{}", spec.name),
            ready: true,
        };
        let index = Arc::new(InMemoryIndex::new(
            spec.name.clone(),
            spec.dimension,
            spec.metric,
        ));
        indexes.insert(spec.name.clone(), (description.clone(), index));
        Ok(description)
    }

    fn open(&self, index: &IndexDescription) -> Result<Arc<dyn VectorIndex>> {
        let handle = self
            .index(&index.name)
            .ok_or_else(|| anyhow!("index '{}' not found", index.name))?;
        Ok(handle)
    }
}
