//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;
use recipe_search::config::{IndexSettings, Settings};
use recipe_search::context::AppContext;
use recipe_search::progress::{IndexProgressEvent, IndexProgressReporter};
use recipe_search_core::embedding::{Embedder, EMBEDDING_DIMS};
use recipe_search_core::store::memory::InMemoryCatalog;

/// Bag-of-words embedder: each lowercase word bumps one hashed bucket.
///
/// Texts sharing words get positive cosine similarity; texts with no
/// words in common score zero.
pub struct HashingEmbedder {
    calls: AtomicUsize,
    fail_on_call: Option<usize>,
    dims: usize,
}

impl HashingEmbedder {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on_call: None,
            dims: EMBEDDING_DIMS,
        }
    }

    /// Fail the `n`th call (1-based) with a simulated remote error.
    pub fn failing_on(n: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on_call: Some(n),
            dims: EMBEDDING_DIMS,
        }
    }

    /// Claim a different output dimensionality.
    pub fn with_dims(dims: usize) -> Self {
        Self {
            dims,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn hash_embed(text: &str) -> Vec<f32> {
    let mut v = vec![0.0f32; EMBEDDING_DIMS];
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let mut h = DefaultHasher::new();
        word.to_lowercase().hash(&mut h);
        v[(h.finish() % EMBEDDING_DIMS as u64) as usize] += 1.0;
    }
    v
}

#[async_trait]
impl Embedder for HashingEmbedder {
    fn model_name(&self) -> &str {
        "hashing-test"
    }

    fn dims(&self) -> usize {
        self.dims
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_call == Some(n) {
            bail!("OpenAI API error 429 Too Many Requests: rate limited");
        }
        Ok(hash_embed(text))
    }
}

/// Collects every progress event.
#[derive(Default)]
pub struct RecordingProgress {
    pub events: Mutex<Vec<IndexProgressEvent>>,
}

impl IndexProgressReporter for RecordingProgress {
    fn report(&self, event: IndexProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl RecordingProgress {
    pub fn indexed_ids(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                IndexProgressEvent::Indexing { id, .. } => Some(id.clone()),
                IndexProgressEvent::Done { .. } => None,
            })
            .collect()
    }

    pub fn finished(&self) -> bool {
        self.events
            .lock()
            .unwrap()
            .iter()
            .any(|e| matches!(e, IndexProgressEvent::Done { .. }))
    }
}

pub fn test_settings() -> Settings {
    Settings {
        index: IndexSettings {
            ready_poll_ms: 1,
            ready_timeout_secs: 1,
            ..IndexSettings::default()
        },
        ..Settings::default()
    }
}

/// An [`AppContext`] over in-memory doubles, plus handles to inspect them.
pub fn memory_context(
    embedder: HashingEmbedder,
) -> (AppContext, Arc<HashingEmbedder>, Arc<InMemoryCatalog>) {
    let embedder = Arc::new(embedder);
    let catalog = Arc::new(InMemoryCatalog::new());
    let ctx = AppContext::new(test_settings(), embedder.clone(), catalog.clone());
    (ctx, embedder, catalog)
}
