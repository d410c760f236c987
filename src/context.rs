//! Explicitly constructed process context.
//!
//! Holds settings and the two remote clients. Commands receive a
//! `&AppContext`; tests build one from in-memory doubles with
//! [`AppContext::new`].

use std::sync::Arc;

use anyhow::{bail, Result};
use recipe_search_core::embedding::{Embedder, EMBEDDING_DIMS};
use recipe_search_core::store::{IndexCatalog, VectorIndex};

use crate::config::{Secrets, Settings};
use crate::embedding::OpenAiEmbedder;
use crate::index::ensure_index;
use crate::pinecone::PineconeCatalog;

pub struct AppContext {
    pub settings: Settings,
    pub embedder: Arc<dyn Embedder>,
    pub catalog: Arc<dyn IndexCatalog>,
}

impl AppContext {
    pub fn new(
        settings: Settings,
        embedder: Arc<dyn Embedder>,
        catalog: Arc<dyn IndexCatalog>,
    ) -> Self {
        Self {
            settings,
            embedder,
            catalog,
        }
    }

    /// Build the hosted OpenAI and Pinecone clients.
    pub fn connect(settings: Settings, secrets: &Secrets) -> Result<Self> {
        let embedder = OpenAiEmbedder::new(&settings.embedding, secrets.openai_api_key.clone())?;
        let catalog = PineconeCatalog::new(&settings.index, secrets.pinecone_api_key.clone())?;
        Ok(Self::new(settings, Arc::new(embedder), Arc::new(catalog)))
    }

    /// Find or create the configured index and return a handle to it.
    ///
    /// The embedder must produce vectors of the index dimension; a mismatch
    /// fails before the catalog is contacted.
    pub async fn open_index(&self) -> Result<Arc<dyn VectorIndex>> {
        if self.embedder.dims() != EMBEDDING_DIMS {
            bail!(
                "embedding model '{}' produces {}-dimensional vectors, index requires {}",
                self.embedder.model_name(),
                self.embedder.dims(),
                EMBEDDING_DIMS
            );
        }
        ensure_index(self.catalog.as_ref(), &self.settings.index).await
    }
}
