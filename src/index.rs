//! Index lifecycle: find or create the recipe index and open a handle.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use recipe_search_core::embedding::EMBEDDING_DIMS;
use recipe_search_core::store::{
    IndexCatalog, IndexDescription, IndexSpec, VectorIndex, INDEX_METRIC,
};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::IndexSettings;

/// The creation request for the configured index.
///
/// Dimension and metric are fixed; only name and placement come from
/// settings.
pub fn index_spec(settings: &IndexSettings) -> IndexSpec {
    IndexSpec::serverless(
        settings.name.clone(),
        EMBEDDING_DIMS,
        INDEX_METRIC,
        settings.cloud.clone(),
        settings.region.clone(),
    )
}

/// Return a handle to the configured index, creating it if absent.
///
/// Lists indexes first; an existing index with the configured name is
/// reused after checking that its dimension and metric match what the
/// embedder produces. Otherwise the index is created and polled until the
/// control plane reports it ready. Calling this again after a successful
/// run performs no creation.
pub async fn ensure_index(
    catalog: &dyn IndexCatalog,
    settings: &IndexSettings,
) -> Result<Arc<dyn VectorIndex>> {
    let existing = catalog
        .list_indexes()
        .await?
        .into_iter()
        .find(|i| i.name == settings.name);

    let description = match existing {
        Some(desc) => {
            info!(index = %desc.name, "using existing index");
            check_compatible(&desc)?;
            wait_until_ready(catalog, desc, settings).await?
        }
        None => {
            let spec = index_spec(settings);
            info!(
                index = %spec.name,
                dimension = spec.dimension,
                metric = %spec.metric,
                cloud = %settings.cloud,
                region = %settings.region,
                "creating index"
            );
            let created = catalog.create_index(&spec).await?;
            wait_until_ready(catalog, created, settings).await?
        }
    };

    catalog.open(&description)
}

fn check_compatible(desc: &IndexDescription) -> Result<()> {
    if desc.dimension != EMBEDDING_DIMS {
        bail!(
            "index '{}' has dimension {}, but embeddings have dimension {}",
            desc.name,
            desc.dimension,
            EMBEDDING_DIMS
        );
    }
    if desc.metric != INDEX_METRIC {
        bail!(
            "index '{}' uses metric '{}', expected '{}'",
            desc.name,
            desc.metric,
            INDEX_METRIC
        );
    }
    Ok(())
}

async fn wait_until_ready(
    catalog: &dyn IndexCatalog,
    mut desc: IndexDescription,
    settings: &IndexSettings,
) -> Result<IndexDescription> {
    let deadline = Instant::now() + Duration::from_secs(settings.ready_timeout_secs);
    let poll = Duration::from_millis(settings.ready_poll_ms);

    while !(desc.ready && !desc.host.is_empty()) {
        if Instant::now() >= deadline {
            bail!(
                "index '{}' not ready after {}s",
                desc.name,
                settings.ready_timeout_secs
            );
        }
        debug!(index = %desc.name, "index not ready yet");
        tokio::time::sleep(poll).await;
        desc = catalog.describe_index(&desc.name).await?;
    }

    Ok(desc)
}
