//! Corpus indexing: embed each document and upsert it.

use anyhow::Result;
use recipe_search_core::models::{Document, IndexRecord};
use recipe_search_core::store::VectorIndex;
use tracing::info;

use crate::context::AppContext;
use crate::corpus;
use crate::progress::{IndexProgressEvent, IndexProgressReporter};

/// Embed and upsert every document, strictly in order.
///
/// One embedding call and one upsert per document, with no overlap
/// between documents. Stops at the first failure; records upserted
/// before it stay in the index. Returns the number of documents written.
pub async fn index_documents(
    ctx: &AppContext,
    index: &dyn VectorIndex,
    documents: &[Document],
    progress: &dyn IndexProgressReporter,
) -> Result<usize> {
    let total = documents.len();

    for (i, doc) in documents.iter().enumerate() {
        progress.report(IndexProgressEvent::Indexing {
            index: index.name().to_string(),
            n: i + 1,
            total,
            id: doc.id.clone(),
            title: doc.title.clone(),
        });

        let vector = ctx.embedder.embed(&doc.content).await?;
        index.upsert(&IndexRecord::for_document(doc, vector)).await?;
        info!(index = index.name(), id = %doc.id, "document indexed");
    }

    progress.report(IndexProgressEvent::Done {
        index: index.name().to_string(),
        total,
    });
    Ok(total)
}

/// `recipe-search index`: ensure the index exists and load the bundled corpus.
pub async fn run_index(ctx: &AppContext, progress: &dyn IndexProgressReporter) -> Result<()> {
    let index = ctx.open_index().await?;
    index_documents(ctx, index.as_ref(), &corpus::recipes(), progress).await?;
    Ok(())
}
