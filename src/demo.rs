//! The default end-to-end run: index the corpus, then run the example query.

use anyhow::Result;

use crate::config::validate_top_k;
use crate::context::AppContext;
use crate::corpus;
use crate::ingest::index_documents;
use crate::progress::IndexProgressReporter;
use crate::search::{render_results, search};

/// Ensure the index, upsert every bundled recipe, run `query.text` and
/// print the table. `top_k` overrides `query.top_k` when given and is
/// checked before the index is touched.
pub async fn run_demo(
    ctx: &AppContext,
    progress: &dyn IndexProgressReporter,
    top_k: Option<usize>,
) -> Result<()> {
    let query = &ctx.settings.query.text;
    let top_k = top_k.unwrap_or(ctx.settings.query.top_k);
    validate_top_k(top_k)?;

    let index = ctx.open_index().await?;
    index_documents(ctx, index.as_ref(), &corpus::recipes(), progress).await?;

    let results = search(ctx, index.as_ref(), query, top_k).await?;

    println!("Results for \"{}\":", query);
    print!("{}", render_results(&results));
    Ok(())
}
