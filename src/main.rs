//! # recipe-search CLI
//!
//! Indexes the bundled recipes into Pinecone using OpenAI embeddings and
//! runs semantic queries against them.
//!
//! ## Usage
//!
//! ```bash
//! export OPENAI_API_KEY=...
//! export PINECONE_API_KEY=...
//! recipe-search [--config recipes.toml] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `recipe-search` / `recipe-search demo` | Index the corpus, then run the example query |
//! | `recipe-search index` | Index the corpus only |
//! | `recipe-search search "<query>"` | Run one query against the index |
//! | `recipe-search corpus` | List the bundled recipes |

use clap::{Parser, Subcommand};
use recipe_search::config::{self, Secrets};
use recipe_search::context::AppContext;
use recipe_search::progress::ProgressMode;
use recipe_search::{corpus, demo, ingest, search};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Semantic search over a bundled recipe corpus, backed by OpenAI
/// embeddings and a Pinecone serverless index.
#[derive(Parser)]
#[command(name = "recipe-search", version)]
struct Cli {
    /// Optional settings file (TOML). Built-in defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// How per-document indexing progress is reported on stderr.
    #[arg(long, global = true, value_enum, default_value_t = ProgressMode::Human)]
    progress: ProgressMode,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Index every bundled recipe, then run the configured example query.
    ///
    /// This is the default when no command is given.
    Demo {
        /// Number of results to show (overrides `query.top_k`).
        #[arg(long)]
        top_k: Option<usize>,
    },

    /// Ensure the index exists and upsert every bundled recipe.
    Index,

    /// Run one semantic query against the index.
    Search {
        /// Free-text query.
        query: String,

        /// Number of results to show (overrides `query.top_k`).
        #[arg(long)]
        top_k: Option<usize>,
    },

    /// List the bundled recipes. Needs no keys or network access.
    Corpus,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let command = cli.command.unwrap_or(Commands::Demo { top_k: None });
    if let Commands::Corpus = command {
        corpus::list_recipes();
        return Ok(());
    }

    // Both keys are checked before any client exists.
    let secrets = Secrets::from_env()?;
    let settings = config::load_settings(cli.config.as_deref())?;
    let ctx = AppContext::connect(settings, &secrets)?;
    let progress = cli.progress.reporter();

    match command {
        Commands::Demo { top_k } => {
            demo::run_demo(&ctx, progress.as_ref(), top_k).await?;
        }
        Commands::Index => {
            ingest::run_index(&ctx, progress.as_ref()).await?;
        }
        Commands::Search { query, top_k } => {
            let top_k = top_k.unwrap_or(ctx.settings.query.top_k);
            search::run_search(&ctx, &query, top_k).await?;
        }
        Commands::Corpus => unreachable!("handled before secrets are loaded"),
    }

    Ok(())
}
