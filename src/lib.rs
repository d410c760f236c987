//! # Recipe Search
//!
//! Indexes a small bundled recipe corpus into a hosted vector database and
//! answers semantic queries against it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌────────────┐   ┌──────────────┐
//! │  Corpus  │──▶│  OpenAI    │──▶│   Pinecone   │
//! │ (static) │   │ embeddings │   │ upsert/query │
//! └──────────┘   └────────────┘   └──────┬───────┘
//!                                        ▼
//!                                 ┌─────────────┐
//!                                 │ results     │
//!                                 │ table (CLI) │
//!                                 └─────────────┘
//! ```
//!
//! The remote services sit behind the [`Embedder`](recipe_search_core::embedding::Embedder),
//! [`IndexCatalog`](recipe_search_core::store::IndexCatalog) and
//! [`VectorIndex`](recipe_search_core::store::VectorIndex) traits. An
//! [`AppContext`](context::AppContext) carries the concrete clients into
//! every command.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Secrets from the environment, settings from TOML |
//! | [`context`] | Explicit process context |
//! | [`corpus`] | Bundled recipe documents |
//! | [`embedding`] | OpenAI embedding client |
//! | [`pinecone`] | Pinecone control- and data-plane client |
//! | [`index`] | Find-or-create the recipe index |
//! | [`ingest`] | Embed and upsert the corpus |
//! | [`search`] | Query and render results |
//! | [`demo`] | Full index-then-query run |
//! | [`progress`] | Per-document progress reporting |

pub mod config;
pub mod context;
pub mod corpus;
pub mod demo;
pub mod embedding;
mod http;
pub mod index;
pub mod ingest;
pub mod pinecone;
pub mod progress;
pub mod search;
