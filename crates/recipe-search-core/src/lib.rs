//! # Recipe Search Core
//!
//! Shared, network-free logic for recipe-search: data models, the
//! embedding and vector index traits, cosine similarity, search result
//! shaping, and an in-memory index backend.
//!
//! This crate contains no tokio, HTTP client, or filesystem I/O. The
//! hosted-service clients live in the `recipe-search` app crate.

pub mod embedding;
pub mod models;
pub mod search;
pub mod store;
