//! OpenAI embedding client.
//!
//! Implements [`Embedder`] over `POST {base_url}/embeddings`. Each call
//! embeds exactly one text and returns the first vector in the response,
//! which must have [`EMBEDDING_DIMS`] components.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use recipe_search_core::embedding::{check_dims, Embedder, EMBEDDING_DIMS};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EmbeddingSettings;
use crate::http;

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Embedding client for the OpenAI API.
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_retries: u32,
}

impl OpenAiEmbedder {
    /// Create a client from settings and an API key.
    ///
    /// No network call is made until [`embed`](Embedder::embed).
    pub fn new(settings: &EmbeddingSettings, api_key: impl Into<String>) -> Result<Self> {
        let client = http::build_client(settings.timeout_secs)?;
        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", settings.base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: settings.model.clone(),
            max_retries: settings.max_retries,
        })
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(model = %self.model, chars = text.chars().count(), "requesting embedding");
        let body = EmbedRequest {
            model: &self.model,
            input: [text],
        };

        let response = http::send_with_retry("OpenAI", self.max_retries, || {
            self.client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&body)
        })
        .await?;

        let parsed: EmbedResponse = response
            .json()
            .await
            .context("Invalid OpenAI response")?;
        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| anyhow!("Empty embedding response"))?;

        check_dims(&vector, EMBEDDING_DIMS)?;
        Ok(vector)
    }
}
