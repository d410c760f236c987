//! Pinecone vector database client.
//!
//! [`PineconeCatalog`] talks to the control plane (`api.pinecone.io`) to
//! list, describe and create indexes. [`PineconeIndex`] talks to one
//! index's data-plane host to upsert records and run queries.
//!
//! Every request carries the `Api-Key` and `X-Pinecone-API-Version`
//! headers. Non-2xx responses surface as `Pinecone API error <status>: <body>`.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use recipe_search_core::embedding::check_dims;
use recipe_search_core::models::{IndexRecord, QueryMatch};
use recipe_search_core::search::rank_matches;
use recipe_search_core::store::{IndexCatalog, IndexDescription, IndexSpec, Metric, VectorIndex};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::IndexSettings;
use crate::http;

const SERVICE: &str = "Pinecone";

#[derive(Debug, Deserialize)]
struct IndexList {
    #[serde(default)]
    indexes: Vec<IndexModel>,
}

#[derive(Debug, Deserialize)]
struct IndexModel {
    name: String,
    #[serde(default)]
    dimension: Option<usize>,
    metric: Metric,
    #[serde(default)]
    host: String,
    #[serde(default)]
    status: IndexStatus,
}

#[derive(Debug, Default, Deserialize)]
struct IndexStatus {
    #[serde(default)]
    ready: bool,
}

impl From<IndexModel> for IndexDescription {
    fn from(m: IndexModel) -> Self {
        Self {
            name: m.name,
            dimension: m.dimension.unwrap_or(0),
            metric: m.metric,
            host: m.host,
            ready: m.status.ready,
        }
    }
}

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    vectors: [&'a IndexRecord; 1],
}

#[derive(Debug, Deserialize)]
struct UpsertResponse {
    #[serde(rename = "upsertedCount", default)]
    upserted_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

/// Credentials and transport shared by control- and data-plane calls.
#[derive(Clone)]
struct Connection {
    client: reqwest::Client,
    api_key: String,
    api_version: String,
    max_retries: u32,
}

impl Connection {
    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", &self.api_version)
    }

    fn post<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", &self.api_version)
            .json(body)
    }
}

/// Control-plane client.
pub struct PineconeCatalog {
    conn: Connection,
    control_plane_url: String,
}

impl PineconeCatalog {
    /// Create a client from settings and an API key.
    ///
    /// No network call is made until a catalog method is used.
    pub fn new(settings: &IndexSettings, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            conn: Connection {
                client: http::build_client(settings.timeout_secs)?,
                api_key: api_key.into(),
                api_version: settings.api_version.clone(),
                max_retries: settings.max_retries,
            },
            control_plane_url: settings.control_plane_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl IndexCatalog for PineconeCatalog {
    async fn list_indexes(&self) -> Result<Vec<IndexDescription>> {
        let url = format!("{}/indexes", self.control_plane_url);
        debug!(%url, "listing indexes");
        let response =
            http::send_with_retry(SERVICE, self.conn.max_retries, || self.conn.get(&url)).await?;
        let list: IndexList = response
            .json()
            .await
            .context("Invalid Pinecone list_indexes response")?;
        Ok(list.indexes.into_iter().map(IndexDescription::from).collect())
    }

    async fn describe_index(&self, name: &str) -> Result<IndexDescription> {
        let url = format!("{}/indexes/{}", self.control_plane_url, name);
        debug!(%url, "describing index");
        let response =
            http::send_with_retry(SERVICE, self.conn.max_retries, || self.conn.get(&url)).await?;
        let model: IndexModel = response
            .json()
            .await
            .context("Invalid Pinecone describe_index response")?;
        Ok(model.into())
    }

    async fn create_index(&self, spec: &IndexSpec) -> Result<IndexDescription> {
        let url = format!("{}/indexes", self.control_plane_url);
        debug!(%url, name = %spec.name, dimension = spec.dimension, metric = %spec.metric, "creating index");
        let response = http::send_with_retry(SERVICE, self.conn.max_retries, || {
            self.conn.post(&url, spec)
        })
        .await?;
        let model: IndexModel = response
            .json()
            .await
            .context("Invalid Pinecone create_index response")?;
        Ok(model.into())
    }

    fn open(&self, index: &IndexDescription) -> Result<Arc<dyn VectorIndex>> {
        if index.host.is_empty() {
            bail!("index '{}' has no data-plane host yet", index.name);
        }
        let base_url = if index.host.contains("://") {
            index.host.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", index.host.trim_end_matches('/'))
        };
        Ok(Arc::new(PineconeIndex {
            conn: self.conn.clone(),
            name: index.name.clone(),
            base_url,
            dimension: index.dimension,
        }))
    }
}

/// Data-plane handle for one index.
pub struct PineconeIndex {
    conn: Connection,
    name: String,
    base_url: String,
    dimension: usize,
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    fn name(&self) -> &str {
        &self.name
    }

    async fn upsert(&self, record: &IndexRecord) -> Result<()> {
        check_dims(&record.values, self.dimension)?;
        let url = format!("{}/vectors/upsert", self.base_url);
        let body = UpsertRequest { vectors: [record] };
        let response = http::send_with_retry(SERVICE, self.conn.max_retries, || {
            self.conn.post(&url, &body)
        })
        .await?;
        let parsed: UpsertResponse = response
            .json()
            .await
            .context("Invalid Pinecone upsert response")?;
        debug!(index = %self.name, id = %record.id, upserted = parsed.upserted_count, "upserted record");
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<QueryMatch>> {
        check_dims(vector, self.dimension)?;
        let url = format!("{}/query", self.base_url);
        let body = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            include_values: false,
        };
        let response = http::send_with_retry(SERVICE, self.conn.max_retries, || {
            self.conn.post(&url, &body)
        })
        .await?;
        let parsed: QueryResponse = response
            .json()
            .await
            .context("Invalid Pinecone query response")?;
        debug!(index = %self.name, matches = parsed.matches.len(), "query returned");
        Ok(rank_matches(parsed.matches, top_k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_model_maps_status_and_host() {
        let json = serde_json::json!({
            "name": "recipes",
            "dimension": 1536,
            "metric": "cosine",
            "host": "recipes-abc.svc.pinecone.io",
            "spec": { "serverless": { "cloud": "aws", "region": "us-east-1" } },
            "status": { "ready": true, "state": "Ready" }
        });
        let desc: IndexDescription = serde_json::from_value::<IndexModel>(json).unwrap().into();
        assert_eq!(desc.dimension, 1536);
        assert_eq!(desc.metric, Metric::Cosine);
        assert!(desc.ready);
        assert_eq!(desc.host, "recipes-abc.svc.pinecone.io");
    }

    #[test]
    fn index_model_without_status_is_not_ready() {
        let json = serde_json::json!({ "name": "x", "dimension": 8, "metric": "dotproduct" });
        let desc: IndexDescription = serde_json::from_value::<IndexModel>(json).unwrap().into();
        assert!(!desc.ready);
        assert!(desc.host.is_empty());
    }

    #[test]
    fn query_request_uses_camel_case() {
        let v = [0.5f32, 0.25];
        let body = serde_json::to_value(QueryRequest {
            vector: &v,
            top_k: 3,
            include_metadata: true,
            include_values: false,
        })
        .unwrap();
        assert_eq!(body["topK"], 3);
        assert_eq!(body["includeMetadata"], true);
        assert_eq!(body["includeValues"], false);
    }

    #[test]
    fn open_requires_host() {
        let catalog = PineconeCatalog::new(&IndexSettings::default(), "key").unwrap();
        let desc = IndexDescription {
            name: "recipes".to_string(),
            dimension: 1536,
            metric: Metric::Cosine,
            host: String::new(),
            ready: false,
        };
        assert!(catalog.open(&desc).is_err());
    }
}
