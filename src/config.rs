//! Configuration: secrets from the environment, settings from TOML.
//!
//! The two API keys are only ever read from the process environment.
//! Everything else has a built-in default and can be overridden by an
//! optional TOML file passed with `--config`:
//!
//! ```toml
//! [embedding]
//! model = "text-embedding-3-small"
//!
//! [index]
//! name = "recipes"
//! cloud = "aws"
//! region = "us-east-1"
//!
//! [query]
//! text = "recipes with ice cream"
//! top_k = 3
//! ```

use anyhow::{bail, Context, Result};
use recipe_search_core::search::{DEFAULT_TOP_K, MAX_TOP_K};
use reqwest::Url;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Environment variable holding the embedding service key.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Environment variable holding the vector database key.
pub const PINECONE_API_KEY_VAR: &str = "PINECONE_API_KEY";

/// Startup configuration failures that callers need to tell apart.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY environment variable not set; it is required to call the embedding service")]
    MissingOpenAiKey,
    #[error("PINECONE_API_KEY environment variable not set; it is required to call the vector database")]
    MissingPineconeKey,
}

/// API keys for the two hosted services.
#[derive(Clone)]
pub struct Secrets {
    pub openai_api_key: String,
    pub pinecone_api_key: String,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("openai_api_key", &"<redacted>")
            .field("pinecone_api_key", &"<redacted>")
            .finish()
    }
}

impl Secrets {
    /// Read both keys from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read both keys through `lookup`. Empty values count as missing.
    ///
    /// The embedding key is checked first, so when both are absent the
    /// error names the embedding key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let openai_api_key = present(OPENAI_API_KEY_VAR).ok_or(ConfigError::MissingOpenAiKey)?;
        let pinecone_api_key =
            present(PINECONE_API_KEY_VAR).ok_or(ConfigError::MissingPineconeKey)?;
        Ok(Self {
            openai_api_key,
            pinecone_api_key,
        })
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub embedding: EmbeddingSettings,
    #[serde(default)]
    pub index: IndexSettings,
    #[serde(default)]
    pub query: QuerySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingSettings {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_openai_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_openai_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_model() -> String {
    "text-embedding-3-small".to_string()
}
fn default_openai_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_retries() -> u32 {
    2
}

#[derive(Debug, Deserialize, Clone)]
pub struct IndexSettings {
    #[serde(default = "default_index_name")]
    pub name: String,
    #[serde(default = "default_cloud")]
    pub cloud: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_control_plane_url")]
    pub control_plane_url: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_ready_timeout_secs")]
    pub ready_timeout_secs: u64,
    #[serde(default = "default_ready_poll_ms")]
    pub ready_poll_ms: u64,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            name: default_index_name(),
            cloud: default_cloud(),
            region: default_region(),
            control_plane_url: default_control_plane_url(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            ready_timeout_secs: default_ready_timeout_secs(),
            ready_poll_ms: default_ready_poll_ms(),
        }
    }
}

fn default_index_name() -> String {
    "recipes".to_string()
}
fn default_cloud() -> String {
    "aws".to_string()
}
fn default_region() -> String {
    "us-east-1".to_string()
}
fn default_control_plane_url() -> String {
    "https://api.pinecone.io".to_string()
}
fn default_api_version() -> String {
    "2024-07".to_string()
}
fn default_ready_timeout_secs() -> u64 {
    120
}
fn default_ready_poll_ms() -> u64 {
    1000
}

#[derive(Debug, Deserialize, Clone)]
pub struct QuerySettings {
    #[serde(default = "default_query_text")]
    pub text: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            text: default_query_text(),
            top_k: default_top_k(),
        }
    }
}

fn default_query_text() -> String {
    "recipes with ice cream".to_string()
}
fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

/// Check that `top_k` is within what the vector database accepts.
pub fn validate_top_k(top_k: usize) -> Result<()> {
    if !(1..=MAX_TOP_K).contains(&top_k) {
        bail!("top_k must be between 1 and {}, got {}", MAX_TOP_K, top_k);
    }
    Ok(())
}

/// Check that a query has something to embed.
pub fn validate_query(query: &str) -> Result<()> {
    if query.trim().is_empty() {
        bail!("query text must not be empty");
    }
    Ok(())
}

/// Load settings from `path`, or return defaults when no path is given.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            parse_settings(&content)
        }
        None => Ok(Settings::default()),
    }
}

/// Parse and validate settings from TOML text.
pub fn parse_settings(content: &str) -> Result<Settings> {
    let settings: Settings =
        toml::from_str(content).with_context(|| "Failed to parse config file")?;
    validate(&settings)?;
    Ok(settings)
}

fn validate(settings: &Settings) -> Result<()> {
    if settings.embedding.model.trim().is_empty() {
        bail!("embedding.model must not be empty");
    }
    Url::parse(&settings.embedding.base_url)
        .with_context(|| format!("embedding.base_url is not a URL: {}", settings.embedding.base_url))?;

    let name = &settings.index.name;
    if name.is_empty() || name.len() > 45 {
        bail!("index.name must be 1-45 characters, got '{}'", name);
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        bail!(
            "index.name may only contain lowercase letters, digits and '-', got '{}'",
            name
        );
    }
    Url::parse(&settings.index.control_plane_url).with_context(|| {
        format!(
            "index.control_plane_url is not a URL: {}",
            settings.index.control_plane_url
        )
    })?;
    if settings.index.ready_poll_ms == 0 {
        bail!("index.ready_poll_ms must be > 0");
    }

    validate_query(&settings.query.text).context("invalid query.text")?;
    validate_top_k(settings.query.top_k).context("invalid query.top_k")?;

    Ok(())
}
