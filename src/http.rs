//! Shared HTTP transport for the hosted-service clients.
//!
//! Both clients send JSON over `reqwest` and use the same bounded retry
//! the services' own SDKs apply by default:
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 0.5s, 1s, 2s, 4s, 8s (capped)
//!
//! Any error left after the last attempt is returned unchanged.

use anyhow::{bail, Result};
use std::time::Duration;
use tracing::{debug, warn};

const INITIAL_BACKOFF_MS: u64 = 500;
const MAX_BACKOFF_MS: u64 = 8_000;

/// Build a client with a per-request timeout.
pub(crate) fn build_client(timeout_secs: u64) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

fn backoff(attempt: u32) -> Duration {
    let factor = 1u64 << (attempt.saturating_sub(1)).min(5);
    Duration::from_millis((INITIAL_BACKOFF_MS * factor).min(MAX_BACKOFF_MS))
}

/// Send the request produced by `build`, retrying transient failures.
///
/// `service` names the remote side in error messages
/// (`"<service> API error <status>: <body>"`). Returns the first
/// successful response.
/// Error body for diagnostics; a body that fails to read is named as such.
fn body_or_placeholder<E: std::fmt::Display>(body: std::result::Result<String, E>) -> String {
    body.unwrap_or_else(|e| format!("<unreadable body: {}>", e))
}

pub(crate) async fn send_with_retry<F>(
    service: &str,
    max_retries: u32,
    build: F,
) -> Result<reqwest::Response>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut last_err = None;

    for attempt in 0..=max_retries {
        if attempt > 0 {
            let delay = backoff(attempt);
            warn!(service, attempt, ?delay, "retrying after transient failure");
            tokio::time::sleep(delay).await;
        }

        match build().send().await {
            Ok(response) => {
                let status = response.status();
                debug!(service, %status, "response received");

                if status.is_success() {
                    return Ok(response);
                }

                let body_text = body_or_placeholder(response.text().await);
                if status.as_u16() == 429 || status.is_server_error() {
                    last_err = Some(anyhow::anyhow!(
                        "{} API error {}: {}",
                        service,
                        status,
                        body_text
                    ));
                    continue;
                }

                bail!("{} API error {}: {}", service, status, body_text);
            }
            Err(e) => {
                last_err = Some(anyhow::Error::new(e).context(format!("{} request failed", service)));
                continue;
            }
        }
    }

    Err(last_err.unwrap_or_else(|| anyhow::anyhow!("{} request failed after retries", service)))
}
