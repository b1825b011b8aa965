//! Shared HTTP client and status mapping.

use std::sync::OnceLock;

use crate::error::ColloquyError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .pool_max_idle_per_host(10)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    })
}

/// Map a non-success HTTP status to an error.
pub fn status_to_error(status: u16, body: &str) -> ColloquyError {
    match status {
        401 | 403 => ColloquyError::Authentication(body.to_string()),
        429 => ColloquyError::RateLimited {
            retry_after_ms: extract_retry_after(body),
        },
        _ => ColloquyError::api(status, body),
    }
}

/// Gemini reports retry hints as `error.details[].retryDelay` ("12s").
fn extract_retry_after(body: &str) -> Option<u64> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("details")?
        .as_array()?
        .iter()
        .find_map(|detail| detail.get("retryDelay").and_then(|d| d.as_str()))
        .and_then(|delay| delay.strip_suffix('s'))
        .and_then(|secs| secs.parse::<f64>().ok())
        .map(|secs| (secs * 1000.0) as u64)
}
