//! HTTP lookup provider
//!
//! Issues `GET {base_url}?q={query}` and expects `{"result": "..."}` back.

use super::{LookupConfig, LookupError, LookupService};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Lookup service backed by an HTTP endpoint
pub struct HttpLookupService {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    result: Option<String>,
}

impl HttpLookupService {
    pub fn new(base_url: &str, config: &LookupConfig) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LookupError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn classify_error(status: reqwest::StatusCode, body: &str) -> LookupError {
        match status.as_u16() {
            401 | 403 => LookupError::auth(format!("Authentication failed: {body}")),
            404 => LookupError::not_found(format!("No result: {body}")),
            429 => LookupError::rate_limit(format!("Rate limited: {body}")),
            400 => LookupError::invalid_request(format!("Invalid request: {body}")),
            500..=599 => LookupError::server_error(format!("Server error: {body}")),
            _ => LookupError::unknown(format!("HTTP {status}: {body}")),
        }
    }
}

#[async_trait]
impl LookupService for HttpLookupService {
    async fn lookup(&self, query: &str) -> Result<String, LookupError> {
        let mut request = self.client.get(&self.base_url).query(&[("q", query)]);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                LookupError::network(format!("Request timeout: {e}"))
            } else if e.is_connect() {
                LookupError::network(format!("Connection failed: {e}"))
            } else {
                LookupError::unknown(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LookupError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(Self::classify_error(status, &body));
        }

        let parsed: LookupResponse = serde_json::from_str(&body).map_err(|e| {
            LookupError::unknown(format!("Failed to parse response: {e} - body: {body}"))
        })?;

        match parsed.result {
            Some(result) if !result.trim().is_empty() => Ok(result),
            _ => Err(LookupError::not_found(format!("Empty result for {query:?}"))),
        }
    }

    fn name(&self) -> &str {
        &self.base_url
    }
}
