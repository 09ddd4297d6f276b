//! Lookup service configuration

use super::{HttpLookupService, LoggingLookup, LookupError, LookupService};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the external lookup service
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Base URL of the lookup endpoint; `None` disables lookups
    pub url: Option<String>,
    pub api_key: Option<String>,
    /// HTTP client timeout, owned by the lookup client
    pub timeout: Duration,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl LookupConfig {
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("LOOKUP_URL").ok().filter(|u| !u.trim().is_empty()),
            api_key: std::env::var("LOOKUP_API_KEY").ok(),
            timeout: std::env::var("LOOKUP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map_or(DEFAULT_TIMEOUT, Duration::from_secs),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    /// Build the lookup service described by this config, wrapped with logging.
    ///
    /// Falls back to [`UnconfiguredLookup`] when no URL is set or the HTTP
    /// client cannot be built.
    pub fn build(&self) -> Arc<dyn LookupService> {
        let inner: Arc<dyn LookupService> = match &self.url {
            Some(url) => match HttpLookupService::new(url, self) {
                Ok(service) => Arc::new(service),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create lookup client");
                    Arc::new(UnconfiguredLookup)
                }
            },
            None => Arc::new(UnconfiguredLookup),
        };
        Arc::new(LoggingLookup::new(inner))
    }
}

/// Lookup service used when none is configured: every lookup fails.
pub struct UnconfiguredLookup;

#[async_trait]
impl LookupService for UnconfiguredLookup {
    async fn lookup(&self, _query: &str) -> Result<String, LookupError> {
        Err(LookupError::unconfigured())
    }

    fn name(&self) -> &str {
        "unconfigured"
    }
}
