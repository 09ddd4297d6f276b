//! External lookup client
//!
//! Resolves a query string to a value without involving the user. The
//! transport lives behind [`LookupService`] so the resolution engine never
//! sees it.

mod config;
mod error;
mod http;

pub use config::{LookupConfig, UnconfiguredLookup};
pub use error::{LookupError, LookupErrorKind};
pub use http::HttpLookupService;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for lookup providers
#[async_trait]
pub trait LookupService: Send + Sync {
    /// Resolve `query` to a value
    async fn lookup(&self, query: &str) -> Result<String, LookupError>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: LookupService + ?Sized> LookupService for Arc<T> {
    async fn lookup(&self, query: &str) -> Result<String, LookupError> {
        (**self).lookup(query).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Logging wrapper for lookup services
pub struct LoggingLookup {
    inner: Arc<dyn LookupService>,
}

impl LoggingLookup {
    pub fn new(inner: Arc<dyn LookupService>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl LookupService for LoggingLookup {
    async fn lookup(&self, query: &str) -> Result<String, LookupError> {
        let start = std::time::Instant::now();
        let result = self.inner.lookup(query).await;
        let duration = start.elapsed();

        match &result {
            Ok(value) => {
                tracing::info!(
                    provider = %self.inner.name(),
                    duration_ms = %duration.as_millis(),
                    query = %query,
                    result_len = value.len(),
                    "Lookup completed"
                );
            }
            Err(e) => {
                tracing::warn!(
                    provider = %self.inner.name(),
                    duration_ms = %duration.as_millis(),
                    query = %query,
                    error = %e.message,
                    transient = e.kind.is_transient(),
                    "Lookup failed"
                );
            }
        }

        result
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
