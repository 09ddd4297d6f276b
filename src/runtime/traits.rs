//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::message_log::{Direction, LogEntry, MessageKind};
use async_trait::async_trait;
use std::sync::Arc;

/// Storage for dialogue messages
#[async_trait]
pub trait MessageLog: Send + Sync {
    /// Append a message and return the stored entry
    async fn append(
        &self,
        text: &str,
        direction: Direction,
        kind: MessageKind,
    ) -> Result<LogEntry, String>;

    /// All messages in append order
    async fn entries(&self) -> Result<Vec<LogEntry>, String>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: MessageLog + ?Sized> MessageLog for Arc<T> {
    async fn append(
        &self,
        text: &str,
        direction: Direction,
        kind: MessageKind,
    ) -> Result<LogEntry, String> {
        (**self).append(text, direction, kind).await
    }

    async fn entries(&self) -> Result<Vec<LogEntry>, String> {
        (**self).entries().await
    }
}
