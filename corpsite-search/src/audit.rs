//! Audit events emitted by the engine.
//!
//! One [`AuditEvent::SearchCompleted`] per successful search and one
//! [`AuditEvent::SearchFailed`] per internal failure. Invalid queries are
//! caller errors and are not audited. Sinks must not block.

use serde::{Deserialize, Serialize};

/// A single audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
    /// A search finished and returned results to the caller.
    SearchCompleted {
        /// Trimmed term in its original case.
        term: String,
        /// Domain filter as given.
        filter: String,
        /// Number of results returned.
        result_count: usize,
        /// Whether fuzzy matching was enabled.
        fuzzy: bool,
    },
    /// A search failed for a reason other than invalid input.
    SearchFailed {
        /// The raw term as received.
        term: String,
        /// Machine-readable error code.
        error_code: String,
        /// Error message.
        message: String,
    },
}

/// Receives audit events. Implementations must return immediately.
pub trait AuditSink: Send + Sync {
    /// Record one event, fire-and-forget.
    fn record(&self, event: AuditEvent);
}

/// Sink that writes events to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuditEvent) {
        match event {
            AuditEvent::SearchCompleted {
                term,
                filter,
                result_count,
                fuzzy,
            } => {
                tracing::info!(%filter, result_count, fuzzy, "search completed");
                tracing::trace!(%term, "search term");
            }
            AuditEvent::SearchFailed {
                term,
                error_code,
                message,
            } => {
                tracing::error!(%error_code, %message, "search failed");
                tracing::trace!(%term, "search term");
            }
        }
    }
}
