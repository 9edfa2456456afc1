//! Durable JSONL audit log for search requests.
//!
//! [`JsonlAuditLog`] implements the engine's [`AuditSink`]. Recording only
//! pushes onto an unbounded channel; a background task appends one JSON
//! line per event, stamped with the UTC time and the id of the HTTP request
//! that produced it.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use corpsite_search::{AuditEvent, AuditSink};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{Result, SiteError};

tokio::task_local! {
    /// Id of the HTTP request being served on the current task.
    pub static REQUEST_ID: String;
}

/// One persisted audit line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
    /// HTTP request that triggered the search, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// The engine's event.
    #[serde(flatten)]
    pub event: AuditEvent,
}

impl AuditRecord {
    /// Stamp `event` with the current time and task-local request id.
    #[must_use]
    pub fn now(event: AuditEvent) -> Self {
        Self {
            timestamp: Utc::now(),
            request_id: REQUEST_ID.try_with(Clone::clone).ok(),
            event,
        }
    }
}

/// Audit sink appending JSON lines to a file from a background task.
#[derive(Debug, Clone)]
pub struct JsonlAuditLog {
    tx: mpsc::UnboundedSender<AuditRecord>,
}

impl JsonlAuditLog {
    /// Start the writer task for `path`.
    ///
    /// The task ends once every clone of the returned log has been dropped
    /// and the queue is drained; await the handle to flush on shutdown.
    pub fn spawn(path: PathBuf) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_writer(path, rx));
        (Self { tx }, handle)
    }
}

impl AuditSink for JsonlAuditLog {
    fn record(&self, event: AuditEvent) {
        if self.tx.send(AuditRecord::now(event)).is_err() {
            tracing::warn!("audit writer has stopped, dropping audit event");
        }
    }
}

async fn run_writer(path: PathBuf, mut rx: mpsc::UnboundedReceiver<AuditRecord>) {
    tracing::debug!(path = %path.display(), "audit writer started");
    while let Some(record) = rx.recv().await {
        if let Err(err) = append_record(&path, &record).await {
            tracing::warn!(path = %path.display(), error = %err, "failed to append audit record");
        }
    }
    tracing::debug!("audit writer stopped");
}

async fn append_record(path: &Path, record: &AuditRecord) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut line = serde_json::to_string(record)
        .map_err(|e| SiteError::Config(format!("audit serialization failed: {e}")))?;
    line.push('\n');

    let mut options = tokio::fs::OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

/// Read the most recent `limit` audit records from `path`.
///
/// A missing file yields no records; lines that fail to parse are skipped.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn read_recent_audit(path: &Path, limit: usize) -> Result<Vec<AuditRecord>> {
    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };

    let mut records = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<AuditRecord>(&line) {
            Ok(record) => records.push(record),
            Err(err) => tracing::debug!(error = %err, "skipping unreadable audit line"),
        }
    }

    let skip = records.len().saturating_sub(limit);
    Ok(records.split_off(skip))
}
