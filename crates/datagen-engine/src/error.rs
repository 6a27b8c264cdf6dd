//! Error types for the insert engine.

use crate::metrics::PartialCount;
use thiserror::Error;

/// Errors detected before any worker starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Resolved worker count is not positive, or the item count is negative.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Failures reported by a storage adapter for a single insert.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backend signaled capacity exhaustion. Never retried.
    #[error("Request throttled by backend: {0}")]
    Throttled(String),

    /// Transport or availability fault.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Any other backend error.
    #[error("Backend error: {0}")]
    Unknown(String),
}

impl StorageError {
    /// Short name of the failure kind, for logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            StorageError::Throttled(_) => "throttled",
            StorageError::Unavailable(_) => "unavailable",
            StorageError::Unknown(_) => "unknown",
        }
    }
}

/// Why a worker stopped before finishing its assignment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Stopped because a sibling failed (cancel-on-failure policy only).
    #[error("Cancelled after a sibling worker failed")]
    Cancelled,

    #[error("Worker panicked: {0}")]
    Panicked(String),
}

/// A worker that terminated without producing a `RunSummary`.
///
/// The counts describe the work completed before the failure.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("worker {worker_id} failed after {inserted_count} inserts: {error}")]
pub struct WorkerFailure {
    pub worker_id: u32,
    pub inserted_count: u64,
    pub total_cost_units: f64,
    pub error: WorkerError,
}

impl WorkerFailure {
    pub fn partial(&self) -> PartialCount {
        PartialCount {
            worker_id: self.worker_id,
            inserted_count: self.inserted_count,
            total_cost_units: self.total_cost_units,
            completed: false,
        }
    }
}

/// Overall failure of a run.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("run failed ({failed_workers} of {total_workers} workers failed), first failure: {first}")]
pub struct RunFailure {
    /// First failure observed, in completion order.
    pub first: WorkerFailure,
    pub failed_workers: usize,
    pub total_workers: usize,
    /// Per-worker counts, ordered by worker id. Only populated by the
    /// cancel-on-failure policy; empty otherwise.
    pub partial: Vec<PartialCount>,
}

impl RunFailure {
    /// The storage error that doomed the run, if the first failure was one.
    pub fn storage_error(&self) -> Option<&StorageError> {
        match &self.first.error {
            WorkerError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_failure_display() {
        let failure = WorkerFailure {
            worker_id: 2,
            inserted_count: 50,
            total_cost_units: 12.5,
            error: StorageError::Throttled("429".to_string()).into(),
        };

        let message = failure.to_string();
        assert!(message.contains("worker 2"));
        assert!(message.contains("50 inserts"));
        assert!(message.contains("throttled"));
    }

    #[test]
    fn test_storage_error_kind() {
        assert_eq!(StorageError::Throttled(String::new()).kind(), "throttled");
        assert_eq!(StorageError::Unavailable(String::new()).kind(), "unavailable");
        assert_eq!(StorageError::Unknown(String::new()).kind(), "unknown");
    }
}
