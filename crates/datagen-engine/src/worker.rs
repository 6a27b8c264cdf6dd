//! A single insert worker.

use crate::adapter::StorageAdapter;
use crate::error::{WorkerError, WorkerFailure};
use crate::metrics::{RunSummary, WorkerAssignment};
use crate::progress::ProgressSink;
use chrono::Utc;
use datagen_generator::DocumentGenerator;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Completed inserts between two progress notifications.
pub const PROGRESS_INTERVAL: u64 = 100;

/// Perform `assignment.operation_count` sequential inserts.
///
/// Each iteration generates a fresh document and inserts it under its own
/// partition key. The first adapter error ends the worker without a
/// `RunSummary`; nothing is retried. When `cancel` is given it is checked
/// before every insert.
pub async fn run_worker<A>(
    assignment: WorkerAssignment,
    adapter: &A,
    generator: &mut DocumentGenerator,
    progress: &dyn ProgressSink,
    cancel: Option<&watch::Receiver<bool>>,
) -> Result<RunSummary, WorkerFailure>
where
    A: StorageAdapter + ?Sized,
{
    let worker_id = assignment.worker_id;
    let started_at = Utc::now();
    let mut inserted_count = 0u64;
    let mut total_cost_units = 0.0f64;

    info!(
        "Starting task runner ID:{} ({} inserts)",
        worker_id, assignment.operation_count
    );

    for _ in 0..assignment.operation_count {
        if cancel.is_some_and(|rx| *rx.borrow()) {
            debug!(
                "Task {} cancelled after {} inserts",
                worker_id, inserted_count
            );
            return Err(WorkerFailure {
                worker_id,
                inserted_count,
                total_cost_units,
                error: WorkerError::Cancelled,
            });
        }

        let document = generator.generate();
        let result = match adapter.insert(&document, document.partition_key()).await {
            Ok(result) => result,
            Err(e) => {
                error!(
                    "Task {} failed after {} inserts ({}): {}",
                    worker_id,
                    inserted_count,
                    e.kind(),
                    e
                );
                return Err(WorkerFailure {
                    worker_id,
                    inserted_count,
                    total_cost_units,
                    error: e.into(),
                });
            }
        };

        inserted_count += 1;
        total_cost_units += result.cost_units;

        if inserted_count % PROGRESS_INTERVAL == 0 {
            progress.on_progress(worker_id, inserted_count, total_cost_units);
        }
    }

    Ok(RunSummary {
        worker_id,
        inserted_count,
        total_cost_units,
        started_at,
        completed_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::AdapterFactory;
    use crate::error::StorageError;
    use crate::memory::MemoryStore;
    use crate::progress::NoopProgress;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording(Mutex<Vec<(u32, u64, f64)>>);

    impl ProgressSink for Recording {
        fn on_progress(&self, worker_id: u32, inserted_so_far: u64, cost_so_far: f64) {
            self.0
                .lock()
                .unwrap()
                .push((worker_id, inserted_so_far, cost_so_far));
        }
    }

    fn assignment(worker_id: u32, operation_count: u64) -> WorkerAssignment {
        WorkerAssignment {
            worker_id,
            operation_count,
        }
    }

    #[tokio::test]
    async fn test_completes_assignment() {
        let store = MemoryStore::new().with_cost_per_insert(2.0);
        let adapter = store.create(4).await.unwrap();
        let mut generator = DocumentGenerator::seeded(4);

        let summary = run_worker(
            assignment(4, 250),
            &adapter,
            &mut generator,
            &NoopProgress,
            None,
        )
        .await
        .unwrap();

        assert_eq!(summary.worker_id, 4);
        assert_eq!(summary.inserted_count, 250);
        assert_eq!(summary.total_cost_units, 500.0);
        assert!(summary.completed_at >= summary.started_at);
        assert_eq!(store.document_count(), 250);
        assert_eq!(generator.generated_count(), 250);
    }

    #[tokio::test]
    async fn test_progress_every_hundred() {
        let store = MemoryStore::new();
        let adapter = store.create(1).await.unwrap();
        let mut generator = DocumentGenerator::seeded(1);
        let recording = Recording::default();

        run_worker(assignment(1, 350), &adapter, &mut generator, &recording, None)
            .await
            .unwrap();

        let events = recording.0.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![(1, 100, 100.0), (1, 200, 200.0), (1, 300, 300.0)]
        );
    }

    #[tokio::test]
    async fn test_failure_stops_without_retry() {
        let store = MemoryStore::new().fail_worker_after(
            2,
            50,
            StorageError::Throttled("request rate is large".to_string()),
        );
        let adapter = store.create(2).await.unwrap();
        let mut generator = DocumentGenerator::seeded(2);

        let failure = run_worker(
            assignment(2, 100),
            &adapter,
            &mut generator,
            &NoopProgress,
            None,
        )
        .await
        .unwrap_err();

        assert_eq!(failure.worker_id, 2);
        assert_eq!(failure.inserted_count, 50);
        assert!(matches!(
            failure.error,
            WorkerError::Storage(StorageError::Throttled(_))
        ));
        // One failed attempt, no retries
        assert_eq!(generator.generated_count(), 51);
        assert_eq!(store.document_count(), 50);
    }

    #[tokio::test]
    async fn test_cancel_checked_before_insert() {
        let store = MemoryStore::new();
        let adapter = store.create(0).await.unwrap();
        let mut generator = DocumentGenerator::seeded(0);
        let (tx, rx) = watch::channel(true);

        let failure = run_worker(
            assignment(0, 10),
            &adapter,
            &mut generator,
            &NoopProgress,
            Some(&rx),
        )
        .await
        .unwrap_err();
        drop(tx);

        assert_eq!(failure.error, WorkerError::Cancelled);
        assert_eq!(failure.inserted_count, 0);
        assert_eq!(store.document_count(), 0);
    }

    #[tokio::test]
    async fn test_zero_operations() {
        let store = MemoryStore::new();
        let adapter = store.create(0).await.unwrap();
        let mut generator = DocumentGenerator::seeded(0);

        let summary = run_worker(assignment(0, 0), &adapter, &mut generator, &NoopProgress, None)
            .await
            .unwrap();

        assert_eq!(summary.inserted_count, 0);
        assert_eq!(summary.total_cost_units, 0.0);
    }
}
