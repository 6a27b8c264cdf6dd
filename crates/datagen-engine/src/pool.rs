//! Parallel execution of worker assignments.

use crate::adapter::AdapterFactory;
use crate::error::{RunFailure, WorkerError, WorkerFailure};
use crate::metrics::{PartialCount, RunSummary, WorkerAssignment};
use crate::progress::{NoopProgress, ProgressSink};
use crate::worker::run_worker;
use datagen_generator::DocumentGenerator;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// What the pool does with the other workers once one has failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Let every worker run to its own completion or failure, then report
    /// the first failure and discard all results.
    #[default]
    WaitForAll,
    /// Broadcast a cancellation signal on the first failure. Workers stop
    /// before their next insert and the failure carries partial counts.
    CancelOnFailure,
}

/// Runs one worker per assignment on the tokio runtime.
pub struct WorkerPool {
    policy: FailurePolicy,
    progress: Arc<dyn ProgressSink>,
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(FailurePolicy::default())
    }
}

impl WorkerPool {
    pub fn new(policy: FailurePolicy) -> Self {
        Self {
            policy,
            progress: Arc::new(NoopProgress),
        }
    }

    /// Set the sink that receives worker progress.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Run every assignment concurrently and wait for all of them.
    ///
    /// Each worker gets its own adapter from `adapter_factory` and its own
    /// generator from `generator_factory`. Returns the summaries in
    /// completion order, or the first failure observed.
    pub async fn execute<F, G>(
        &self,
        assignments: Vec<WorkerAssignment>,
        adapter_factory: Arc<F>,
        generator_factory: G,
    ) -> Result<Vec<RunSummary>, RunFailure>
    where
        F: AdapterFactory + 'static,
        G: Fn(u32) -> DocumentGenerator,
    {
        let total_workers = assignments.len();
        let (cancel_tx, cancel_rx) = watch::channel(false);

        info!("Spawning {} workers ({:?})", total_workers, self.policy);

        let mut pending: FuturesUnordered<_> = assignments
            .into_iter()
            .map(|assignment| {
                let worker_id = assignment.worker_id;
                let factory = Arc::clone(&adapter_factory);
                let progress = Arc::clone(&self.progress);
                let cancel = match self.policy {
                    FailurePolicy::CancelOnFailure => Some(cancel_rx.clone()),
                    FailurePolicy::WaitForAll => None,
                };
                let mut generator = generator_factory(worker_id);

                let handle = tokio::spawn(async move {
                    let adapter = match factory.create(worker_id).await {
                        Ok(adapter) => adapter,
                        Err(e) => {
                            return Err(WorkerFailure {
                                worker_id,
                                inserted_count: 0,
                                total_cost_units: 0.0,
                                error: e.into(),
                            })
                        }
                    };
                    run_worker(
                        assignment,
                        &adapter,
                        &mut generator,
                        progress.as_ref(),
                        cancel.as_ref(),
                    )
                    .await
                });

                async move { (worker_id, handle.await) }
            })
            .collect();

        let mut summaries = Vec::with_capacity(total_workers);
        let mut failures: Vec<WorkerFailure> = Vec::new();

        // Join barrier: drain every worker, in completion order
        while let Some((worker_id, joined)) = pending.next().await {
            let outcome = joined.unwrap_or_else(|e| {
                Err(WorkerFailure {
                    worker_id,
                    inserted_count: 0,
                    total_cost_units: 0.0,
                    error: WorkerError::Panicked(e.to_string()),
                })
            });

            match outcome {
                Ok(summary) => summaries.push(summary),
                Err(failure) => {
                    if failures.is_empty() {
                        error!("First failure observed: {}", failure);
                        if self.policy == FailurePolicy::CancelOnFailure {
                            warn!("Cancelling remaining workers");
                            let _ = cancel_tx.send(true);
                        }
                    }
                    failures.push(failure);
                }
            }
        }

        if failures.is_empty() {
            info!("All {} workers completed", total_workers);
            return Ok(summaries);
        }

        let failed_workers = failures
            .iter()
            .filter(|f| f.error != WorkerError::Cancelled)
            .count();

        let partial = match self.policy {
            FailurePolicy::WaitForAll => Vec::new(),
            FailurePolicy::CancelOnFailure => {
                let mut partial: Vec<PartialCount> = summaries
                    .iter()
                    .map(PartialCount::from)
                    .chain(failures.iter().map(WorkerFailure::partial))
                    .collect();
                partial.sort_by_key(|p| p.worker_id);
                partial
            }
        };

        let first = failures.swap_remove(0);

        Err(RunFailure {
            first,
            failed_workers,
            total_workers,
            partial,
        })
    }
}
