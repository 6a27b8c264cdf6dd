//! Reporting sinks injected into the engine.

use crate::metrics::AggregateReport;
use tracing::info;

/// Receives periodic worker progress. Fire-and-forget.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, worker_id: u32, inserted_so_far: u64, cost_so_far: f64);
}

/// Receives the final report of a successful run.
pub trait ReportSink {
    fn on_report(&self, report: &AggregateReport) -> std::io::Result<()>;
}

/// Logs progress through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn on_progress(&self, worker_id: u32, inserted_so_far: u64, cost_so_far: f64) {
        info!(
            "Task Id:{} Inserts:{} Cost units:{:.2}",
            worker_id, inserted_so_far, cost_so_far
        );
    }
}

/// Discards progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn on_progress(&self, _worker_id: u32, _inserted_so_far: u64, _cost_so_far: f64) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording(Mutex<Vec<(u32, u64)>>);

    impl ProgressSink for Recording {
        fn on_progress(&self, worker_id: u32, inserted_so_far: u64, _cost_so_far: f64) {
            self.0.lock().unwrap().push((worker_id, inserted_so_far));
        }
    }

    #[test]
    fn test_sinks_as_trait_objects() {
        let recording = Recording::default();
        let sinks: [&dyn ProgressSink; 3] = [&TracingProgress, &NoopProgress, &recording];
        for sink in sinks {
            sink.on_progress(3, 100, 1.5);
        }
        assert_eq!(*recording.0.lock().unwrap(), vec![(3, 100)]);
    }
}
