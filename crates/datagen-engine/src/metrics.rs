//! Metrics types for worker output and aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Slice of the run handed to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerAssignment {
    pub worker_id: u32,
    pub operation_count: u64,
}

/// Result of a worker that completed every assigned insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub worker_id: u32,
    pub inserted_count: u64,
    /// Sum of backend-reported cost units for this worker's inserts
    pub total_cost_units: f64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl RunSummary {
    /// Get duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        (self.completed_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    /// Inserts per second, if the worker ran for a measurable time.
    pub fn inserts_per_second(&self) -> Option<f64> {
        let secs = self.duration_secs();
        (secs > 0.0).then(|| self.inserted_count as f64 / secs)
    }
}

/// Work completed by a worker, whether or not it finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialCount {
    pub worker_id: u32,
    pub inserted_count: u64,
    pub total_cost_units: f64,
    pub completed: bool,
}

impl From<&RunSummary> for PartialCount {
    fn from(summary: &RunSummary) -> Self {
        Self {
            worker_id: summary.worker_id,
            inserted_count: summary.inserted_count,
            total_cost_units: summary.total_cost_units,
            completed: true,
        }
    }
}

/// Aggregated results from all workers of a successful run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateReport {
    /// Sum of `per_worker[*].inserted_count`
    pub total_inserted: u64,
    /// Sum of `per_worker[*].total_cost_units`
    pub total_cost_units: f64,
    /// Wall clock duration (max worker duration)
    pub wall_clock_duration_secs: f64,
    /// Total inserts over wall clock time
    pub inserts_per_second: f64,
    /// Total cost units over wall clock time
    pub cost_units_per_second: f64,
    pub average_cost_per_insert: f64,
    /// Individual worker summaries, ordered by worker id
    pub per_worker: Vec<RunSummary>,
    pub aggregated_at: DateTime<Utc>,
}

/// Runtime environment information captured at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    /// Number of logical CPUs visible to the process
    pub cpu_cores: usize,
    /// Total memory in MB
    pub memory_mb: u64,
    /// Available memory in MB
    pub available_memory_mb: u64,
    pub hostname: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_summary_rates() {
        let started_at = Utc::now();
        let summary = RunSummary {
            worker_id: 0,
            inserted_count: 1000,
            total_cost_units: 5000.0,
            started_at,
            completed_at: started_at + Duration::seconds(10),
        };

        assert_eq!(summary.duration_secs(), 10.0);
        assert_eq!(summary.inserts_per_second(), Some(100.0));
    }

    #[test]
    fn test_zero_duration_has_no_rate() {
        let now = Utc::now();
        let summary = RunSummary {
            worker_id: 0,
            inserted_count: 0,
            total_cost_units: 0.0,
            started_at: now,
            completed_at: now,
        };

        assert_eq!(summary.inserts_per_second(), None);
    }
}
