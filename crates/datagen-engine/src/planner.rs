//! Work partitioning for a populate run.
//!
//! Splits the requested item count evenly across workers. The worker count
//! is either configured explicitly or derived from the backend's provisioned
//! capacity: 10 workers per 10,000 capacity units, at least 1, at most
//! 50 per logical CPU.

use crate::environment::available_parallelism_units;
use crate::error::EngineError;
use crate::metrics::WorkerAssignment;
use serde::{Deserialize, Serialize};

/// Parallelism value that asks the planner to derive the worker count.
pub const AUTO_PARALLELISM: i64 = -1;

/// Capacity units served by one auto-planned worker.
const CAPACITY_PER_WORKER: i64 = 1000;

/// Upper bound on auto-planned workers per logical CPU.
const MAX_WORKERS_PER_UNIT: i64 = 50;

/// Output of the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPlan {
    pub task_count: u32,
    pub ops_per_task: u64,
    /// Items requested by the caller
    pub total_items: u64,
    /// `total_items % task_count`: never generated nor inserted
    pub dropped_items: u64,
}

impl TaskPlan {
    /// Items that will actually be inserted on success.
    pub fn planned_items(&self) -> u64 {
        self.ops_per_task * self.task_count as u64
    }

    /// One assignment per worker, ids `0..task_count`.
    pub fn assignments(&self) -> Vec<WorkerAssignment> {
        (0..self.task_count)
            .map(|worker_id| WorkerAssignment {
                worker_id,
                operation_count: self.ops_per_task,
            })
            .collect()
    }
}

/// Plan a run using the logical CPU count of this host.
pub fn plan_tasks(
    configured_parallelism: i64,
    backend_capacity: i64,
    total_items: i64,
) -> Result<TaskPlan, EngineError> {
    plan_tasks_with_units(
        configured_parallelism,
        backend_capacity,
        total_items,
        available_parallelism_units(),
    )
}

/// Plan a run for a host offering `units` parallel execution units.
///
/// The remainder of `total_items / task_count` is dropped, not spread over
/// the workers; it is reported in [`TaskPlan::dropped_items`].
pub fn plan_tasks_with_units(
    configured_parallelism: i64,
    backend_capacity: i64,
    total_items: i64,
    units: usize,
) -> Result<TaskPlan, EngineError> {
    if total_items < 0 {
        return Err(EngineError::InvalidConfiguration(format!(
            "item count must not be negative, got {total_items}"
        )));
    }

    let task_count = if configured_parallelism == AUTO_PARALLELISM {
        let cap = (units as i64).saturating_mul(MAX_WORKERS_PER_UNIT);
        std::cmp::min(
            std::cmp::max(backend_capacity / CAPACITY_PER_WORKER, 1),
            cap,
        )
    } else {
        configured_parallelism
    };

    if task_count <= 0 {
        return Err(EngineError::InvalidConfiguration(format!(
            "worker count must be positive, got {task_count}"
        )));
    }

    let task_count = u32::try_from(task_count).map_err(|_| {
        EngineError::InvalidConfiguration(format!("worker count {task_count} is too large"))
    })?;

    let total_items = total_items as u64;
    let ops_per_task = total_items / task_count as u64;

    Ok(TaskPlan {
        task_count,
        ops_per_task,
        total_items,
        dropped_items: total_items % task_count as u64,
    })
}

/// Describe the plan for logging.
pub fn describe_plan(plan: &TaskPlan) -> String {
    format!(
        "{} tasks, {} inserts per task, {} of {} items will be inserted",
        plan.task_count,
        plan.ops_per_task,
        plan.planned_items(),
        plan.total_items
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_from_capacity() {
        let plan = plan_tasks_with_units(AUTO_PARALLELISM, 4000, 200_000, 8).unwrap();
        assert_eq!(plan.task_count, 4);
        assert_eq!(plan.ops_per_task, 50_000);
    }

    #[test]
    fn test_auto_floors_to_one() {
        let plan = plan_tasks_with_units(AUTO_PARALLELISM, 400, 10, 8).unwrap();
        assert_eq!(plan.task_count, 1);
        assert_eq!(plan.ops_per_task, 10);

        let plan = plan_tasks_with_units(AUTO_PARALLELISM, 0, 10, 8).unwrap();
        assert_eq!(plan.task_count, 1);
    }

    #[test]
    fn test_auto_capped_by_units() {
        // 1,000,000 capacity would ask for 1000 workers; 2 units cap it at 100
        let plan = plan_tasks_with_units(AUTO_PARALLELISM, 1_000_000, 1000, 2).unwrap();
        assert_eq!(plan.task_count, 100);
    }

    #[test]
    fn test_auto_matches_formula() {
        for capacity in [1, 999, 1000, 1999, 4000, 25_500, 100_000, 400_000] {
            for units in [1usize, 2, 4, 16] {
                let plan = plan_tasks_with_units(AUTO_PARALLELISM, capacity, 1000, units).unwrap();
                let expected = (capacity / 1000).clamp(1, units as i64 * 50);
                assert_eq!(plan.task_count as i64, expected, "capacity={capacity} units={units}");
            }
        }
    }

    #[test]
    fn test_explicit_parallelism_ignores_capacity() {
        for capacity in [0, 1000, 4000, 1_000_000] {
            let plan = plan_tasks_with_units(7, capacity, 700, 1).unwrap();
            assert_eq!(plan.task_count, 7);
        }
        // No cap applied to explicit values
        let plan = plan_tasks_with_units(500, 1000, 500, 1).unwrap();
        assert_eq!(plan.task_count, 500);
    }

    #[test]
    fn test_even_division() {
        let plan = plan_tasks_with_units(5, 4000, 200_000, 8).unwrap();
        assert_eq!(plan.ops_per_task, 40_000);
        assert_eq!(plan.planned_items(), 200_000);
        assert_eq!(plan.dropped_items, 0);
    }

    #[test]
    fn test_remainder_is_dropped() {
        let plan = plan_tasks_with_units(4, 4000, 100_001, 8).unwrap();
        assert_eq!(plan.ops_per_task, 25_000);
        assert_eq!(plan.planned_items(), 100_000);
        assert_eq!(plan.dropped_items, 1);
    }

    #[test]
    fn test_fewer_items_than_tasks() {
        let plan = plan_tasks_with_units(8, 4000, 5, 8).unwrap();
        assert_eq!(plan.ops_per_task, 0);
        assert_eq!(plan.dropped_items, 5);
    }

    #[test]
    fn test_invalid_parallelism() {
        for parallelism in [0, -2, -100] {
            let result = plan_tasks_with_units(parallelism, 4000, 100, 8);
            assert!(matches!(result, Err(EngineError::InvalidConfiguration(_))));
        }
    }

    #[test]
    fn test_negative_items() {
        let result = plan_tasks_with_units(4, 4000, -1, 8);
        assert!(matches!(result, Err(EngineError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_assignments() {
        let plan = plan_tasks_with_units(3, 0, 30, 1).unwrap();
        let assignments = plan.assignments();

        assert_eq!(assignments.len(), 3);
        assert_eq!(assignments[0].worker_id, 0);
        assert_eq!(assignments[2].worker_id, 2);
        assert!(assignments.iter().all(|a| a.operation_count == 10));
    }

    #[test]
    fn test_describe_plan() {
        let plan = plan_tasks_with_units(4, 0, 100_001, 1).unwrap();
        let description = describe_plan(&plan);
        assert!(description.contains("4 tasks"));
        assert!(description.contains("100000 of 100001"));
    }
}
