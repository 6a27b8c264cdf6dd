//! Parallel insert engine for docstore-datagen.
//!
//! ## Architecture
//!
//! ```text
//!   capacity, item count, parallelism
//!                  │
//!                  ▼
//!           ┌─────────────┐
//!           │ plan_tasks  │  task_count × ops_per_task
//!           └──────┬──────┘
//!                  ▼
//!           ┌─────────────┐
//!           │ WorkerPool  │  one tokio task per assignment
//!           └──────┬──────┘
//!        ┌─────────┼─────────┐
//!        ▼         ▼         ▼
//!   ┌────────┐┌────────┐┌────────┐
//!   │Worker 0││Worker 1││Worker N│  own generator + adapter
//!   └────┬───┘└────┬───┘└────┬───┘
//!        └─────────┼─────────┘
//!                  ▼  join barrier
//!           ┌─────────────┐
//!           │  aggregate  │  AggregateReport
//!           └─────────────┘
//! ```
//!
//! Workers share no mutable state. A run either completes with a full
//! [`AggregateReport`] or fails with the first worker failure observed.

pub mod adapter;
pub mod aggregator;
pub mod environment;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod planner;
pub mod pool;
pub mod progress;
pub mod worker;

pub use adapter::{AdapterFactory, OperationResult, StorageAdapter};
pub use aggregator::{aggregate, format_table};
pub use environment::{available_parallelism_units, log_runtime_environment};
pub use error::{EngineError, RunFailure, StorageError, WorkerError, WorkerFailure};
pub use memory::{MemoryAdapter, MemoryStore};
pub use metrics::{AggregateReport, EnvironmentInfo, PartialCount, RunSummary, WorkerAssignment};
pub use planner::{describe_plan, plan_tasks, plan_tasks_with_units, TaskPlan, AUTO_PARALLELISM};
pub use pool::{FailurePolicy, WorkerPool};
pub use progress::{NoopProgress, ProgressSink, ReportSink, TracingProgress};
pub use worker::{run_worker, PROGRESS_INTERVAL};
