//! Populate command runner.

use super::logging::{mask_connection_password, Parameters};
use super::report::{JsonReportFile, TableReport};
use super::PopulateBackend;
use anyhow::Context;
use datagen_engine::{
    aggregate, describe_plan, log_runtime_environment, plan_tasks, AdapterFactory,
    AggregateReport, MemoryStore, ProgressSink, ReportSink, TaskPlan, TracingProgress, WorkerPool,
};
use datagen_generator::DocumentGenerator;
use datagen_populate::{CommonPopulateArgs, DEFAULT_THROUGHPUT};
use datagen_populate_mongodb::MongoDBAdapterFactory;
use std::sync::Arc;
use tracing::{info, warn};

/// Plan and (unless dry-run) report of one populate run.
#[derive(Debug, Clone)]
pub struct PopulateOutcome {
    pub plan: TaskPlan,
    /// `None` for dry runs
    pub report: Option<AggregateReport>,
}

/// Run populate command against the selected backend.
pub async fn run_populate(backend: PopulateBackend) -> anyhow::Result<()> {
    let environment = log_runtime_environment();

    let (common, outcome) = match backend {
        PopulateBackend::Memory { args } => {
            info!(
                "Parameters:\n{}",
                Parameters {
                    backend: "memory",
                    connection: None,
                    database: None,
                    collection: None,
                    common: &args.common,
                }
                .to_json()
            );

            let capacity = args.common.throughput.unwrap_or(DEFAULT_THROUGHPUT);
            let store = MemoryStore::new().with_cost_per_insert(args.cost_per_insert);
            let outcome =
                execute_populate(&args.common, capacity, store.clone(), Arc::new(TracingProgress))
                    .await?;

            if outcome.report.is_some() {
                info!(
                    "Memory store holds {} documents in {} partitions",
                    store.document_count(),
                    store.partition_count()
                );
            }
            (args.common, outcome)
        }
        PopulateBackend::MongoDB { args } => {
            let masked = mask_connection_password(&args.mongodb_connection_string);
            info!(
                "Parameters:\n{}",
                Parameters {
                    backend: "mongodb",
                    connection: Some(masked.clone()),
                    database: Some(args.mongodb_database.as_str()),
                    collection: Some(args.mongodb_collection.as_str()),
                    common: &args.common,
                }
                .to_json()
            );

            if args.common.dry_run {
                let capacity = args.common.throughput.unwrap_or_else(|| {
                    warn!(
                        "[DRY-RUN] No --throughput given, planning with {}",
                        DEFAULT_THROUGHPUT
                    );
                    DEFAULT_THROUGHPUT
                });
                info!("[DRY-RUN] Connection: {}", masked);
                let plan = plan_run(&args.common, capacity)?;
                info!("[DRY-RUN] Plan validated, nothing inserted");
                (args.common, PopulateOutcome { plan, report: None })
            } else {
                let factory = MongoDBAdapterFactory::connect(
                    &args.mongodb_connection_string,
                    &args.mongodb_database,
                    &args.mongodb_collection,
                    args.cost_model,
                )
                .await
                .with_context(|| format!("Failed to connect to {masked}"))?;

                let capacity = match args.common.throughput {
                    Some(throughput) => throughput,
                    None => factory.provisioned_throughput().await.with_context(|| {
                        format!(
                            "Failed to read throughput of collection {}",
                            args.mongodb_collection
                        )
                    })?,
                };
                info!(
                    "Using collection {} with {} capacity units",
                    args.mongodb_collection, capacity
                );

                let outcome =
                    execute_populate(&args.common, capacity, factory, Arc::new(TracingProgress))
                        .await?;
                (args.common, outcome)
            }
        }
    };

    if let Some(report) = &outcome.report {
        TableReport
            .on_report(report)
            .context("Failed to print report")?;

        if let Some(path) = &common.report_json {
            JsonReportFile {
                path: path.clone(),
                environment,
                plan: outcome.plan,
            }
            .on_report(report)
            .with_context(|| format!("Failed to write report to {path:?}"))?;
        }
        info!("done");
    }

    Ok(())
}

/// Plan a run and log what will (and will not) be inserted.
pub fn plan_run(common: &CommonPopulateArgs, backend_capacity: i64) -> anyhow::Result<TaskPlan> {
    let plan = plan_tasks(common.parallelism, backend_capacity, common.item_count)?;

    info!("Ready to insert with {}", describe_plan(&plan));
    if plan.dropped_items > 0 {
        warn!(
            "{} items do not divide evenly across {} tasks and will not be inserted",
            plan.dropped_items, plan.task_count
        );
    }

    Ok(plan)
}

/// Run every assignment of `plan` and aggregate the results.
///
/// Fails with the pool's [`datagen_engine::RunFailure`] if any worker
/// failed; no partial report is produced.
pub async fn execute_plan<F>(
    common: &CommonPopulateArgs,
    plan: &TaskPlan,
    factory: F,
    progress: Arc<dyn ProgressSink>,
) -> anyhow::Result<AggregateReport>
where
    F: AdapterFactory + 'static,
{
    let seed = common.seed;
    let pool = WorkerPool::new(common.failure_policy.into()).with_progress(progress);

    match pool
        .execute(plan.assignments(), Arc::new(factory), move |worker_id| {
            DocumentGenerator::for_worker(seed, worker_id)
        })
        .await
    {
        Ok(summaries) => Ok(aggregate(summaries)),
        Err(failure) => {
            for partial in &failure.partial {
                warn!(
                    "Task Id:{} Inserts:{} Cost units:{:.2} ({})",
                    partial.worker_id,
                    partial.inserted_count,
                    partial.total_cost_units,
                    if partial.completed {
                        "completed"
                    } else {
                        "stopped"
                    }
                );
            }
            Err(failure.into())
        }
    }
}

/// Plan, then execute unless this is a dry run.
pub async fn execute_populate<F>(
    common: &CommonPopulateArgs,
    backend_capacity: i64,
    factory: F,
    progress: Arc<dyn ProgressSink>,
) -> anyhow::Result<PopulateOutcome>
where
    F: AdapterFactory + 'static,
{
    let plan = plan_run(common, backend_capacity)?;

    if common.dry_run {
        info!(
            "[DRY-RUN] Would insert {} documents with {} tasks",
            plan.planned_items(),
            plan.task_count
        );
        return Ok(PopulateOutcome { plan, report: None });
    }

    let report = execute_plan(common, &plan, factory, progress).await?;
    info!(
        "Inserted {} documents for {:.2} cost units ({:.1} inserts/sec)",
        report.total_inserted, report.total_cost_units, report.inserts_per_second
    );

    Ok(PopulateOutcome {
        plan,
        report: Some(report),
    })
}
