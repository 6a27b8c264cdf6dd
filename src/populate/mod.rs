//! Populate command handlers.
//!
//! Resolves backend capacity, plans the run, executes the worker pool and
//! hands the aggregated report to the configured sinks.

pub mod logging;
pub mod report;
pub mod run;

use clap::{Args, Subcommand};
use datagen_populate::CommonPopulateArgs;
use datagen_populate_mongodb::MongoDBPopulateArgs;

pub use logging::mask_connection_password;
pub use report::{JsonReportFile, PopulateRunReport, TableReport};
pub use run::{execute_plan, execute_populate, plan_run, run_populate, PopulateOutcome};

/// In-memory backend arguments.
#[derive(Args, Clone, Debug)]
pub struct MemoryPopulateArgs {
    /// Cost units charged for each insert
    #[arg(long, default_value_t = datagen_engine::memory::DEFAULT_COST_PER_INSERT)]
    pub cost_per_insert: f64,

    #[command(flatten)]
    pub common: CommonPopulateArgs,
}

/// Backend to populate with synthetic documents
#[derive(Subcommand, Clone, Debug)]
pub enum PopulateBackend {
    /// Populate a MongoDB wire-protocol collection (e.g. Azure Cosmos DB for MongoDB)
    #[command(name = "mongodb")]
    MongoDB {
        #[command(flatten)]
        args: MongoDBPopulateArgs,
    },
    /// Populate an in-process store (no network, for sizing and smoke tests)
    #[command(name = "memory")]
    Memory {
        #[command(flatten)]
        args: MemoryPopulateArgs,
    },
}
