//! Command-line interface for docstore-datagen
//!
//! # Usage Examples
//!
//! ```bash
//! # Cosmos DB for MongoDB, throughput read from the collection
//! docstore-datagen populate mongodb \
//!   --mongodb-connection-string "$CONNECTION_STRING" \
//!   -n 200000
//!
//! # Plain MongoDB, fixed 8 workers, flat cost per insert
//! docstore-datagen populate mongodb \
//!   --mongodb-connection-string mongodb://localhost:27017 \
//!   --cost-model unit -t 4000 --dp 8
//!
//! # In-memory dry run
//! docstore-datagen populate memory -t 10000 --dry-run
//! ```

use clap::{Parser, Subcommand};
use docstore_datagen::{run_populate, PopulateBackend};

#[derive(Parser)]
#[command(name = "docstore-datagen")]
#[command(about = "Generate synthetic documents and insert them in parallel into a document store")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert synthetic documents into a backend
    Populate {
        #[command(subcommand)]
        backend: PopulateBackend,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Populate { backend } => run_populate(backend).await,
    }
}
