//! MongoDB storage adapter for docstore-datagen.
//!
//! Targets any MongoDB wire-protocol backend. Against Azure Cosmos DB for
//! MongoDB the adapter also reads per-request charges and the collection's
//! provisioned throughput.

pub mod adapter;
pub mod args;
pub mod error;
pub mod insert;

pub use adapter::{CostModel, MongoDBAdapter, MongoDBAdapterFactory, APP_NAME};
pub use args::MongoDBPopulateArgs;
pub use error::MongoDBPopulatorError;
