//! Error types for the MongoDB populator.

use thiserror::Error;

/// Errors raised while connecting to or inspecting the backend.
#[derive(Error, Debug)]
pub enum MongoDBPopulatorError {
    /// MongoDB connection or command error.
    #[error("MongoDB error: {0}")]
    MongoDB(#[from] mongodb::error::Error),

    /// The collection has no dedicated throughput to plan against.
    #[error("Collection '{collection}' must have a configured throughput (pass --throughput to override)")]
    ThroughputNotConfigured { collection: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
