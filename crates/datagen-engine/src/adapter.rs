//! Storage adapter contract consumed by workers.

use crate::error::StorageError;
use async_trait::async_trait;
use datagen_generator::Family;

/// Backend-reported outcome of a single insert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperationResult {
    pub cost_units: f64,
}

/// Single-item insert against an already-provisioned container.
///
/// Implementations must not retry throttled requests: a throttle is
/// returned as [`StorageError::Throttled`] so it shows up in the run result.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    async fn insert(
        &self,
        document: &Family,
        partition_key: &str,
    ) -> Result<OperationResult, StorageError>;
}

/// Creates the adapter owned by one worker.
#[async_trait]
pub trait AdapterFactory: Send + Sync {
    type Adapter: StorageAdapter + 'static;

    async fn create(&self, worker_id: u32) -> Result<Self::Adapter, StorageError>;
}
