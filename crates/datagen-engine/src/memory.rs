//! In-process document store.
//!
//! Used by the `populate memory` backend and by tests. It keeps ids and
//! per-partition counts, rejects duplicate ids like a real container would,
//! and can be told to fail a given worker after N inserts.

use crate::adapter::{AdapterFactory, OperationResult, StorageAdapter};
use crate::error::StorageError;
use async_trait::async_trait;
use datagen_generator::Family;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Flat charge per insert when none is configured.
pub const DEFAULT_COST_PER_INSERT: f64 = 1.0;

#[derive(Default)]
struct MemoryState {
    ids: HashSet<String>,
    partitions: HashMap<String, u64>,
}

#[derive(Debug, Clone)]
struct Fault {
    after: u64,
    error: StorageError,
}

/// Shared in-memory container. Cloning shares the underlying data.
#[derive(Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    cost_per_insert: f64,
    insert_delay: Option<Duration>,
    faults: HashMap<u32, Fault>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            cost_per_insert: DEFAULT_COST_PER_INSERT,
            insert_delay: None,
            faults: HashMap::new(),
        }
    }

    /// Set the cost units charged for each insert.
    pub fn with_cost_per_insert(mut self, cost: f64) -> Self {
        self.cost_per_insert = cost;
        self
    }

    /// Sleep before every insert, to simulate network latency.
    pub fn with_insert_delay(mut self, delay: Duration) -> Self {
        self.insert_delay = Some(delay);
        self
    }

    /// Make `worker_id`'s adapter fail with `error` once it has completed
    /// `after` inserts.
    pub fn fail_worker_after(mut self, worker_id: u32, after: u64, error: StorageError) -> Self {
        self.faults.insert(worker_id, Fault { after, error });
        self
    }

    /// Number of documents stored.
    pub fn document_count(&self) -> u64 {
        self.lock().map(|s| s.ids.len() as u64).unwrap_or(0)
    }

    /// Number of distinct partition key values stored.
    pub fn partition_count(&self) -> usize {
        self.lock().map(|s| s.partitions.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|_| StorageError::Unknown("memory store lock poisoned".to_string()))
    }

    fn store(&self, document: &Family, partition_key: &str) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        if !state.ids.insert(document.id.clone()) {
            return Err(StorageError::Unknown(format!(
                "conflict: document {} already exists",
                document.id
            )));
        }
        *state
            .partitions
            .entry(partition_key.to_string())
            .or_insert(0) += 1;
        Ok(())
    }
}

#[async_trait]
impl AdapterFactory for MemoryStore {
    type Adapter = MemoryAdapter;

    async fn create(&self, worker_id: u32) -> Result<MemoryAdapter, StorageError> {
        Ok(MemoryAdapter {
            store: self.clone(),
            fault: self.faults.get(&worker_id).cloned(),
            completed: AtomicU64::new(0),
        })
    }
}

/// Per-worker handle on a [`MemoryStore`].
pub struct MemoryAdapter {
    store: MemoryStore,
    fault: Option<Fault>,
    completed: AtomicU64,
}

#[async_trait]
impl StorageAdapter for MemoryAdapter {
    async fn insert(
        &self,
        document: &Family,
        partition_key: &str,
    ) -> Result<OperationResult, StorageError> {
        if let Some(delay) = self.store.insert_delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(fault) = &self.fault {
            if self.completed.load(Ordering::Relaxed) >= fault.after {
                return Err(fault.error.clone());
            }
        }

        self.store.store(document, partition_key)?;
        self.completed.fetch_add(1, Ordering::Relaxed);

        Ok(OperationResult {
            cost_units: self.store.cost_per_insert,
        })
    }
}
