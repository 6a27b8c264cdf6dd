//! MongoDB storage adapter and its per-worker factory.

use crate::error::MongoDBPopulatorError;
use crate::insert::{classify_error, family_to_document, read_number};
use async_trait::async_trait;
use bson::{doc, Document};
use clap::ValueEnum;
use datagen_engine::{AdapterFactory, OperationResult, StorageAdapter, StorageError};
use datagen_generator::Family;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use serde::Serialize;
use tracing::{debug, info};

/// Application name reported to the server.
pub const APP_NAME: &str = "docstore-datagen";

/// How the cost of an insert is measured.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CostModel {
    /// Read `RequestCharge` via `getLastRequestStatistics` (Cosmos DB)
    #[default]
    RequestStatistics,
    /// Charge 1.0 per insert (plain MongoDB)
    Unit,
}

/// Creates one client per worker.
///
/// Clients never retry reads or writes, so throttles surface as failures.
/// With [`CostModel::RequestStatistics`] each client holds a single
/// connection, since request statistics are tracked per connection.
pub struct MongoDBAdapterFactory {
    options: ClientOptions,
    database: String,
    collection: String,
    cost_model: CostModel,
}

impl MongoDBAdapterFactory {
    /// Parse the connection string and check the backend answers.
    pub async fn connect(
        connection_string: &str,
        database: &str,
        collection: &str,
        cost_model: CostModel,
    ) -> Result<Self, MongoDBPopulatorError> {
        if database.is_empty() || collection.is_empty() {
            return Err(MongoDBPopulatorError::Config(
                "database and collection names must not be empty".to_string(),
            ));
        }

        let mut options = ClientOptions::parse(connection_string).await?;
        options.app_name = Some(APP_NAME.to_string());
        options.retry_writes = Some(false);
        options.retry_reads = Some(false);
        if cost_model == CostModel::RequestStatistics {
            options.max_pool_size = Some(1);
        }

        // Test connection
        let client = Client::with_options(options.clone())?;
        client.database(database).run_command(doc! { "ping": 1 }).await?;
        info!("Connected to database: {}", database);

        Ok(Self {
            options,
            database: database.to_string(),
            collection: collection.to_string(),
            cost_model,
        })
    }

    pub fn cost_model(&self) -> CostModel {
        self.cost_model
    }

    /// Read the collection's provisioned throughput (Cosmos DB).
    pub async fn provisioned_throughput(&self) -> Result<i64, MongoDBPopulatorError> {
        let client = Client::with_options(self.options.clone())?;
        let response = client
            .database(&self.database)
            .run_command(doc! {
                "customAction": "GetCollection",
                "collection": self.collection.as_str(),
            })
            .await?;

        read_number(&response, "provisionedThroughput")
            .map(|throughput| throughput as i64)
            .ok_or_else(|| MongoDBPopulatorError::ThroughputNotConfigured {
                collection: self.collection.clone(),
            })
    }
}

#[async_trait]
impl AdapterFactory for MongoDBAdapterFactory {
    type Adapter = MongoDBAdapter;

    async fn create(&self, worker_id: u32) -> Result<MongoDBAdapter, StorageError> {
        let client = Client::with_options(self.options.clone()).map_err(|e| classify_error(&e))?;
        debug!("Created client for task {}", worker_id);

        let database = client.database(&self.database);
        Ok(MongoDBAdapter {
            collection: database.collection(&self.collection),
            database,
            cost_model: self.cost_model,
        })
    }
}

/// Inserts families into one collection.
pub struct MongoDBAdapter {
    database: Database,
    collection: Collection<Document>,
    cost_model: CostModel,
}

impl MongoDBAdapter {
    async fn last_request_charge(&self) -> Result<f64, StorageError> {
        let stats = self
            .database
            .run_command(doc! { "getLastRequestStatistics": 1 })
            .await
            .map_err(|e| classify_error(&e))?;

        read_number(&stats, "RequestCharge").ok_or_else(|| {
            StorageError::Unknown("getLastRequestStatistics returned no RequestCharge".to_string())
        })
    }
}

#[async_trait]
impl StorageAdapter for MongoDBAdapter {
    async fn insert(
        &self,
        document: &Family,
        partition_key: &str,
    ) -> Result<OperationResult, StorageError> {
        let bson_document = family_to_document(document)
            .map_err(|e| StorageError::Unknown(format!("Failed to encode document: {e}")))?;

        if let Err(e) = self.collection.insert_one(bson_document).await {
            let error = classify_error(&e);
            debug!(
                "Insert into partition {} failed ({}): {}",
                partition_key,
                error.kind(),
                e
            );
            return Err(error);
        }

        let cost_units = match self.cost_model {
            CostModel::Unit => 1.0,
            CostModel::RequestStatistics => self.last_request_charge().await?,
        };

        Ok(OperationResult { cost_units })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cost_model() {
        assert_eq!(CostModel::default(), CostModel::RequestStatistics);
    }

    #[tokio::test]
    async fn test_connect_rejects_empty_names() {
        let result = MongoDBAdapterFactory::connect(
            "mongodb://localhost:27017",
            "",
            "data",
            CostModel::Unit,
        )
        .await;

        assert!(matches!(result, Err(MongoDBPopulatorError::Config(_))));
    }

    #[tokio::test]
    async fn test_connect_rejects_bad_uri() {
        let result =
            MongoDBAdapterFactory::connect("not-a-uri", "db", "data", CostModel::Unit).await;

        assert!(matches!(result, Err(MongoDBPopulatorError::MongoDB(_))));
    }
}
