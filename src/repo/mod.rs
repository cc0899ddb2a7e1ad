//! Repository layer over the DynamoDB launches table
use crate::config::StorageConfig;
use crate::domain::LaunchRecord;
use crate::errors::StorageError;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::types::{AttributeValue, PutRequest, WriteRequest};
use aws_sdk_dynamodb::Client as DynamoDbClient;
use std::collections::HashMap;
use std::time::Duration;

/// Partition key attribute of the launches table
pub const KEY_ATTRIBUTE: &str = "launch_id";

/// DynamoDB caps BatchWriteItem at 25 requests
const BATCH_WRITE_LIMIT: usize = 25;

/// Resend attempts for items DynamoDB reports as unprocessed
const UNPROCESSED_RETRIES: u32 = 3;

type Item = HashMap<String, AttributeValue>;

/// Read access to stored launches.
///
/// Implemented by [`DynamoLaunchRepository`] in production and by in-memory
/// fakes in tests.
#[async_trait]
pub trait LaunchRepository: Send + Sync {
    /// Fetch one launch by id; `Ok(None)` when it does not exist
    async fn get_by_key(&self, id: &str) -> Result<Option<LaunchRecord>, StorageError>;

    /// Read the whole table in storage order
    async fn scan_all(&self) -> Result<Vec<LaunchRecord>, StorageError>;
}

/// Write access, used only by the ingest job
#[async_trait]
pub trait LaunchWriter: Send + Sync {
    /// Upsert every record, returning how many were written
    async fn put_all(&self, records: &[LaunchRecord]) -> Result<usize, StorageError>;
}

/// DynamoDB implementation of the launch repository
#[derive(Debug, Clone)]
pub struct DynamoLaunchRepository {
    client: DynamoDbClient,
    table_name: String,
}

impl DynamoLaunchRepository {
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        Self { client, table_name }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Send one BatchWriteItem chunk, resending unprocessed items
    async fn write_chunk(&self, mut requests: Vec<WriteRequest>) -> Result<(), StorageError> {
        let mut attempt = 0;

        loop {
            let response = self
                .client
                .batch_write_item()
                .request_items(&self.table_name, requests)
                .send()
                .await
                .map_err(|e| StorageError::Write(e.into_service_error().to_string()))?;

            let unprocessed = response
                .unprocessed_items
                .and_then(|mut items| items.remove(&self.table_name))
                .unwrap_or_default();

            if unprocessed.is_empty() {
                return Ok(());
            }

            attempt += 1;
            if attempt > UNPROCESSED_RETRIES {
                return Err(StorageError::Write(format!(
                    "{} items still unprocessed after {} retries",
                    unprocessed.len(),
                    UNPROCESSED_RETRIES
                )));
            }

            tracing::warn!(
                unprocessed = unprocessed.len(),
                attempt,
                "Resending unprocessed items"
            );
            tokio::time::sleep(Duration::from_millis(100 * 2u64.pow(attempt))).await;
            requests = unprocessed;
        }
    }
}

/// Build a DynamoDB client from the default AWS credential chain
pub async fn connect(config: &StorageConfig) -> DynamoDbClient {
    let shared = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .load()
        .await;

    let mut builder = aws_sdk_dynamodb::config::Builder::from(&shared);
    if let Some(endpoint) = &config.endpoint_url {
        tracing::info!(endpoint = %endpoint, "Using custom DynamoDB endpoint");
        builder = builder.endpoint_url(endpoint);
    }

    DynamoDbClient::from_conf(builder.build())
}

/// Decode a raw item into a record
pub fn record_from_item(item: Item) -> Result<LaunchRecord, StorageError> {
    serde_dynamo::from_item(item).map_err(|e| StorageError::Decode(e.to_string()))
}

/// Encode a record into a raw item, leaving out null attributes
pub fn item_from_record(record: &LaunchRecord) -> Result<Item, StorageError> {
    let mut item: Item =
        serde_dynamo::to_item(record).map_err(|e| StorageError::Decode(e.to_string()))?;
    item.retain(|_, value| !matches!(value, AttributeValue::Null(_)));
    Ok(item)
}

#[async_trait]
impl LaunchRepository for DynamoLaunchRepository {
    async fn get_by_key(&self, id: &str) -> Result<Option<LaunchRecord>, StorageError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(KEY_ATTRIBUTE, AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| StorageError::Read(e.into_service_error().to_string()))?;

        result.item.map(record_from_item).transpose()
    }

    async fn scan_all(&self) -> Result<Vec<LaunchRecord>, StorageError> {
        let mut records = Vec::new();
        let mut exclusive_start_key: Option<Item> = None;

        loop {
            let response = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(exclusive_start_key.take())
                .send()
                .await
                .map_err(|e| StorageError::Read(e.into_service_error().to_string()))?;

            for item in response.items.unwrap_or_default() {
                records.push(record_from_item(item)?);
            }

            match response.last_evaluated_key {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key),
                _ => break,
            }
        }

        tracing::debug!(table = %self.table_name, count = records.len(), "Scanned launches");
        Ok(records)
    }
}

#[async_trait]
impl LaunchWriter for DynamoLaunchRepository {
    async fn put_all(&self, records: &[LaunchRecord]) -> Result<usize, StorageError> {
        let mut written = 0;

        for chunk in records.chunks(BATCH_WRITE_LIMIT) {
            let requests = chunk
                .iter()
                .map(|record| -> Result<WriteRequest, StorageError> {
                    let put = PutRequest::builder()
                        .set_item(Some(item_from_record(record)?))
                        .build()
                        .map_err(|e| StorageError::Write(e.to_string()))?;
                    Ok(WriteRequest::builder().put_request(put).build())
                })
                .collect::<Result<Vec<_>, _>>()?;

            self.write_chunk(requests).await?;
            written += chunk.len();
        }

        Ok(written)
    }
}
