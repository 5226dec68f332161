use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;

use crate::errors::{dependency, Result};
use crate::model::StatusEntry;
use crate::services::StatusStore;

pub struct DynamoStatusStore {
    client: Client,
    table: String,
}

impl DynamoStatusStore {
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        DynamoStatusStore {
            client,
            table: table.into(),
        }
    }
}

#[async_trait]
impl StatusStore for DynamoStatusStore {
    async fn append(&self, entry: &StatusEntry) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table)
            .item("uuid", AttributeValue::S(entry.id.to_string()))
            .item("action_graph", AttributeValue::S(entry.action_key.clone()))
            .item("date", AttributeValue::S(entry.date()))
            .item("status", AttributeValue::S(entry.status.as_str().to_string()))
            .send()
            .await
            .map_err(|e| dependency("failed to write website status", DisplayErrorContext(&e)))?;

        debug!(table = %self.table, id = %entry.id, action_graph = %entry.action_key, "status entry written");
        Ok(())
    }
}
