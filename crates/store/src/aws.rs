//! AWS-backed store implementations: S3 for objects, DynamoDB for records.
//!
//! Clients are built from the standard AWS credential chain. A custom
//! endpoint can be configured for LocalStack-style local testing; in that
//! case S3 path-style addressing is enabled, since virtual-hosted buckets
//! do not resolve against a local endpoint.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_s3::primitives::ByteStream;
use chrono::{DateTime, Utc};
use common::{ProductId, ProductRecord};

use crate::error::{Result, StoreError};
use crate::object::{ObjectKey, ObjectLocation, ObjectStore};
use crate::record::RecordStore;

/// Connection settings for the AWS-backed stores.
#[derive(Debug, Clone, Default)]
pub struct AwsStoreConfig {
    /// AWS region; falls back to the environment when unset.
    pub region: Option<String>,
    /// Custom endpoint URL for local testing against LocalStack or MinIO.
    pub endpoint_url: Option<String>,
}

async fn load_sdk_config(config: &AwsStoreConfig) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(ref region) = config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(ref endpoint) = config.endpoint_url {
        loader = loader.endpoint_url(endpoint.clone());
    }
    loader.load().await
}

/// Object store backed by an S3 bucket.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Builds an S3 client for the given bucket.
    pub async fn connect(bucket: impl Into<String>, config: &AwsStoreConfig) -> Self {
        let sdk_config = load_sdk_config(config).await;
        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if config.endpoint_url.is_some() {
            builder = builder.force_path_style(true);
        }

        Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            bucket: bucket.into(),
        }
    }

    /// Returns the bucket name this store addresses.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(
        &self,
        key: &ObjectKey,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<ObjectLocation> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StoreError::backend("s3 put_object", e))?;

        tracing::debug!(bucket = %self.bucket, %key, content_type, "object uploaded");
        Ok(self.location_for(key))
    }

    async fn delete(&self, key: &ObjectKey) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .send()
            .await
            .map_err(|e| StoreError::backend("s3 delete_object", e))?;

        tracing::debug!(bucket = %self.bucket, %key, "object deleted");
        Ok(())
    }

    fn location_for(&self, key: &ObjectKey) -> ObjectLocation {
        ObjectLocation::for_bucket(&self.bucket, key)
    }

    fn key_for_location(&self, location: &ObjectLocation) -> Option<ObjectKey> {
        location.key_suffix()
    }
}

/// Record store backed by a DynamoDB table keyed on `id`.
#[derive(Debug, Clone)]
pub struct DynamoRecordStore {
    client: aws_sdk_dynamodb::Client,
    table: String,
}

impl DynamoRecordStore {
    /// Builds a DynamoDB client for the given table.
    pub async fn connect(table: impl Into<String>, config: &AwsStoreConfig) -> Self {
        let sdk_config = load_sdk_config(config).await;

        Self {
            client: aws_sdk_dynamodb::Client::new(&sdk_config),
            table: table.into(),
        }
    }

    /// Returns the table name this store addresses.
    pub fn table(&self) -> &str {
        &self.table
    }
}

fn to_item(record: &ProductRecord) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            "id".to_string(),
            AttributeValue::S(record.id.to_string()),
        ),
        ("name".to_string(), AttributeValue::S(record.name.clone())),
        (
            "description".to_string(),
            AttributeValue::S(record.description.clone()),
        ),
        (
            "price".to_string(),
            AttributeValue::N(record.price.to_string()),
        ),
        (
            "imageUrl".to_string(),
            AttributeValue::S(record.image_url.clone()),
        ),
        (
            "createdAt".to_string(),
            AttributeValue::S(record.created_at.to_rfc3339()),
        ),
        (
            "updatedAt".to_string(),
            AttributeValue::S(record.updated_at.to_rfc3339()),
        ),
    ])
}

fn get_string(item: &HashMap<String, AttributeValue>, name: &str) -> Result<String> {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| StoreError::MalformedRecord(format!("missing string attribute '{name}'")))
}

fn get_timestamp(item: &HashMap<String, AttributeValue>, name: &str) -> Result<DateTime<Utc>> {
    let raw = get_string(item, name)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::MalformedRecord(format!("bad timestamp in '{name}': {e}")))
}

fn from_item(item: &HashMap<String, AttributeValue>) -> Result<ProductRecord> {
    let id = get_string(item, "id")?
        .parse::<ProductId>()
        .map_err(|e| StoreError::MalformedRecord(format!("bad product id: {e}")))?;

    let price = item
        .get("price")
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse::<f64>().ok())
        .ok_or_else(|| StoreError::MalformedRecord("missing numeric attribute 'price'".into()))?;

    Ok(ProductRecord {
        id,
        name: get_string(item, "name")?,
        description: get_string(item, "description")?,
        price,
        image_url: get_string(item, "imageUrl")?,
        created_at: get_timestamp(item, "createdAt")?,
        updated_at: get_timestamp(item, "updatedAt")?,
    })
}

#[async_trait]
impl RecordStore for DynamoRecordStore {
    async fn put(&self, record: ProductRecord) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(to_item(&record)))
            .send()
            .await
            .map_err(|e| StoreError::backend("dynamodb put_item", e))?;

        Ok(())
    }

    async fn get(&self, id: ProductId) -> Result<Option<ProductRecord>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| StoreError::backend("dynamodb get_item", e))?;

        output.item.as_ref().map(from_item).transpose()
    }

    async fn scan(&self) -> Result<Vec<ProductRecord>> {
        let mut pages = self
            .client
            .scan()
            .table_name(&self.table)
            .into_paginator()
            .items()
            .send();

        let mut records = Vec::new();
        while let Some(item) = pages.next().await {
            let item = item.map_err(|e| StoreError::backend("dynamodb scan", e))?;
            records.push(from_item(&item)?);
        }

        Ok(records)
    }

    async fn delete(&self, id: ProductId) -> Result<()> {
        self.client
            .delete_item()
            .table_name(&self.table)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| StoreError::backend("dynamodb delete_item", e))?;

        Ok(())
    }
}
