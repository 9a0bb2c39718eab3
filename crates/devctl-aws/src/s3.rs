use anyhow::{Context, Result};
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::DateTime as SmithyDateTime;
use aws_sdk_s3::types::{Bucket, Object};
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};

use devctl_types::{BucketInfo, InvalidInput, ObjectInfo};

/// S3 operations against the default credential chain
#[derive(Clone)]
pub struct S3Helper {
    client: Client,
}

impl S3Helper {
    /// Load credentials and region from the standard AWS chain, optionally
    /// overriding the region
    pub async fn connect(region: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        let config = loader.load().await;
        tracing::debug!(region = ?config.region(), "loaded AWS config");

        Self {
            client: Client::new(&config),
        }
    }

    /// All buckets owned by the caller
    pub async fn list_buckets(&self) -> Result<Vec<BucketInfo>> {
        let output = self
            .client
            .list_buckets()
            .send()
            .await
            .context("Unable to list buckets")?;

        Ok(output.buckets().iter().map(bucket_to_info).collect())
    }

    /// Every object under `prefix`, following continuation tokens
    pub async fn list_objects(
        &self,
        bucket: &str,
        prefix: Option<&str>,
    ) -> Result<Vec<ObjectInfo>> {
        let bucket = required_bucket(bucket)?;
        let mut objects = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let page = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .set_prefix(prefix.map(str::to_string))
                .set_continuation_token(continuation.take())
                .send()
                .await
                .with_context(|| format!("Unable to list objects in {}", bucket))?;

            objects.extend(page.contents().iter().map(object_to_info));

            match (page.is_truncated(), page.next_continuation_token()) {
                (Some(true), Some(token)) => continuation = Some(token.to_string()),
                _ => break,
            }
        }

        tracing::debug!(bucket, count = objects.len(), "listed objects");
        Ok(objects)
    }

    /// Raw policy document attached to a bucket
    pub async fn bucket_policy(&self, bucket: &str) -> Result<String> {
        let bucket = required_bucket(bucket)?;
        let output = self
            .client
            .get_bucket_policy()
            .bucket(bucket)
            .send()
            .await
            .with_context(|| format!("Unable to get bucket policy for {}", bucket))?;

        Ok(output.policy().unwrap_or_default().to_string())
    }
}

fn required_bucket(bucket: &str) -> Result<&str> {
    let bucket = bucket.trim();
    if bucket.is_empty() {
        return Err(InvalidInput("bucket name is required".into()).into());
    }
    Ok(bucket)
}

fn to_chrono(timestamp: &SmithyDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
}

fn bucket_to_info(bucket: &Bucket) -> BucketInfo {
    BucketInfo {
        name: bucket.name().unwrap_or_default().to_string(),
        created: bucket.creation_date().and_then(to_chrono),
    }
}

fn object_to_info(object: &Object) -> ObjectInfo {
    ObjectInfo {
        key: object.key().unwrap_or_default().to_string(),
        size: object.size().unwrap_or(0),
        last_modified: object.last_modified().and_then(to_chrono),
    }
}

/// Re-indent a JSON policy document; anything unparsable is returned as-is
pub fn pretty_policy(raw: &str) -> String {
    serde_json::from_str::<serde_json::Value>(raw)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| raw.to_string())
}
