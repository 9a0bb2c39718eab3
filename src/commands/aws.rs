use anyhow::Result;
use devctl_aws::{BucketInfo, ObjectInfo, S3Helper, pretty_policy};

use crate::cli::{AwsArgs, AwsCommand};
use crate::config::AwsConfig;

pub async fn run(args: AwsArgs, config: &AwsConfig) -> Result<()> {
    let region = args.region.or_else(|| config.region.clone());
    let s3 = S3Helper::connect(region.as_deref()).await;

    match args.command {
        AwsCommand::ListS3 => {
            for bucket in s3.list_buckets().await? {
                println!("{}", bucket_line(&bucket));
            }
        }
        AwsCommand::ListBucketObjects { bucket, prefix } => {
            for object in s3.list_objects(&bucket, prefix.as_deref()).await? {
                println!("{}", object_line(&object));
            }
        }
        AwsCommand::DisplayBucketPolicy { bucket } => {
            let policy = s3.bucket_policy(&bucket).await?;
            println!("🪣 Bucket Policy for {}:\n{}", bucket, pretty_policy(&policy));
        }
    }
    Ok(())
}

fn bucket_line(bucket: &BucketInfo) -> String {
    match bucket.created {
        Some(created) => format!(
            "🪣 {}  (created {})",
            bucket.name,
            created.format("%Y-%m-%d")
        ),
        None => format!("🪣 {}", bucket.name),
    }
}

fn object_line(object: &ObjectInfo) -> String {
    match object.last_modified {
        Some(modified) => format!(
            "📦 {}  ({} bytes, modified {})",
            object.key,
            object.size,
            modified.format("%Y-%m-%d %H:%M")
        ),
        None => format!("📦 {}  ({} bytes)", object.key, object.size),
    }
}
