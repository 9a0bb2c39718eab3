//! AWS helpers for devctl
//!
//! S3 listing and policy inspection on top of `aws-sdk-s3`.

mod s3;

pub use s3::{S3Helper, pretty_policy};

// Re-export types used in our public API
pub use devctl_types::{BucketInfo, InvalidInput, ObjectInfo};
