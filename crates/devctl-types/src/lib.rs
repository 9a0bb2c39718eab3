//! Shared types for devctl
//!
//! This crate contains the plain data structures the helper crates copy out of
//! Kubernetes and AWS responses before the CLI prints them.

use chrono::{DateTime, Utc};
use thiserror::Error;

// ============================================================================
// Kubernetes Resource Types
// ============================================================================

/// Kubernetes context information
#[derive(Clone, Debug)]
pub struct ContextInfo {
    pub name: String,
    pub cluster: String,
    pub user: String,
    pub namespace: Option<String>,
    pub is_current: bool,
}

impl ContextInfo {
    pub fn new(
        name: String,
        cluster: String,
        user: String,
        namespace: Option<String>,
        is_current: bool,
    ) -> Self {
        Self {
            name,
            cluster,
            user,
            namespace,
            is_current,
        }
    }
}

/// Pod information
#[derive(Clone, Debug)]
pub struct PodInfo {
    pub name: String,
    pub namespace: String,
    pub status: PodStatus,
    pub containers: Vec<ContainerInfo>,
    pub node_name: Option<String>,
    pub pod_ip: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
}

impl PodInfo {
    pub fn new(name: String, namespace: String) -> Self {
        Self {
            name,
            namespace,
            status: PodStatus::Unknown,
            containers: Vec::new(),
            node_name: None,
            pod_ip: None,
            started_at: None,
        }
    }

    /// Format container readiness as "ready/total"
    pub fn ready_status(&self) -> String {
        let ready = self.containers.iter().filter(|c| c.ready).count();
        format!("{}/{}", ready, self.containers.len())
    }

    /// Sum of restarts across all containers
    pub fn restarts(&self) -> i32 {
        self.containers.iter().map(|c| c.restart_count).sum()
    }

    /// Compact age ("3d", "5h", "12m", "40s") relative to `now`
    pub fn age(&self, now: DateTime<Utc>) -> Option<String> {
        let started = self.started_at?;
        let secs = (now - started).num_seconds().max(0);
        Some(match secs {
            s if s >= 86_400 => format!("{}d", s / 86_400),
            s if s >= 3_600 => format!("{}h", s / 3_600),
            s if s >= 60 => format!("{}m", s / 60),
            s => format!("{}s", s),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PodStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

impl PodStatus {
    /// Status marker printed in front of a pod name
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Running => "🟢",
            Self::Pending => "🟡",
            Self::Succeeded => "✅",
            Self::Failed => "🔴",
            Self::Unknown => "⚪",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Running => "Running",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Unknown => "Unknown",
        }
    }
}

impl From<&str> for PodStatus {
    fn from(s: &str) -> Self {
        match s {
            "Pending" => Self::Pending,
            "Running" => Self::Running,
            "Succeeded" => Self::Succeeded,
            "Failed" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for PodStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct ContainerInfo {
    pub name: String,
    pub ready: bool,
    pub restart_count: i32,
}

impl ContainerInfo {
    pub fn new(name: String) -> Self {
        Self {
            name,
            ready: false,
            restart_count: 0,
        }
    }
}

// ============================================================================
// S3 Types
// ============================================================================

/// An S3 bucket as returned by ListBuckets
#[derive(Clone, Debug)]
pub struct BucketInfo {
    pub name: String,
    pub created: Option<DateTime<Utc>>,
}

/// A single object key inside a bucket
#[derive(Clone, Debug)]
pub struct ObjectInfo {
    pub key: String,
    pub size: i64,
    pub last_modified: Option<DateTime<Utc>>,
}

// ============================================================================
// Errors
// ============================================================================

/// A required argument was blank. Raised before any cluster or AWS call.
#[derive(Debug, Error)]
#[error("invalid input: {0}")]
pub struct InvalidInput(pub String);
