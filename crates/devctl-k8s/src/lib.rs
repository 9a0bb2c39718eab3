//! Kubernetes helpers for devctl
//!
//! This crate provides kubeconfig inspection, pod listing, deployment
//! restarts and log tailing through the Kubernetes API, plus context switching
//! through `kubectl`.

mod client;
mod kubectl;

pub use client::{
    KubeClient, LogOptions, default_client, list_pods, pod_to_info, restart_deployment,
    stream_logs,
};
pub use kubectl::Kubectl;

// Re-export types that are used in our public API
pub use devctl_types::{ContainerInfo, ContextInfo, InvalidInput, PodInfo, PodStatus};
