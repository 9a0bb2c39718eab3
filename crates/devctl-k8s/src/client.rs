use anyhow::{Context, Result};
use futures::{AsyncBufReadExt, TryStreamExt};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Pod;
use kube::Api;
use kube::api::{ListParams, LogParams};
use kube::config::{KubeConfigOptions, Kubeconfig};

use devctl_types::{ContainerInfo, ContextInfo, PodInfo, PodStatus};

/// Kubeconfig-backed client factory
pub struct KubeClient {
    kubeconfig: Kubeconfig,
    current_context: Option<String>,
}

impl KubeClient {
    /// Load the kubeconfig from `KUBECONFIG` or `~/.kube/config`
    pub fn new() -> Result<Self> {
        let kubeconfig =
            Kubeconfig::read().context("Failed to read kubeconfig. Is kubectl configured?")?;
        Ok(Self::from_kubeconfig(kubeconfig))
    }

    pub fn from_kubeconfig(kubeconfig: Kubeconfig) -> Self {
        let current_context = kubeconfig.current_context.clone();
        Self {
            kubeconfig,
            current_context,
        }
    }

    /// Get all available contexts from kubeconfig
    pub fn get_contexts(&self) -> Vec<ContextInfo> {
        self.kubeconfig
            .contexts
            .iter()
            .map(|ctx| {
                let context = ctx.context.as_ref();
                ContextInfo::new(
                    ctx.name.clone(),
                    context.map(|c| c.cluster.clone()).unwrap_or_default(),
                    context.and_then(|c| c.user.clone()).unwrap_or_default(),
                    context.and_then(|c| c.namespace.clone()),
                    Some(&ctx.name) == self.current_context.as_ref(),
                )
            })
            .collect()
    }

    /// Get the current context name
    pub fn current_context(&self) -> Option<&str> {
        self.current_context.as_deref()
    }
}

/// Client for the ambient cluster: in-cluster service account first, then the
/// kubeconfig's current context
pub async fn default_client() -> Result<kube::Client> {
    let config = match kube::Config::incluster() {
        Ok(config) => {
            tracing::debug!("using in-cluster configuration");
            config
        }
        Err(in_cluster) => {
            tracing::debug!(error = %in_cluster, "not in a cluster, falling back to kubeconfig");
            kube::Config::from_kubeconfig(&KubeConfigOptions::default())
                .await
                .context("Failed to load kubeconfig. Is kubectl configured?")?
        }
    };

    kube::Client::try_from(config).context("Failed to create Kubernetes client")
}

/// Fetch all pods in a namespace
pub async fn list_pods(client: &kube::Client, namespace: &str) -> Result<Vec<PodInfo>> {
    let pods: Api<Pod> = Api::namespaced(client.clone(), namespace);
    let list = pods
        .list(&ListParams::default())
        .await
        .context(format!("Failed to list pods in {}", namespace))?;

    Ok(list
        .items
        .into_iter()
        .map(|pod| pod_to_info(pod, namespace))
        .collect())
}

/// Convert a k8s Pod to PodInfo
pub fn pod_to_info(pod: Pod, namespace: &str) -> PodInfo {
    let name = pod.metadata.name.unwrap_or_default();
    let mut info = PodInfo::new(name, namespace.to_string());

    if let Some(spec) = &pod.spec {
        info.node_name = spec.node_name.clone();
    }

    if let Some(status) = pod.status {
        info.pod_ip = status.pod_ip;
        info.started_at = status.start_time.map(|t| t.0);
        info.status = status
            .phase
            .as_deref()
            .map(PodStatus::from)
            .unwrap_or(PodStatus::Unknown);

        if let Some(container_statuses) = status.container_statuses {
            info.containers = container_statuses
                .into_iter()
                .map(|cs| {
                    let mut container = ContainerInfo::new(cs.name);
                    container.ready = cs.ready;
                    container.restart_count = cs.restart_count;
                    container
                })
                .collect();
        }
    }

    info
}

/// Trigger a rolling restart, the same template annotation patch that
/// `kubectl rollout restart` applies
pub async fn restart_deployment(client: &kube::Client, namespace: &str, name: &str) -> Result<()> {
    let deployments: Api<Deployment> = Api::namespaced(client.clone(), namespace);
    deployments.restart(name).await.context(format!(
        "Failed to restart deployment '{}' in namespace '{}'",
        name, namespace
    ))?;
    Ok(())
}

/// What to fetch when tailing a pod's logs
#[derive(Clone, Debug, Default)]
pub struct LogOptions {
    pub container: Option<String>,
    pub tail_lines: Option<i64>,
    pub follow: bool,
}

impl LogOptions {
    pub fn to_params(&self) -> LogParams {
        LogParams {
            follow: self.follow,
            container: self.container.clone(),
            tail_lines: self.tail_lines,
            ..Default::default()
        }
    }
}

/// Stream a pod's logs line by line into `on_line`, returning the line count.
/// With `follow` set this only returns once the container stops or the caller
/// drops the future.
pub async fn stream_logs<F>(
    client: &kube::Client,
    namespace: &str,
    pod: &str,
    options: &LogOptions,
    mut on_line: F,
) -> Result<u64>
where
    F: FnMut(&str),
{
    let pods: Api<Pod> = Api::namespaced(client.clone(), namespace);
    let stream = pods
        .log_stream(pod, &options.to_params())
        .await
        .context(format!(
            "Failed to open log stream for pod '{}' in namespace '{}'",
            pod, namespace
        ))?;

    let mut lines = stream.lines();
    let mut count = 0;
    while let Some(line) = lines
        .try_next()
        .await
        .context(format!("Failed reading logs of pod '{}'", pod))?
    {
        on_line(&line);
        count += 1;
    }

    tracing::debug!(pod, count, "log stream ended");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use k8s_openapi::api::core::v1::{ContainerStatus, PodSpec, PodStatus as K8sPodStatus};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, Time};

    const KUBECONFIG: &str = r#"
apiVersion: v1
kind: Config
current-context: staging
clusters:
  - name: staging-cluster
    cluster:
      server: https://staging.example.com
  - name: prod-cluster
    cluster:
      server: https://prod.example.com
users:
  - name: dev
    user:
      token: abc
contexts:
  - name: staging
    context:
      cluster: staging-cluster
      user: dev
      namespace: payments
  - name: prod
    context:
      cluster: prod-cluster
      user: dev
"#;

    #[test]
    fn test_contexts_from_kubeconfig() {
        let kubeconfig = Kubeconfig::from_yaml(KUBECONFIG).unwrap();
        let client = KubeClient::from_kubeconfig(kubeconfig);

        assert_eq!(client.current_context(), Some("staging"));

        let contexts = client.get_contexts();
        assert_eq!(contexts.len(), 2);
        assert_eq!(contexts[0].name, "staging");
        assert_eq!(contexts[0].cluster, "staging-cluster");
        assert_eq!(contexts[0].namespace.as_deref(), Some("payments"));
        assert!(contexts[0].is_current);
        assert_eq!(contexts[1].name, "prod");
        assert_eq!(contexts[1].namespace, None);
        assert!(!contexts[1].is_current);
    }

    #[test]
    fn test_pod_to_info() {
        let started = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let pod = Pod {
            metadata: ObjectMeta {
                name: Some("api-6d4cf56db6-x2x7l".to_string()),
                ..Default::default()
            },
            spec: Some(PodSpec {
                node_name: Some("node-a".to_string()),
                ..Default::default()
            }),
            status: Some(K8sPodStatus {
                phase: Some("Running".to_string()),
                pod_ip: Some("10.0.0.7".to_string()),
                start_time: Some(Time(started)),
                container_statuses: Some(vec![ContainerStatus {
                    name: "api".to_string(),
                    ready: true,
                    restart_count: 3,
                    ..Default::default()
                }]),
                ..Default::default()
            }),
        };

        let info = pod_to_info(pod, "default");
        assert_eq!(info.name, "api-6d4cf56db6-x2x7l");
        assert_eq!(info.namespace, "default");
        assert_eq!(info.status, PodStatus::Running);
        assert_eq!(info.node_name.as_deref(), Some("node-a"));
        assert_eq!(info.pod_ip.as_deref(), Some("10.0.0.7"));
        assert_eq!(info.started_at, Some(started));
        assert_eq!(info.ready_status(), "1/1");
        assert_eq!(info.restarts(), 3);
    }

    #[test]
    fn test_pod_without_status_is_unknown() {
        let pod = Pod {
            metadata: ObjectMeta {
                name: Some("pending-pod".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let info = pod_to_info(pod, "jobs");
        assert_eq!(info.status, PodStatus::Unknown);
        assert!(info.containers.is_empty());
        assert_eq!(info.ready_status(), "0/0");
    }

    #[test]
    fn test_log_params() {
        let options = LogOptions {
            container: Some("sidecar".to_string()),
            tail_lines: Some(50),
            follow: true,
        };
        let params = options.to_params();
        assert!(params.follow);
        assert_eq!(params.container.as_deref(), Some("sidecar"));
        assert_eq!(params.tail_lines, Some(50));

        let params = LogOptions::default().to_params();
        assert!(!params.follow);
        assert_eq!(params.tail_lines, None);
    }
}
