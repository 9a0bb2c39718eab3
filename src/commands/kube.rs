use anyhow::Result;
use chrono::{DateTime, Utc};
use devctl_k8s::{
    ContextInfo, KubeClient, Kubectl, LogOptions, PodInfo, default_client, list_pods,
    restart_deployment, stream_logs,
};

use crate::cli::KubeCommand;
use crate::config::KubeConfig;

pub async fn run(command: KubeCommand, config: &KubeConfig) -> Result<()> {
    match command {
        KubeCommand::GetPods { namespace, wide } => {
            let namespace = namespace.unwrap_or_else(|| config.namespace.clone());
            let client = default_client().await?;
            let pods = list_pods(&client, &namespace).await?;
            if pods.is_empty() {
                println!("No pods found in namespace {}", namespace);
            }
            let now = Utc::now();
            for pod in &pods {
                println!("{}", pod_line(pod, wide, now));
            }
        }
        KubeCommand::CurrentContext => {
            let kube = KubeClient::new()?;
            match kube.current_context() {
                Some(context) => println!("📌 Current context: {}", context),
                None => println!("📌 No current context set"),
            }
        }
        KubeCommand::Contexts => {
            let kube = KubeClient::new()?;
            for context in kube.get_contexts() {
                println!("{}", context_line(&context));
            }
        }
        KubeCommand::SetContext { context, namespace } => {
            Kubectl::new().set_context(&context, &namespace).await?;
            println!("📌 Switched to context {} (namespace {})", context, namespace);
        }
        KubeCommand::Restart {
            deployment,
            namespace,
        } => {
            let namespace = namespace.unwrap_or_else(|| config.namespace.clone());
            let client = default_client().await?;
            restart_deployment(&client, &namespace, &deployment).await?;
            println!("🔄 Restarted deployment/{} in {}", deployment, namespace);
        }
        KubeCommand::Logs {
            pod,
            namespace,
            container,
            tail,
            no_follow,
        } => {
            let namespace = namespace.unwrap_or_else(|| config.namespace.clone());
            let options = LogOptions {
                container,
                tail_lines: tail,
                follow: !no_follow,
            };
            let client = default_client().await?;

            let print = |line: &str| println!("{}", line);
            tokio::select! {
                result = stream_logs(&client, &namespace, &pod, &options, print) => {
                    result?;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!(%pod, "log tail interrupted");
                }
            }
        }
    }
    Ok(())
}

fn pod_line(pod: &PodInfo, wide: bool, now: DateTime<Utc>) -> String {
    let mut line = format!("{} {} ({})", pod.status.icon(), pod.name, pod.status);
    if wide {
        line.push_str(&format!(
            "  ready {}  restarts {}  age {}",
            pod.ready_status(),
            pod.restarts(),
            pod.age(now).unwrap_or_else(|| "-".to_string())
        ));
        if !pod.containers.is_empty() {
            let names: Vec<&str> = pod.containers.iter().map(|c| c.name.as_str()).collect();
            line.push_str(&format!("  containers {}", names.join(",")));
        }
        if let Some(ip) = &pod.pod_ip {
            line.push_str(&format!("  ip {}", ip));
        }
        if let Some(node) = &pod.node_name {
            line.push_str(&format!("  node {}", node));
        }
    }
    line
}

fn context_line(context: &ContextInfo) -> String {
    let marker = if context.is_current { "*" } else { " " };
    let mut details = format!("cluster {}", context.cluster);
    if !context.user.is_empty() {
        details.push_str(&format!(", user {}", context.user));
    }
    if let Some(namespace) = &context.namespace {
        details.push_str(&format!(", namespace {}", namespace));
    }
    format!("{} {} ({})", marker, context.name, details)
}
