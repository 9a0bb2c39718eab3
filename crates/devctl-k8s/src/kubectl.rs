//! Context switching through `kubectl`, so the user's kubeconfig is edited
//! the same way kubectl itself would edit it.

use std::process::Stdio;

use anyhow::{Context, Result, bail};
use tokio::process::Command;

use devctl_types::InvalidInput;

#[derive(Clone, Debug)]
pub struct Kubectl {
    program: String,
}

impl Kubectl {
    pub fn new() -> Self {
        Self {
            program: "kubectl".to_string(),
        }
    }

    /// Use a different executable in place of `kubectl`
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Switch to `context`, then pin `namespace` on it
    pub async fn set_context(&self, context: &str, namespace: &str) -> Result<()> {
        let context = context.trim();
        let namespace = namespace.trim();
        if context.is_empty() || namespace.is_empty() {
            let reason = "context and namespace must both be non-empty";
            return Err(InvalidInput(reason.into()).into());
        }

        self.run(&use_context_args(context)).await?;
        self.run(&set_namespace_args(namespace)).await
    }

    async fn run(&self, args: &[String]) -> Result<()> {
        let line = format!("{} {}", self.program, args.join(" "));
        tracing::debug!(command = %line, "running kubectl");

        let output = Command::new(&self.program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| format!("Failed to run {}. Is it installed?", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("`{}` failed ({}): {}", line, output.status, stderr.trim());
        }
        Ok(())
    }
}

impl Default for Kubectl {
    fn default() -> Self {
        Self::new()
    }
}

fn use_context_args(context: &str) -> Vec<String> {
    vec![
        "config".to_string(),
        "use-context".to_string(),
        context.to_string(),
    ]
}

fn set_namespace_args(namespace: &str) -> Vec<String> {
    vec![
        "config".to_string(),
        "set-context".to_string(),
        "--current".to_string(),
        format!("--namespace={}", namespace),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kubectl_args() {
        assert_eq!(
            use_context_args("staging"),
            vec!["config", "use-context", "staging"]
        );
        assert_eq!(
            set_namespace_args("payments"),
            vec!["config", "set-context", "--current", "--namespace=payments"]
        );
    }

    #[tokio::test]
    async fn test_blank_arguments_rejected() {
        let kubectl = Kubectl::with_program("devctl-no-such-kubectl");
        let err = kubectl.set_context("staging", " ").await.unwrap_err();
        assert!(err.to_string().contains("non-empty"));
        assert!(err.downcast_ref::<InvalidInput>().is_some());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failure_surfaces_command_line() {
        let err = Kubectl::with_program("false")
            .set_context("staging", "payments")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("false config use-context staging"));

        assert!(
            Kubectl::with_program("true")
                .set_context("staging", "payments")
                .await
                .is_ok()
        );
    }
}
