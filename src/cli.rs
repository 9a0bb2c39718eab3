use std::time::Duration;

use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::duration::parse_duration;

/// devctl - shortcuts for Kubernetes, git, AWS and network checks
#[derive(Parser, Debug)]
#[command(name = "devctl")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the devctl version
    Version,

    /// Check network reachability to a host:port
    Nw(NwArgs),

    /// Perform quick actions with Kubernetes
    #[command(subcommand)]
    Kube(KubeCommand),

    /// Perform common Git actions quickly
    #[command(subcommand)]
    Git(GitCommand),

    /// Perform quick actions with AWS
    Aws(AwsArgs),
}

#[derive(ClapArgs, Debug)]
pub struct NwArgs {
    /// Target hostname (e.g., google.com)
    #[arg(long)]
    pub host: String,

    /// Target port [default: 80]
    #[arg(long)]
    pub port: Option<u16>,

    /// Timeout duration, e.g. 2s or 500ms [default: 2s]
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Exit with status 1 when the target is unreachable
    #[arg(long)]
    pub fail_on_unreachable: bool,
}

#[derive(Subcommand, Debug)]
pub enum KubeCommand {
    /// List pods in a namespace
    GetPods {
        /// Namespace to list pods in
        #[arg(short, long)]
        namespace: Option<String>,

        /// Also show readiness, restarts, age, containers, pod IP and node
        #[arg(short, long)]
        wide: bool,
    },

    /// Show the current Kubernetes context
    CurrentContext,

    /// List the contexts in your kubeconfig
    Contexts,

    /// Switch Kubernetes context and namespace
    SetContext {
        #[arg(value_name = "CONTEXT")]
        context: String,

        #[arg(value_name = "NAMESPACE")]
        namespace: String,
    },

    /// Restart a deployment
    Restart {
        #[arg(value_name = "DEPLOYMENT")]
        deployment: String,

        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// Tail logs from a pod
    Logs {
        #[arg(value_name = "POD")]
        pod: String,

        #[arg(short, long)]
        namespace: Option<String>,

        /// Container to read from (defaults to the pod's only container)
        #[arg(short, long)]
        container: Option<String>,

        /// Number of historical lines to fetch
        #[arg(long)]
        tail: Option<i64>,

        /// Print what is there and exit instead of following
        #[arg(long)]
        no_follow: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum GitCommand {
    /// Clone a Git repository
    Clone {
        /// Repository URL
        #[arg(short, long)]
        repo: String,

        /// Target directory (optional)
        #[arg(short, long)]
        dir: Option<String>,
    },

    /// Checkout a Git branch
    Checkout {
        /// Branch name
        #[arg(short, long)]
        branch: String,
    },

    /// Stage all changes and create a commit
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,
    },

    /// Push changes to a Git remote
    Push {
        /// Git remote [default: origin]
        #[arg(short, long)]
        remote: Option<String>,

        /// Git branch (defaults to the current branch)
        #[arg(short, long)]
        branch: Option<String>,
    },
}

#[derive(ClapArgs, Debug)]
pub struct AwsArgs {
    /// AWS region, overriding the environment and profile
    #[arg(long, global = true)]
    pub region: Option<String>,

    #[command(subcommand)]
    pub command: AwsCommand,
}

#[derive(Subcommand, Debug)]
pub enum AwsCommand {
    /// List all S3 buckets
    ListS3,

    /// List objects in an S3 bucket
    ListBucketObjects {
        #[arg(value_name = "BUCKET")]
        bucket: String,

        /// Only keys starting with this prefix
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Display S3 bucket policy
    DisplayBucketPolicy {
        #[arg(value_name = "BUCKET")]
        bucket: String,
    },
}
