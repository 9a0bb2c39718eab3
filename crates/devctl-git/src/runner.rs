use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;

use crate::error::{GitError, Result};

pub const DEFAULT_REMOTE: &str = "origin";

/// Runs git subcommands as child processes
#[derive(Clone, Debug)]
pub struct GitRunner {
    program: String,
    workdir: Option<PathBuf>,
    echo: bool,
}

impl GitRunner {
    /// Runner for `git` on PATH, echoing each command before it runs
    pub fn new() -> Self {
        Self {
            program: "git".to_string(),
            workdir: None,
            echo: true,
        }
    }

    /// Use a different executable in place of `git`
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Run commands inside `dir` instead of the current directory
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    /// `git clone <repo> [dir]`
    pub async fn clone_repo(&self, repo: &str, dir: Option<&str>) -> Result<()> {
        self.run(&clone_args(repo, dir)?).await
    }

    /// `git checkout <branch>`
    pub async fn checkout(&self, branch: &str) -> Result<()> {
        self.run(&checkout_args(branch)?).await
    }

    /// Stage everything, then `git commit -m <message>`
    pub async fn commit_all(&self, message: &str) -> Result<()> {
        let commit = commit_args(message)?;
        self.run(&["add".to_string(), ".".to_string()]).await?;
        self.run(&commit).await
    }

    /// `git push <remote> <branch>`, resolving the current branch when none is given
    pub async fn push(&self, remote: Option<&str>, branch: Option<&str>) -> Result<()> {
        let remote = remote
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_REMOTE);

        let branch = match branch.map(str::trim).filter(|b| !b.is_empty()) {
            Some(branch) => branch.to_string(),
            None => self.current_branch().await?,
        };

        self.run(&["push".to_string(), remote.to_string(), branch])
            .await
    }

    /// Name of the checked out branch, from `git branch --show-current`
    pub async fn current_branch(&self) -> Result<String> {
        let branch = self.output(&["branch", "--show-current"]).await?;
        let branch = branch.trim();
        if branch.is_empty() {
            return Err(GitError::NoCurrentBranch);
        }
        Ok(branch.to_string())
    }

    /// Run with inherited stdio so git can prompt and stream progress
    async fn run(&self, args: &[String]) -> Result<()> {
        let command = self.display(args);
        if self.echo {
            println!("▶️ {}", command);
        }
        tracing::debug!(%command, workdir = ?self.workdir, "running git");

        let status = self
            .command(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| GitError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(GitError::Failed { command, status });
        }
        Ok(())
    }

    /// Run and capture stdout
    async fn output(&self, args: &[&str]) -> Result<String> {
        let output = self
            .command(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| GitError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::debug!(stderr = %stderr.trim(), "git exited unsuccessfully");
            return Err(GitError::Failed {
                command: self.display(args),
                status: output.status,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn command<S: AsRef<std::ffi::OsStr>>(&self, args: &[S]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }
        cmd
    }

    fn display<S: AsRef<str>>(&self, args: &[S]) -> String {
        let mut line = self.program.clone();
        for arg in args {
            line.push(' ');
            line.push_str(arg.as_ref());
        }
        line
    }
}

impl Default for GitRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn required<'a>(value: &'a str, name: &str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(GitError::InvalidInput(format!("{name} is required")));
    }
    Ok(value)
}

fn clone_args(repo: &str, dir: Option<&str>) -> Result<Vec<String>> {
    let mut args = vec!["clone".to_string(), required(repo, "repo")?.to_string()];
    if let Some(dir) = dir.map(str::trim).filter(|d| !d.is_empty()) {
        args.push(dir.to_string());
    }
    Ok(args)
}

fn checkout_args(branch: &str) -> Result<Vec<String>> {
    Ok(vec![
        "checkout".to_string(),
        required(branch, "branch")?.to_string(),
    ])
}

fn commit_args(message: &str) -> Result<Vec<String>> {
    // Keep the message verbatim; only reject blank ones
    required(message, "message")?;
    Ok(vec![
        "commit".to_string(),
        "-m".to_string(),
        message.to_string(),
    ])
}
