use anyhow::Result;
use devctl_git::GitRunner;

use crate::cli::GitCommand;
use crate::config::GitConfig;

pub async fn run(command: GitCommand, config: &GitConfig) -> Result<()> {
    let git = GitRunner::new();
    match command {
        GitCommand::Clone { repo, dir } => git.clone_repo(&repo, dir.as_deref()).await?,
        GitCommand::Checkout { branch } => git.checkout(&branch).await?,
        GitCommand::Commit { message } => git.commit_all(&message).await?,
        GitCommand::Push { remote, branch } => {
            let remote = remote.or_else(|| config.remote.clone());
            git.push(remote.as_deref(), branch.as_deref()).await?
        }
    }
    Ok(())
}
