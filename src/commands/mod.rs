mod aws;
mod git;
mod kube;
mod nw;

use std::process::ExitCode;

use anyhow::Result;

use crate::cli::Command;
use crate::config::Config;

/// Build metadata, injected at compile time when the release pipeline sets it
const GIT_SHA: &str = match option_env!("DEVCTL_GIT_SHA") {
    Some(sha) => sha,
    None => "none",
};
const BUILD_DATE: &str = match option_env!("DEVCTL_BUILD_DATE") {
    Some(date) => date,
    None => "unknown",
};

pub async fn dispatch(command: Command, config: &Config) -> Result<ExitCode> {
    match command {
        Command::Version => {
            println!("{}", version_text());
        }
        Command::Nw(args) => return nw::run(args, &config.nw).await,
        Command::Kube(command) => kube::run(command, &config.kube).await?,
        Command::Git(command) => git::run(command, &config.git).await?,
        Command::Aws(args) => aws::run(args, &config.aws).await?,
    }
    Ok(ExitCode::SUCCESS)
}

fn version_text() -> String {
    format!(
        "Version: {}\nGit SHA: {}\nBuilt at: {}",
        env!("CARGO_PKG_VERSION"),
        GIT_SHA,
        BUILD_DATE
    )
}
