mod cli;
mod commands;
mod config;
mod duration;

use std::process::ExitCode;

use clap::Parser;
use devctl_git::GitError;
use devctl_netcheck::NetCheckError;
use devctl_types::InvalidInput;

use crate::cli::Args;
use crate::config::Config;

/// Exit status for rejected input (bad host, zero timeout, blank branch or bucket name)
const EXIT_INVALID_INPUT: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Warnings by default; RUST_LOG still wins for finer control
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(log_level(args.verbose).into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match Config::load() {
        Ok(config) => commands::dispatch(args.command, &config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code_for(&e)
        }
    }
}

fn log_level(verbose: u8) -> tracing::Level {
    match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    }
}

fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    if is_invalid_input(error) {
        ExitCode::from(EXIT_INVALID_INPUT)
    } else {
        ExitCode::FAILURE
    }
}

fn is_invalid_input(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<NetCheckError>(),
            Some(NetCheckError::InvalidInput(_))
        ) || matches!(
            cause.downcast_ref::<GitError>(),
            Some(GitError::InvalidInput(_))
        ) || cause.is::<InvalidInput>()
    })
}
