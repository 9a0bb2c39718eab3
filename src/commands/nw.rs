use std::process::ExitCode;

use anyhow::Result;
use devctl_netcheck::{ProbeRequest, ProbeResult, probe};

use crate::cli::NwArgs;
use crate::config::NwConfig;

pub async fn run(args: NwArgs, config: &NwConfig) -> Result<ExitCode> {
    let request = ProbeRequest::new(
        args.host,
        args.port.unwrap_or(config.port),
        args.timeout.unwrap_or(config.timeout),
    )?;

    println!("Checking {} ...", request.address());
    let result = probe(&request).await;
    for line in report(&result) {
        println!("{}", line);
    }

    if !result.succeeded && (args.fail_on_unreachable || config.fail_on_unreachable) {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn report(result: &ProbeResult) -> Vec<String> {
    let mut lines = Vec::new();
    if result.succeeded {
        lines.push(format!("✅ Success! Response time: {:?}", result.latency));
        if let Some(warning) = &result.close_warning {
            lines.push(format!("⚠️ Failed to close connection: {}", warning));
        }
    } else {
        lines.push(format!(
            "❌ Connection failed: {} (after {:?})",
            result.failure_reason().unwrap_or_else(|| "unknown error".to_string()),
            result.latency
        ));
    }
    lines
}
