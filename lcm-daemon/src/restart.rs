//! Packet-forwarder restart command

use std::process::ExitStatus;

use thiserror::Error;
use tokio::process::Command;
use tracing::info;

/// Errors running the restart command
#[derive(Debug, Error)]
pub enum RestartError {
    #[error("no packet-forwarder restart command configured")]
    NotConfigured,

    #[error("execute command error: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("command exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },
}

/// Run `command` to completion and return its standard output
///
/// The command string is split on whitespace into program and arguments;
/// no shell is involved.
pub async fn invoke_restart(command: &str) -> Result<String, RestartError> {
    let mut parts = command.split_whitespace();
    let program = parts.next().ok_or(RestartError::NotConfigured)?;
    let args: Vec<&str> = parts.collect();

    info!(cmd = program, args = ?args, "invoking packet-forwarder restart command");

    let output = Command::new(program)
        .args(&args)
        .output()
        .await
        .map_err(RestartError::Spawn)?;

    if !output.status.success() {
        return Err(RestartError::Failed {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    info!(output = %stdout.trim_end(), "packet-forwarder restart command invoked");
    Ok(stdout)
}
