use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{info, warn};

use crate::models::{CommandOutput, ErrorKind};

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("command execution is disabled on this server")]
    Disabled,

    #[error("command is empty")]
    Empty,

    #[error("failed to run command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command exceeded {timeout_ms}ms and was killed")]
    Timeout { timeout_ms: u64 },
}

impl CommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Disabled => ErrorKind::CommandDisabled,
            Self::Empty => ErrorKind::InvalidParams,
            Self::Spawn { .. } => ErrorKind::CommandFailed,
            Self::Timeout { .. } => ErrorKind::Timeout,
        }
    }
}

/// Runs caller-supplied command strings through the platform shell.
///
/// There is no allow-list: whatever the caller sends runs with the
/// privileges of this process. `enabled` and `timeout` are the only knobs.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    enabled: bool,
    timeout: Option<Duration>,
}

impl CommandRunner {
    pub fn new(enabled: bool, timeout: Option<Duration>) -> Self {
        Self { enabled, timeout }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Run `command` in `cwd`, wait for it, and capture both streams.
    /// A non-zero exit status is a successful run, not an error.
    pub async fn run(&self, command: &str, cwd: &Path) -> Result<CommandOutput, CommandError> {
        if !self.enabled {
            return Err(CommandError::Disabled);
        }
        if command.trim().is_empty() {
            return Err(CommandError::Empty);
        }

        info!("Running command in {}: {}", cwd.display(), command);

        let mut cmd = shell_command(command);
        cmd.current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = cmd.output();
        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, output).await {
                Ok(result) => result,
                Err(_) => {
                    warn!("Command timed out after {:?}: {}", limit, command);
                    return Err(CommandError::Timeout {
                        timeout_ms: limit.as_millis() as u64,
                    });
                }
            },
            None => output.await,
        }
        .map_err(|source| CommandError::Spawn {
            command: command.to_string(),
            source,
        })?;

        let exit_code = output.status.code();
        info!("Command finished with exit code {:?}: {}", exit_code, command);

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code,
        })
    }
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(not(windows))]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}
