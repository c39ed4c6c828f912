use std::{io, process::Stdio};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::ExecutionError;

#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Runs `<tool> <tool_name> <arguments...>` and returns its standard output.
    async fn exec(&self, tool_name: &str, arguments: &[String]) -> Result<String, ExecutionError>;
}

#[derive(Debug, Clone)]
pub struct DockerCli {
    program: String,
}

impl DockerCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new(shared::domain::MARKER_KEYWORD)
    }
}

#[async_trait]
impl CommandExecutor for DockerCli {
    async fn exec(&self, tool_name: &str, arguments: &[String]) -> Result<String, ExecutionError> {
        debug!(program = %self.program, tool_name, ?arguments, "spawning command");
        let output = Command::new(&self.program)
            .arg(tool_name)
            .args(arguments)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => ExecutionError::ToolNotFound {
                    program: self.program.clone(),
                },
                _ => ExecutionError::Io {
                    program: self.program.clone(),
                    source,
                },
            })?;

        if !output.status.success() {
            let mut command = vec![self.program.as_str(), tool_name];
            command.extend(arguments.iter().map(String::as_str));
            return Err(ExecutionError::NonZeroExit {
                command: command.join(" "),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(all(test, unix))]
#[path = "tests/exec_tests.rs"]
mod tests;
