//! Every [`CommandEngine::execute`] call ends in exactly one notification.
//! Failures stay local to the call.

use std::sync::Arc;

use shared::domain::{CommandLine, ExecutionOutcome, Line, MARKER_KEYWORD};
use tracing::{info, warn};

use crate::{classify, error::ExecutionError, exec::CommandExecutor, notify::Notifier};

#[derive(Clone)]
pub struct CommandEngine {
    executor: Arc<dyn CommandExecutor>,
    notifier: Arc<dyn Notifier>,
}

impl CommandEngine {
    pub fn new(executor: Arc<dyn CommandExecutor>, notifier: Arc<dyn Notifier>) -> Self {
        Self { executor, notifier }
    }

    pub fn classify(&self, text: &str) -> Vec<Line> {
        classify::classify(text)
    }

    pub async fn execute(&self, command: &CommandLine) -> ExecutionOutcome {
        let outcome = match self.run(command).await {
            Ok(output) => {
                info!(command = %command.display(), "command succeeded");
                ExecutionOutcome::Success(rejoin_lines(&output))
            }
            Err(error) => {
                warn!(command = %command.display(), %error, "command failed");
                ExecutionOutcome::Failure(error.to_string())
            }
        };
        self.notifier
            .notify(outcome.notification_kind(), &notification_message(command, &outcome));
        outcome
    }

    async fn run(&self, command: &CommandLine) -> Result<String, ExecutionError> {
        let Some(tool_name) = command.tool_name.as_deref() else {
            return Err(ExecutionError::MissingSubcommand {
                marker: MARKER_KEYWORD,
            });
        };
        self.executor.exec(tool_name, &command.arguments).await
    }
}

fn rejoin_lines(output: &str) -> String {
    output.lines().collect::<Vec<_>>().join("\n")
}

fn notification_message(command: &CommandLine, outcome: &ExecutionOutcome) -> String {
    match outcome {
        ExecutionOutcome::Success(output) if output.is_empty() => {
            format!("`{}` succeeded", command.display())
        }
        ExecutionOutcome::Success(output) => {
            format!("`{}` succeeded:\n{output}", command.display())
        }
        ExecutionOutcome::Failure(error) => format!("`{}` failed: {error}", command.display()),
    }
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
