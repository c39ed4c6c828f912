use serde::{Deserialize, Serialize};

pub const MARKER_KEYWORD: &str = "docker";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseText(String);

impl ResponseText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandLine {
    /// `None` when the marker keyword stands alone on its line.
    pub tool_name: Option<String>,
    pub arguments: Vec<String>,
}

impl CommandLine {
    pub fn is_executable(&self) -> bool {
        self.tool_name.is_some()
    }

    pub fn display(&self) -> String {
        let mut parts = vec![MARKER_KEYWORD];
        if let Some(tool_name) = &self.tool_name {
            parts.push(tool_name);
        }
        parts.extend(self.arguments.iter().map(String::as_str));
        parts.join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum LineKind {
    Command(CommandLine),
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub index: usize,
    pub text: String,
    pub kind: LineKind,
}

impl Line {
    pub fn is_command(&self) -> bool {
        matches!(self.kind, LineKind::Command(_))
    }

    pub fn command(&self) -> Option<&CommandLine> {
        match &self.kind {
            LineKind::Command(command) => Some(command),
            LineKind::Plain => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    Success(String),
    Failure(String),
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn notification_kind(&self) -> NotificationKind {
        match self {
            Self::Success(_) => NotificationKind::Success,
            Self::Failure(_) => NotificationKind::Failure,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Failure,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_display_includes_marker_and_arguments() {
        let command = CommandLine {
            tool_name: Some("ps".into()),
            arguments: vec!["-a".into(), "--no-trunc".into()],
        };
        assert_eq!(command.display(), "docker ps -a --no-trunc");
        assert!(command.is_executable());
    }

    #[test]
    fn bare_marker_is_not_executable() {
        let command = CommandLine {
            tool_name: None,
            arguments: Vec::new(),
        };
        assert_eq!(command.display(), "docker");
        assert!(!command.is_executable());
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let outcome = ExecutionOutcome::Failure("boom".into());
        let json = serde_json::to_value(&outcome).expect("json");
        assert_eq!(json, serde_json::json!({ "status": "failure", "text": "boom" }));
        assert_eq!(outcome.notification_kind(), NotificationKind::Failure);
    }
}
