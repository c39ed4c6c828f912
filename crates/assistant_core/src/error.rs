use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("completion service rejected the credential (status {status})")]
    InvalidCredential { status: u16 },
    #[error("completion service is rate limiting requests")]
    RateLimited,
    #[error("completion service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("completion service returned no choices")]
    EmptyResponse,
    #[error("invalid completion endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

impl UpstreamError {
    pub fn from_api_error(status: u16, error: ApiError) -> Self {
        match error.code {
            ErrorCode::RateLimited => Self::RateLimited,
            ErrorCode::Unauthorized => Self::InvalidCredential { status },
            _ => Self::Status {
                status,
                body: error.message,
            },
        }
    }

    pub fn to_api_error(&self) -> ApiError {
        let code = match self {
            Self::RateLimited => ErrorCode::RateLimited,
            Self::InvalidCredential { .. } => ErrorCode::Unauthorized,
            Self::InvalidEndpoint(_) => ErrorCode::Internal,
            Self::Status { .. } | Self::Transport(_) | Self::EmptyResponse => ErrorCode::Upstream,
        };
        ApiError::new(code, self.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("no subcommand follows `{marker}`")]
    MissingSubcommand { marker: &'static str },
    #[error("`{program}` was not found; is it installed and on PATH?")]
    ToolNotFound { program: String },
    #[error("failed to run `{program}`: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {}", exit_detail(.code, .stderr))]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn exit_detail(code: &Option<i32>, stderr: &str) -> String {
    let status = match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    };
    if stderr.is_empty() {
        status
    } else {
        format!("{status}: {stderr}")
    }
}
