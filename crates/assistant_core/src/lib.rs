pub mod classify;
pub mod completion;
pub mod engine;
pub mod error;
pub mod exec;
pub mod notify;
pub mod relay;
pub mod relay_client;
pub mod render;

pub use classify::classify;
pub use completion::{CompletionProvider, OpenAiCompletion};
pub use engine::CommandEngine;
pub use error::{ExecutionError, UpstreamError};
pub use exec::{CommandExecutor, DockerCli};
pub use notify::{Notifier, TracingNotifier};
pub use relay::{Assistant, Relay};
pub use relay_client::RelayClient;
pub use render::{BlockKind, DisplayNode, DisplayTree, RenderStrategy, Renderer};
