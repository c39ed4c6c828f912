use shared::domain::NotificationKind;
use tracing::{info, warn};

/// Fire-and-forget channel for transient user-facing messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        match kind {
            NotificationKind::Success => info!(notification = "success", "{message}"),
            NotificationKind::Failure => warn!(notification = "failure", "{message}"),
        }
    }
}
