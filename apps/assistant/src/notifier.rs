use assistant_core::Notifier;
use shared::domain::NotificationKind;

/// Prints each command outcome as it arrives.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        match kind {
            NotificationKind::Success => println!("[ok] {message}"),
            NotificationKind::Failure => eprintln!("[failed] {message}"),
        }
    }
}
