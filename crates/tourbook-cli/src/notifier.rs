use tourbook_core::{Notifier, Severity};
use tracing::debug;

/// Prints notifications to stderr so stdout stays clean for listings.
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        debug!(%severity, message, "Notification");
        let marker = match severity {
            Severity::Success => "✓",
            Severity::Info => "i",
            Severity::Warning => "!",
            Severity::Error => "✗",
        };
        eprintln!("{} {}", marker, message);
    }
}
