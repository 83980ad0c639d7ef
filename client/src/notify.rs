//! Transient user notifications ("toasts").

use std::fmt;

use parking_lot::Mutex;

/// Notification level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Completed action.
    Success,
    /// Neutral information.
    Info,
    /// Degraded but recoverable.
    Warning,
    /// Failed action.
    Error,
}

impl Severity {
    /// Lowercase name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fire-and-forget sink; implementations must not block.
pub trait Notifier: Send + Sync {
    /// Show a notification.
    fn notify(&self, severity: Severity, title: &str, message: &str);
}

/// Writes notifications to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, severity: Severity, title: &str, message: &str) {
        match severity {
            Severity::Error => tracing::error!(%severity, "{title}: {message}"),
            Severity::Warning => tracing::warn!(%severity, "{title}: {message}"),
            Severity::Success | Severity::Info => tracing::info!(%severity, "{title}: {message}"),
        }
    }
}

/// A notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Level.
    pub severity: Severity,
    /// Short heading.
    pub title: String,
    /// Body text.
    pub message: String,
}

/// Keeps every notification in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    entries: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn notifications(&self) -> Vec<Notification> {
        self.entries.lock().clone()
    }

    /// Drain the recorded notifications.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.lock())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, severity: Severity, title: &str, message: &str) {
        self.entries.lock().push(Notification {
            severity,
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}
