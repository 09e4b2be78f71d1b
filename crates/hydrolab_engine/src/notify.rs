//! User-visible notifications emitted by rules.
//!
//! The engine performs no I/O; rules hand notifications to a caller-supplied
//! [`NotificationSink`].

use std::fmt;
use std::sync::Arc;

/// Severity of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational note.
    Info,
    /// A check passed.
    Success,
    /// Attention required.
    Warning,
    /// A hazard was detected.
    Error,
}

impl Severity {
    /// Returns the lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
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

/// A message produced by a rule firing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Human-readable text.
    pub message: String,
    /// Severity level.
    pub severity: Severity,
    /// Name of the rule that emitted it.
    pub rule: Arc<str>,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// Receives notifications from the engine.
pub trait NotificationSink {
    /// Accept one notification.
    fn notify(&mut self, notification: Notification);
}

impl NotificationSink for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}
