//! User-facing notification types and the emitter seam.
//!
//! The presentation layer implements [`Notifier`]; the manager maps
//! operation outcomes onto it. Single operations produce transient
//! toasts. Batches with failures produce a persistent report carrying
//! the per-id reasons, because "3 of 5 deleted" is not something to
//! flash for two seconds.

use crate::bulk::BulkOutcome;

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// Something the user should see.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Transient, auto-dismissing message for a single operation.
    Toast { severity: Severity, message: String },
    /// Persistent, explicitly dismissable report for a batch with
    /// failures, keeping every per-id reason.
    BulkReport {
        message: String,
        outcome: BulkOutcome,
    },
}

impl Notification {
    /// Success toast.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::Toast {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    /// Warning toast.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::Toast {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// Error toast.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Toast {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// The message text, whichever variant.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Toast { message, .. } | Self::BulkReport { message, .. } => message,
        }
    }
}

/// Emits notifications to the user. Implemented by the presentation
/// layer; implementations must not block.
pub trait Notifier: Send + Sync {
    /// Delivers one notification.
    fn notify(&self, notification: Notification);
}

/// Discards everything. The default when no presenter is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notification: Notification) {}
}

/// Test notifier that records what it is handed.
pub mod mock {
    use std::sync::Mutex;

    use super::*;

    /// Records notifications for assertions.
    #[derive(Default)]
    pub struct RecordingNotifier {
        seen: Mutex<Vec<Notification>>,
    }

    impl RecordingNotifier {
        /// Creates an empty recorder.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Everything notified so far, in order.
        pub fn seen(&self) -> Vec<Notification> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notification: Notification) {
            self.seen.lock().unwrap().push(notification);
        }
    }
}
