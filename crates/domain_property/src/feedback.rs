//! User feedback channel
//!
//! Every service operation reports a short human-readable outcome, the kind
//! of message a UI shows as a toast. The sink is injected so the service
//! stays independent of any UI. Notifications are fire-and-forget and never
//! change control flow.

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};
use tracing::{info, warn};

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A single user-facing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Destination for user-facing notifications
pub trait FeedbackSink: Send + Sync {
    /// Delivers one notification
    fn notify(&self, notification: Notification);

    fn success(&self, message: &str) {
        self.notify(Notification::success(message));
    }

    fn error(&self, message: &str) {
        self.notify(Notification::error(message));
    }
}

/// Emits notifications as tracing events on the `feedback` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingFeedback;

impl FeedbackSink for TracingFeedback {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => info!(target: "feedback", message = %notification.message),
            NotificationLevel::Error => warn!(target: "feedback", message = %notification.message),
        }
    }
}

/// Collects notifications in memory
///
/// The HTTP layer uses one per request to return notifications with the
/// response, and tests use it to assert on what the user would see.
#[derive(Debug, Default)]
pub struct RecordingFeedback {
    entries: Mutex<Vec<Notification>>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything recorded so far
    pub fn notifications(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drains the recorded notifications
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Messages recorded at error level, in order
    pub fn errors(&self) -> Vec<String> {
        self.messages_at(NotificationLevel::Error)
    }

    /// Messages recorded at success level, in order
    pub fn successes(&self) -> Vec<String> {
        self.messages_at(NotificationLevel::Success)
    }

    fn messages_at(&self, level: NotificationLevel) -> Vec<String> {
        self.notifications()
            .into_iter()
            .filter(|n| n.level == level)
            .map(|n| n.message)
            .collect()
    }
}

impl FeedbackSink for RecordingFeedback {
    fn notify(&self, notification: Notification) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_feedback_keeps_order_and_levels() {
        let feedback = RecordingFeedback::new();
        feedback.error("first");
        feedback.success("second");
        feedback.error("third");

        assert_eq!(feedback.errors(), vec!["first", "third"]);
        assert_eq!(feedback.successes(), vec!["second"]);
        assert_eq!(feedback.notifications().len(), 3);
    }

    #[test]
    fn test_take_drains() {
        let feedback = RecordingFeedback::new();
        feedback.success("done");

        assert_eq!(feedback.take(), vec![Notification::success("done")]);
        assert!(feedback.notifications().is_empty());
    }

    #[test]
    fn test_notification_serializes_level_in_snake_case() {
        let value = serde_json::to_value(Notification::error("boom")).unwrap();
        assert_eq!(value["level"], "error");
        assert_eq!(value["message"], "boom");
    }
}
