//! Per-request feedback capture

use domain_property::{FeedbackSink, Notification, RecordingFeedback, TracingFeedback};

/// Records a request's notifications for the response body and logs them
#[derive(Debug, Default)]
pub struct RequestFeedback {
    recorded: RecordingFeedback,
}

impl RequestFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains what was recorded for this request
    pub fn take(&self) -> Vec<Notification> {
        self.recorded.take()
    }
}

impl FeedbackSink for RequestFeedback {
    fn notify(&self, notification: Notification) {
        TracingFeedback.notify(notification.clone());
        self.recorded.notify(notification);
    }
}
