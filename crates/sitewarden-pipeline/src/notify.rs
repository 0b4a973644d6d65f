//! Notification dispatch
//!
//! The pipeline's only visible side effect. Rendering is out of
//! scope: consumers supply a sink (overlay, terminal banner, test
//! recorder) and the pipeline hands it the reason plus the block flag.

use sitewarden_core::Verdict;
use tracing::warn;

/// What the sink is asked to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Human-readable reason, never empty
    pub reason: String,

    /// Whether to obstruct the page instead of only warning
    pub block: bool,
}

impl Notification {
    /// Build a notification from a suspicious verdict
    pub fn from_verdict(verdict: &Verdict, block: bool) -> Self {
        Self {
            reason: verdict.reason.clone(),
            block,
        }
    }
}

/// Renders a warning/block artifact for a suspicious page
pub trait NotificationSink: Send + Sync {
    /// Present the notification to the user
    fn notify(&self, notification: &Notification);
}

/// Sink that only logs, for embedders without a UI surface
#[derive(Debug, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: &Notification) {
        if notification.block {
            warn!(reason = %notification.reason, "blocking suspicious site");
        } else {
            warn!(reason = %notification.reason, "suspicious site detected");
        }
    }
}
