//! Terminal notification sink

use sitewarden_pipeline::{Notification, NotificationSink};

/// Renders warn/block verdicts as a terminal banner
#[derive(Debug, Default)]
pub struct TerminalSink;

impl NotificationSink for TerminalSink {
    fn notify(&self, notification: &Notification) {
        let heading = if notification.block {
            "BLOCKED: this site looks dangerous"
        } else {
            "WARNING: this site looks suspicious"
        };

        println!();
        println!("  ============================================");
        println!("  {}", heading);
        println!("  {}", notification.reason);
        if notification.block {
            println!("  Leave this site unless you trust it.");
        } else {
            println!("  Proceed with caution.");
        }
        println!("  ============================================");
        println!();
    }
}
