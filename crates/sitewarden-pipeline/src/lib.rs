//! SiteWarden Pipeline
//!
//! The AI-backed classification pipeline: gather page signals, build a
//! prompt, invoke a language model through the gateway's fallback
//! chain, parse its output defensively, and map the result to a
//! user-facing action.

pub mod notify;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod settings;
pub mod trust;

pub use notify::{Notification, NotificationSink, TracingSink};
pub use parser::parse_verdict;
pub use pipeline::{AnalysisOutcome, ClassificationPipeline};
pub use prompt::build_prompt;
pub use settings::SettingsStore;
pub use trust::is_trusted;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::notify::{Notification, NotificationSink};
    pub use crate::pipeline::{AnalysisOutcome, ClassificationPipeline};
    pub use crate::settings::SettingsStore;
}
