//! SiteWarden Signals
//!
//! Bounded structural snapshots of HTML documents: element counts plus
//! small text samples (headings, first paragraphs, form labels) that
//! feed the classification prompt.

pub mod collector;

pub use collector::{SignalCollector, MAX_FORM_LABELS, MAX_HEADINGS, MAX_PARAGRAPHS};
