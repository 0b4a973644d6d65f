//! Classification pipeline
//!
//! The root orchestrator: settings snapshot → trust check → signal
//! collection → prompt construction → model query → verdict parsing →
//! dispatch. One linear suspend-resume chain, no parallel branches.
//!
//! Failure policy is fail-open: every failure is absorbed where it
//! occurs and degrades to the safe default verdict. The only
//! user-visible failure state is "no verdict", indistinguishable from
//! "the site is safe". An advisory feature must never break the page
//! it is advising on.

use sitewarden_core::{ModelSource, ResponseMode, Result, Verdict};
use sitewarden_gateway::ModelChannel;
use sitewarden_signals::SignalCollector;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::notify::{Notification, NotificationSink};
use crate::parser::parse_verdict;
use crate::prompt::build_prompt;
use crate::settings::SettingsStore;
use crate::trust::is_trusted;

/// How one analysis run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// The domain matched the allowlist; analysis terminated silently
    Trusted,

    /// Another analysis was already in flight on this pipeline
    InFlight,

    /// Analysis ran to completion
    Completed {
        /// Final verdict (the safe default when the model was skipped
        /// or failed)
        verdict: Verdict,

        /// Whether the sink was invoked
        dispatched: bool,

        /// Provider that answered, when one did
        source: Option<ModelSource>,
    },
}

/// Root orchestrator for a single page context
pub struct ClassificationPipeline {
    settings: Arc<SettingsStore>,
    collector: SignalCollector,
    channel: Arc<dyn ModelChannel>,
    sink: Arc<dyn NotificationSink>,
    in_flight: AtomicBool,
}

impl ClassificationPipeline {
    /// Build a pipeline over the given collaborators
    pub fn new(
        settings: Arc<SettingsStore>,
        channel: Arc<dyn ModelChannel>,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<Self> {
        Ok(Self {
            settings,
            collector: SignalCollector::new()?,
            channel,
            sink,
            in_flight: AtomicBool::new(false),
        })
    }

    /// Analyze one page snapshot.
    ///
    /// Idempotent guard: overlapping calls against the same pipeline
    /// instance return [`AnalysisOutcome::InFlight`] without running.
    pub async fn analyze(&self, page_url: &str, html: &str) -> AnalysisOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!(url = page_url, "analysis already in flight, skipping");
            return AnalysisOutcome::InFlight;
        }

        let outcome = self.run(page_url, html).await;
        self.in_flight.store(false, Ordering::SeqCst);
        outcome
    }

    async fn run(&self, page_url: &str, html: &str) -> AnalysisOutcome {
        metrics::counter!("sitewarden_analyses_total").increment(1);

        let settings = self.settings.snapshot();
        let signals = self.collector.collect(html, page_url);

        if is_trusted(&signals.domain, &settings.trusted_sites) {
            debug!(domain = %signals.domain, "skipped trusted site");
            metrics::counter!("sitewarden_trusted_skips_total").increment(1);
            return AnalysisOutcome::Trusted;
        }

        let (verdict, source) = if settings.chat_analysis {
            let prompt = build_prompt(&signals);
            let response = self.channel.ask(&prompt).await;

            if response.success {
                let text = response.text.unwrap_or_default();
                (parse_verdict(&text), response.source)
            } else {
                // Fail open: a total provider outage degrades to "safe"
                warn!(
                    error = response.error.as_deref().unwrap_or("unknown"),
                    "model request failed, defaulting to safe"
                );
                (Verdict::safe(), None)
            }
        } else {
            debug!("AI analysis disabled, using safe default");
            (Verdict::safe(), None)
        };

        metrics::counter!(
            "sitewarden_verdicts_total",
            "suspicious" => if verdict.is_suspicious { "true" } else { "false" }
        )
        .increment(1);

        let dispatched = verdict.is_suspicious;
        if dispatched {
            let block = settings.mode == ResponseMode::Block;
            info!(domain = %signals.domain, block, reason = %verdict.reason, "dispatching notification");
            self.sink.notify(&Notification::from_verdict(&verdict, block));
        } else {
            debug!(domain = %signals.domain, "site appears safe");
        }

        AnalysisOutcome::Completed {
            verdict,
            dispatched,
            source,
        }
    }
}
