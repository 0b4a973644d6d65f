//! Provider capability interface and the channel seam consumed by the pipeline

use async_trait::async_trait;
use sitewarden_core::{AiStatus, ModelResponse, ModelSource, Result};

/// A single language-model capability the gateway can try.
///
/// Providers have orthogonal failure modes (model not downloaded vs.
/// network/auth failure), so each one isolates its own failures behind
/// `Result` and the gateway decides what falls through.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name for logs and metrics
    fn name(&self) -> &str;

    /// Which response source this provider reports on success
    fn source(&self) -> ModelSource;

    /// Probe whether this provider can serve requests.
    ///
    /// Called once per gateway lifetime; the result is cached, so an
    /// expensive probe (session creation, download check) never runs
    /// per-call.
    async fn available(&self) -> bool;

    /// Ask the model for a completion of `prompt`
    async fn ask(&self, prompt: &str) -> Result<String>;
}

/// The one logical "ask a language model" operation the pipeline sees.
///
/// Implemented directly by the in-process gateway and by the host
/// channel client that crosses a privilege boundary. Neither
/// implementation ever returns an error: all failure is encoded in the
/// [`ModelResponse`].
#[async_trait]
pub trait ModelChannel: Send + Sync {
    /// Ask the model, absorbing all failures into the response
    async fn ask(&self, prompt: &str) -> ModelResponse;

    /// Query on-device availability
    async fn status(&self) -> AiStatus;
}
