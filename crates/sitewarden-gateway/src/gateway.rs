//! Ordered-fallback model gateway
//!
//! One abstraction over an ordered list of providers instead of
//! hand-duplicated fallback paths. Availability is probed exactly once
//! per gateway lifetime; provider failures are isolated, logged, and
//! fall through to the next provider. Only the final provider's
//! failure surfaces, and even that is encoded in the returned
//! [`ModelResponse`] rather than an error.

use async_trait::async_trait;
use sitewarden_core::{AiStatus, Error, ModelResponse, ModelSource};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::provider::{ModelChannel, ModelProvider};

/// Gateway over an ordered provider list (first = preferred)
pub struct ModelGateway {
    providers: Vec<Arc<dyn ModelProvider>>,
    availability: OnceCell<Vec<bool>>,
}

impl ModelGateway {
    /// Create a gateway trying `providers` in order
    pub fn new(providers: Vec<Arc<dyn ModelProvider>>) -> Self {
        Self {
            providers,
            availability: OnceCell::new(),
        }
    }

    /// Lazily initialize, probing each provider exactly once.
    ///
    /// Concurrent callers observe a single initialization; a provider
    /// that probes unavailable stays disabled for the gateway lifetime.
    async fn availability(&self) -> &[bool] {
        self.availability
            .get_or_init(|| async {
                let mut flags = Vec::with_capacity(self.providers.len());
                for provider in &self.providers {
                    let available = provider.available().await;
                    info!(
                        provider = provider.name(),
                        available, "probed model provider"
                    );
                    flags.push(available);
                }
                flags
            })
            .await
    }

    /// Ask the model through the fallback chain. Never fails: all
    /// failure is encoded in the return value.
    pub async fn ask(&self, prompt: &str) -> ModelResponse {
        let availability = self.availability().await;
        let mut last_error: Option<Error> = None;

        for (provider, available) in self.providers.iter().zip(availability) {
            if !available {
                debug!(provider = provider.name(), "skipping unavailable provider");
                continue;
            }

            metrics::counter!(
                "sitewarden_provider_requests_total",
                "provider" => provider.name().to_string()
            )
            .increment(1);

            match provider.ask(prompt).await {
                Ok(text) => {
                    debug!(provider = provider.name(), "provider answered");
                    return ModelResponse::success(text, provider.source());
                }
                Err(e) => {
                    metrics::counter!(
                        "sitewarden_provider_failures_total",
                        "provider" => provider.name().to_string()
                    )
                    .increment(1);
                    warn!(provider = provider.name(), error = %e, "provider failed, falling through");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => ModelResponse::failure(e.to_string()),
            None => ModelResponse::failure("no model provider available"),
        }
    }

    /// Report on-device availability
    pub async fn status(&self) -> AiStatus {
        let availability = self.availability().await;
        let builtin_available = self
            .providers
            .iter()
            .zip(availability)
            .any(|(p, available)| *available && p.source() == ModelSource::BuiltIn);

        AiStatus { builtin_available }
    }
}

#[async_trait]
impl ModelChannel for ModelGateway {
    async fn ask(&self, prompt: &str) -> ModelResponse {
        ModelGateway::ask(self, prompt).await
    }

    async fn status(&self) -> AiStatus {
        ModelGateway::status(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitewarden_core::Result;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// A configurable mock provider for testing fallback behavior
    struct MockProvider {
        name: String,
        source: ModelSource,
        available: bool,
        reply: Result<String>,
        probe_count: AtomicU32,
        ask_count: AtomicU32,
    }

    impl MockProvider {
        fn ok(name: &str, source: ModelSource, reply: &str) -> Self {
            Self {
                name: name.to_string(),
                source,
                available: true,
                reply: Ok(reply.to_string()),
                probe_count: AtomicU32::new(0),
                ask_count: AtomicU32::new(0),
            }
        }

        fn failing(name: &str, source: ModelSource) -> Self {
            Self {
                reply: Err(Error::provider("simulated failure")),
                ..Self::ok(name, source, "")
            }
        }

        fn unavailable(name: &str, source: ModelSource) -> Self {
            Self {
                available: false,
                ..Self::ok(name, source, "unreachable")
            }
        }
    }

    #[async_trait]
    impl ModelProvider for MockProvider {
        fn name(&self) -> &str {
            &self.name
        }

        fn source(&self) -> ModelSource {
            self.source
        }

        async fn available(&self) -> bool {
            self.probe_count.fetch_add(1, Ordering::SeqCst);
            self.available
        }

        async fn ask(&self, _prompt: &str) -> Result<String> {
            self.ask_count.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(_) => Err(Error::provider("simulated failure")),
            }
        }
    }

    #[tokio::test]
    async fn test_local_success_skips_cloud() {
        let local = Arc::new(MockProvider::ok("local", ModelSource::BuiltIn, "local says hi"));
        let cloud = Arc::new(MockProvider::ok("cloud", ModelSource::Cloud, "cloud says hi"));
        let gateway = ModelGateway::new(vec![local.clone(), cloud.clone()]);

        let response = gateway.ask("p").await;
        assert!(response.success);
        assert_eq!(response.source, Some(ModelSource::BuiltIn));
        assert_eq!(response.text.as_deref(), Some("local says hi"));
        assert_eq!(cloud.ask_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_local_failure_falls_through_to_cloud() {
        let local = Arc::new(MockProvider::failing("local", ModelSource::BuiltIn));
        let cloud = Arc::new(MockProvider::ok("cloud", ModelSource::Cloud, "fallback"));
        let gateway = ModelGateway::new(vec![local, cloud]);

        let response = gateway.ask("p").await;
        assert!(response.success);
        assert_eq!(response.source, Some(ModelSource::Cloud));
        assert_eq!(response.text.as_deref(), Some("fallback"));
    }

    #[tokio::test]
    async fn test_total_failure_reports_error() {
        let local = Arc::new(MockProvider::failing("local", ModelSource::BuiltIn));
        let cloud = Arc::new(MockProvider::failing("cloud", ModelSource::Cloud));
        let gateway = ModelGateway::new(vec![local, cloud]);

        let response = gateway.ask("p").await;
        assert!(!response.success);
        assert!(response.text.is_none());
        let error = response.error.unwrap();
        assert!(!error.is_empty());
    }

    #[tokio::test]
    async fn test_no_providers_at_all() {
        let gateway = ModelGateway::new(Vec::new());
        let response = gateway.ask("p").await;
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("no model provider available"));
    }

    #[tokio::test]
    async fn test_unavailable_provider_is_never_asked() {
        let local = Arc::new(MockProvider::unavailable("local", ModelSource::BuiltIn));
        let cloud = Arc::new(MockProvider::ok("cloud", ModelSource::Cloud, "ok"));
        let gateway = ModelGateway::new(vec![local.clone(), cloud]);

        let response = gateway.ask("p").await;
        assert!(response.success);
        assert_eq!(local.ask_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_probe_runs_once_across_calls() {
        let local = Arc::new(MockProvider::ok("local", ModelSource::BuiltIn, "hi"));
        let gateway = Arc::new(ModelGateway::new(vec![local.clone()]));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let gateway = Arc::clone(&gateway);
            handles.push(tokio::spawn(async move { gateway.ask("p").await }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().success);
        }

        assert_eq!(local.probe_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_status_reflects_builtin_only() {
        let local = Arc::new(MockProvider::unavailable("local", ModelSource::BuiltIn));
        let cloud = Arc::new(MockProvider::ok("cloud", ModelSource::Cloud, "ok"));
        let gateway = ModelGateway::new(vec![local, cloud]);

        assert!(!gateway.status().await.builtin_available);

        let local = Arc::new(MockProvider::ok("local", ModelSource::BuiltIn, "ok"));
        let gateway = ModelGateway::new(vec![local]);
        assert!(gateway.status().await.builtin_available);
    }
}
