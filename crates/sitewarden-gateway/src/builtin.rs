//! Built-in (on-device) model provider
//!
//! The inference engine itself is out of scope: embedders supply it
//! behind the narrow [`LocalModel`] / [`LocalSession`] interface. This
//! module owns the session lifecycle: availability is probed and the
//! session created at most once per provider lifetime, and a creation
//! failure permanently disables the provider instead of re-probing on
//! every call.

use async_trait::async_trait;
use sitewarden_core::{Error, ModelSource, Result};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::provider::ModelProvider;

/// Reported readiness of the on-device capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Model is resident and ready to serve
    Ready,
    /// Model exists but needs a download before first use
    AfterDownload,
    /// No on-device capability
    Unavailable,
}

/// An open inference session against the on-device model
#[async_trait]
pub trait LocalSession: Send + Sync {
    /// Run one prompt through the session
    async fn prompt(&self, input: &str) -> Result<String>;
}

/// The on-device inference engine
#[async_trait]
pub trait LocalModel: Send + Sync {
    /// Query current readiness
    async fn availability(&self) -> Availability;

    /// Create an inference session. May trigger a model download.
    async fn create_session(&self) -> Result<Box<dyn LocalSession>>;
}

/// Provider wrapping an on-device engine with guarded one-shot
/// session initialization.
pub struct BuiltinProvider {
    engine: Arc<dyn LocalModel>,
    session: OnceCell<Option<Box<dyn LocalSession>>>,
}

impl BuiltinProvider {
    /// Create a provider over the given engine
    pub fn new(engine: Arc<dyn LocalModel>) -> Self {
        Self {
            engine,
            session: OnceCell::new(),
        }
    }

    /// Initialize the session exactly once, concurrent callers included.
    ///
    /// `None` means the capability is permanently unusable for this
    /// provider's lifetime.
    async fn session(&self) -> &Option<Box<dyn LocalSession>> {
        self.session
            .get_or_init(|| async {
                match self.engine.availability().await {
                    Availability::Unavailable => {
                        debug!("built-in model not present, provider disabled");
                        None
                    }
                    state @ (Availability::Ready | Availability::AfterDownload) => {
                        if state == Availability::AfterDownload {
                            info!("built-in model needs download, attempting session anyway");
                        }
                        match self.engine.create_session().await {
                            Ok(session) => {
                                info!("built-in model session created");
                                Some(session)
                            }
                            Err(e) => {
                                warn!(error = %e, "failed to create built-in session, provider disabled");
                                None
                            }
                        }
                    }
                }
            })
            .await
    }
}

#[async_trait]
impl ModelProvider for BuiltinProvider {
    fn name(&self) -> &str {
        "built-in"
    }

    fn source(&self) -> ModelSource {
        ModelSource::BuiltIn
    }

    async fn available(&self) -> bool {
        self.session().await.is_some()
    }

    async fn ask(&self, prompt: &str) -> Result<String> {
        let session = self
            .session()
            .await
            .as_ref()
            .ok_or_else(|| Error::unavailable("built-in model has no session"))?;

        let text = session.prompt(prompt).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::provider("built-in session returned empty output"));
        }

        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct StaticSession(String);

    #[async_trait]
    impl LocalSession for StaticSession {
        async fn prompt(&self, _input: &str) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    struct TestEngine {
        availability: Availability,
        reply: String,
        create_calls: AtomicU32,
        fail_create: bool,
    }

    impl TestEngine {
        fn new(availability: Availability, reply: &str) -> Self {
            Self {
                availability,
                reply: reply.to_string(),
                create_calls: AtomicU32::new(0),
                fail_create: false,
            }
        }
    }

    #[async_trait]
    impl LocalModel for TestEngine {
        async fn availability(&self) -> Availability {
            self.availability
        }

        async fn create_session(&self) -> Result<Box<dyn LocalSession>> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_create {
                return Err(Error::provider("download pending"));
            }
            Ok(Box::new(StaticSession(self.reply.clone())))
        }
    }

    #[tokio::test]
    async fn test_ready_engine_serves_prompts() {
        let engine = Arc::new(TestEngine::new(Availability::Ready, "ok"));
        let provider = BuiltinProvider::new(engine);

        assert!(provider.available().await);
        assert_eq!(provider.ask("hi").await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_unavailable_engine_never_creates_session() {
        let engine = Arc::new(TestEngine::new(Availability::Unavailable, "ok"));
        let provider = BuiltinProvider::new(Arc::clone(&engine) as Arc<dyn LocalModel>);

        assert!(!provider.available().await);
        assert!(provider.ask("hi").await.is_err());
        assert_eq!(engine.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_session_failure_disables_provider_permanently() {
        let mut inner = TestEngine::new(Availability::Ready, "ok");
        inner.fail_create = true;
        let engine = Arc::new(inner);
        let provider = BuiltinProvider::new(Arc::clone(&engine) as Arc<dyn LocalModel>);

        assert!(!provider.available().await);
        assert!(!provider.available().await);
        assert!(provider.ask("hi").await.is_err());
        // Initialization ran once, not per call
        assert_eq!(engine.create_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_session_output_is_a_failure() {
        let engine = Arc::new(TestEngine::new(Availability::Ready, "   "));
        let provider = BuiltinProvider::new(engine);

        let err = provider.ask("hi").await.unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
    }
}
