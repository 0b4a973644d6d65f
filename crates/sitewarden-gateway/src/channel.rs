//! Host messaging channel
//!
//! An explicit asynchronous request/response channel crossing the
//! privilege boundary between a page context and the host process that
//! owns the gateway. Each request is a single round trip with an
//! explicit timeout; a timed-out round trip surfaces as the distinct
//! [`Error::Timeout`] kind before being absorbed into the
//! [`ModelResponse`] the pipeline sees.

use async_trait::async_trait;
use sitewarden_core::{AiStatus, Error, HostRequest, HostResponse, ModelResponse, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::gateway::ModelGateway;
use crate::provider::ModelChannel;

/// Default round-trip timeout
pub const DEFAULT_CHANNEL_TIMEOUT: Duration = Duration::from_secs(60);

struct Envelope {
    request: HostRequest,
    reply: oneshot::Sender<HostResponse>,
}

/// Page-side endpoint: sends requests, awaits replies with a timeout
#[derive(Clone)]
pub struct ChannelClient {
    tx: mpsc::Sender<Envelope>,
    timeout: Duration,
}

/// Host-side endpoint: services requests against the gateway
pub struct ChannelServer {
    rx: mpsc::Receiver<Envelope>,
    gateway: Arc<ModelGateway>,
}

/// Create a connected client/server pair over the given gateway
pub fn pair(
    gateway: Arc<ModelGateway>,
    timeout: Duration,
    capacity: usize,
) -> (ChannelClient, ChannelServer) {
    let (tx, rx) = mpsc::channel(capacity);
    (ChannelClient { tx, timeout }, ChannelServer { rx, gateway })
}

impl ChannelServer {
    /// Service requests until every client is dropped.
    ///
    /// Requests are handled one at a time: each analysis is a single
    /// suspend-resume chain, not parallel branches.
    pub async fn run(mut self) {
        while let Some(envelope) = self.rx.recv().await {
            let response = match envelope.request {
                HostRequest::AskModel { prompt } => {
                    HostResponse::Model(self.gateway.ask(&prompt).await)
                }
                HostRequest::AiStatus => HostResponse::Status(self.gateway.status().await),
            };

            // A dropped reply half means the client gave up (timeout);
            // nothing to do but move on.
            if envelope.reply.send(response).is_err() {
                debug!("host channel client dropped before reply");
            }
        }
    }
}

impl ChannelClient {
    /// One request/response round trip
    async fn request(&self, request: HostRequest) -> Result<HostResponse> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Envelope {
                request,
                reply: reply_tx,
            })
            .await
            .map_err(|_| Error::channel("host channel closed"))?;

        match tokio::time::timeout(self.timeout, reply_rx).await {
            Err(_) => Err(Error::Timeout),
            Ok(Err(_)) => Err(Error::channel("host dropped the reply")),
            Ok(Ok(response)) => Ok(response),
        }
    }
}

#[async_trait]
impl ModelChannel for ChannelClient {
    async fn ask(&self, prompt: &str) -> ModelResponse {
        let request = HostRequest::AskModel {
            prompt: prompt.to_string(),
        };

        match self.request(request).await {
            Ok(HostResponse::Model(response)) => response,
            Ok(HostResponse::Status(_)) => {
                ModelResponse::failure("host answered with the wrong response kind")
            }
            Err(e) => {
                warn!(error = %e, "host channel round trip failed");
                ModelResponse::failure(e.to_string())
            }
        }
    }

    async fn status(&self) -> AiStatus {
        match self.request(HostRequest::AiStatus).await {
            Ok(HostResponse::Status(status)) => status,
            // Fail-open toward "not available": the gateway will still
            // try its own fallback chain when asked.
            _ => AiStatus {
                builtin_available: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ModelProvider;
    use sitewarden_core::ModelSource;

    struct SlowProvider {
        delay: Duration,
    }

    #[async_trait]
    impl ModelProvider for SlowProvider {
        fn name(&self) -> &str {
            "slow"
        }

        fn source(&self) -> ModelSource {
            ModelSource::Cloud
        }

        async fn available(&self) -> bool {
            true
        }

        async fn ask(&self, _prompt: &str) -> Result<String> {
            tokio::time::sleep(self.delay).await;
            Ok("late reply".to_string())
        }
    }

    fn gateway_with_delay(delay: Duration) -> Arc<ModelGateway> {
        Arc::new(ModelGateway::new(vec![Arc::new(SlowProvider { delay })]))
    }

    #[tokio::test]
    async fn test_round_trip() {
        let gateway = gateway_with_delay(Duration::ZERO);
        let (client, server) = pair(gateway, Duration::from_secs(5), 16);
        tokio::spawn(server.run());

        let response = client.ask("hello").await;
        assert!(response.success);
        assert_eq!(response.text.as_deref(), Some("late reply"));

        let status = client.status().await;
        assert!(!status.builtin_available);
    }

    #[tokio::test]
    async fn test_timeout_is_a_distinct_failure() {
        let gateway = gateway_with_delay(Duration::from_secs(60));
        let (client, server) = pair(gateway, Duration::from_millis(20), 16);
        tokio::spawn(server.run());

        let response = client.ask("hello").await;
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some(Error::Timeout.to_string().as_str()));
    }

    #[tokio::test]
    async fn test_closed_server_is_a_channel_error() {
        let gateway = gateway_with_delay(Duration::ZERO);
        let (client, server) = pair(gateway, Duration::from_secs(1), 16);
        drop(server);

        let response = client.ask("hello").await;
        assert!(!response.success);
        assert!(response.error.unwrap().contains("channel"));
    }
}
