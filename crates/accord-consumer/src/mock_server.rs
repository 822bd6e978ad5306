//! The mock server collaborator.
//!
//! The registry talks to the mock server through a narrow trait so the full
//! lifecycle is testable without a real server process. The engine-backed
//! implementation treats start as blocking until the server accepts traffic
//! (bounded wait) and release as idempotent, with a drop backstop so the
//! server cannot leak past the owning scope.

use crate::config::MockServerConfig;
use crate::engine::{EngineClient, PactHandle};
use crate::error::{ConnectionError, PersistenceError};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// One mock server bound to a registered interaction set.
#[async_trait]
pub trait MockServer: Send {
    /// Start and block until the server accepts traffic, within a bounded
    /// wait.
    async fn start(&mut self) -> Result<(), ConnectionError>;

    /// Whether every registered interaction was exercised and matched.
    fn is_matched(&self) -> bool;

    /// Persist the contract document.
    fn write_pact(&self) -> Result<(), PersistenceError>;

    /// Release the server and its engine-side interaction state. Idempotent;
    /// returns whether a live server was released.
    fn clean_up(&mut self) -> bool;

    /// Base URL for exercising the consumer against the running server.
    fn base_url(&self) -> Option<String>;
}

/// Engine-backed mock server.
pub struct EngineMockServer<C: EngineClient> {
    client: Arc<C>,
    pact: PactHandle,
    config: MockServerConfig,
    port: Option<u16>,
}

impl<C: EngineClient> EngineMockServer<C> {
    pub fn new(client: Arc<C>, pact: PactHandle, config: MockServerConfig) -> Self {
        EngineMockServer {
            client,
            pact,
            config,
            port: None,
        }
    }

    fn release(&mut self) -> bool {
        match self.port.take() {
            Some(port) => {
                debug!(port, "releasing mock server");
                self.client.cleanup_mock_server(port)
            }
            None => false,
        }
    }
}

#[async_trait]
impl<C: EngineClient> MockServer for EngineMockServer<C> {
    async fn start(&mut self) -> Result<(), ConnectionError> {
        if self.port.is_some() {
            return Ok(());
        }

        let addr = self.config.bind_address();
        let port = self.client.start_mock_server(self.pact, &addr)?;

        let timeout = self.config.ready_timeout_ref();
        let deadline = tokio::time::Instant::now() + timeout;
        while !self.client.mock_server_ready(port) {
            if tokio::time::Instant::now() >= deadline {
                self.client.cleanup_mock_server(port);
                return Err(ConnectionError::ReadyTimeout {
                    port,
                    waited_ms: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        info!(port, "mock server accepting traffic");
        self.port = Some(port);
        Ok(())
    }

    fn is_matched(&self) -> bool {
        match self.port {
            Some(port) => self.client.mock_server_matched(port),
            None => false,
        }
    }

    fn write_pact(&self) -> Result<(), PersistenceError> {
        self.client
            .write_pact_file(self.pact, self.config.pact_dir_ref())
    }

    fn clean_up(&mut self) -> bool {
        self.release()
    }

    fn base_url(&self) -> Option<String> {
        self.port
            .map(|port| format!("http://{}:{}", self.config.host_ref(), port))
    }
}

impl<C: EngineClient> Drop for EngineMockServer<C> {
    fn drop(&mut self) {
        if self.port.is_some() {
            warn!("mock server still live at drop; releasing");
            self.release();
        }
    }
}
