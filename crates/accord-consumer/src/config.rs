//! Mock server and contract output configuration.

use crate::engine::SpecificationVersion;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable carrying an optional engine log-level override.
pub const LOG_LEVEL_ENV: &str = "ACCORD_LOG_LEVEL";

/// Configuration for one consumer/provider contract session.
///
/// The log level is the one environment read this crate performs, captured
/// once when the configuration is built; when the variable is absent the
/// engine keeps its default logging.
#[derive(Debug, Clone, PartialEq)]
pub struct MockServerConfig {
    consumer: String,
    provider: String,
    pact_dir: PathBuf,
    specification: SpecificationVersion,
    host: String,
    port: u16,
    log_level: Option<String>,
    ready_timeout: Duration,
}

impl MockServerConfig {
    pub fn new(consumer: &str, provider: &str) -> Self {
        MockServerConfig {
            consumer: consumer.to_string(),
            provider: provider.to_string(),
            pact_dir: PathBuf::from("pacts"),
            specification: SpecificationVersion::default(),
            host: "127.0.0.1".to_string(),
            port: 0,
            log_level: std::env::var(LOG_LEVEL_ENV).ok(),
            ready_timeout: Duration::from_secs(5),
        }
    }

    /// Directory the contract document is written into.
    pub fn pact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.pact_dir = dir.into();
        self
    }

    pub fn specification(mut self, specification: SpecificationVersion) -> Self {
        self.specification = specification;
        self
    }

    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    /// Port to bind the mock server to; 0 lets the engine pick one.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Bound on how long to wait for the mock server to accept traffic.
    pub fn ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }

    /// Override the engine log level explicitly, taking precedence over the
    /// environment capture.
    pub fn log_level(mut self, level: &str) -> Self {
        self.log_level = Some(level.to_string());
        self
    }

    pub fn consumer_ref(&self) -> &str {
        &self.consumer
    }

    pub fn provider_ref(&self) -> &str {
        &self.provider
    }

    pub fn pact_dir_ref(&self) -> &Path {
        &self.pact_dir
    }

    pub fn specification_ref(&self) -> SpecificationVersion {
        self.specification
    }

    pub fn host_ref(&self) -> &str {
        &self.host
    }

    pub fn log_level_ref(&self) -> Option<&str> {
        self.log_level.as_deref()
    }

    pub fn ready_timeout_ref(&self) -> Duration {
        self.ready_timeout
    }

    /// Address handed to the engine when starting the mock server.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
