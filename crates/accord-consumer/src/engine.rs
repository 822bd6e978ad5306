//! The narrow boundary to the external contract engine.
//!
//! Everything above this trait (matchers, the combinator, the registration
//! driver, the registry) is testable against an in-memory implementation;
//! the real engine is reached through the same surface. Calls mirror the
//! engine's primitive registration interface one-to-one and carry no
//! orchestration logic of their own.

use crate::error::{ConnectionError, PersistenceError, RegistrationError};
use serde_json::Value;
use std::path::Path;

/// Handle to an open contract context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PactHandle(pub u32);

/// Handle to one interaction within a contract context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InteractionHandle(pub u32);

/// Which side of the exchange a registration call applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionPart {
    Request,
    Response,
}

impl InteractionPart {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionPart::Request => "request",
            InteractionPart::Response => "response",
        }
    }
}

/// Contract specification version tag written to the persisted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecificationVersion {
    V3,
    #[default]
    V4,
}

impl SpecificationVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecificationVersion::V3 => "3.0.0",
            SpecificationVersion::V4 => "4.0.0",
        }
    }
}

/// The primitive call surface owed to the external engine.
///
/// Mock-server handles are the bound port, as the engine reports it.
pub trait EngineClient: Send + Sync {
    /// Forward a log-level override to the engine. Called at most once,
    /// before any other call; absence leaves engine default logging.
    fn init_logging(&self, level: &str);

    /// Open a contract context for a consumer/provider pair.
    fn new_pact(&self, consumer: &str, provider: &str) -> Result<PactHandle, RegistrationError>;

    /// Pin the specification version the contract is written as.
    fn with_specification(
        &self,
        pact: PactHandle,
        version: SpecificationVersion,
    ) -> Result<(), RegistrationError>;

    /// Allocate an interaction handle within the context.
    fn new_interaction(
        &self,
        pact: PactHandle,
        description: &str,
    ) -> Result<InteractionHandle, RegistrationError>;

    fn upon_receiving(
        &self,
        interaction: InteractionHandle,
        description: &str,
    ) -> Result<(), RegistrationError>;

    fn given(&self, interaction: InteractionHandle, state: &str) -> Result<(), RegistrationError>;

    fn given_with_param(
        &self,
        interaction: InteractionHandle,
        state: &str,
        key: &str,
        value: &str,
    ) -> Result<(), RegistrationError>;

    fn with_request(
        &self,
        interaction: InteractionHandle,
        method: &str,
        path: &str,
    ) -> Result<(), RegistrationError>;

    fn with_query_parameter(
        &self,
        interaction: InteractionHandle,
        key: &str,
        index: usize,
        value: &str,
    ) -> Result<(), RegistrationError>;

    fn with_header(
        &self,
        interaction: InteractionHandle,
        part: InteractionPart,
        name: &str,
        index: usize,
        value: &str,
    ) -> Result<(), RegistrationError>;

    fn with_body(
        &self,
        interaction: InteractionHandle,
        part: InteractionPart,
        content_type: &str,
        body: &str,
    ) -> Result<(), RegistrationError>;

    /// Attach the matching-rules fragment for one side of the exchange.
    fn with_matching_rules(
        &self,
        interaction: InteractionHandle,
        part: InteractionPart,
        rules: &Value,
    ) -> Result<(), RegistrationError>;

    /// Attach the generators fragment for one side of the exchange.
    fn with_generators(
        &self,
        interaction: InteractionHandle,
        part: InteractionPart,
        generators: &Value,
    ) -> Result<(), RegistrationError>;

    fn with_status(
        &self,
        interaction: InteractionHandle,
        status: u16,
    ) -> Result<(), RegistrationError>;

    /// Start a mock server for the context; returns the bound port.
    fn start_mock_server(&self, pact: PactHandle, addr: &str) -> Result<u16, ConnectionError>;

    /// Whether the server is accepting traffic yet.
    fn mock_server_ready(&self, port: u16) -> bool;

    /// Whether every registered interaction was exercised and matched.
    fn mock_server_matched(&self, port: u16) -> bool;

    /// Persist the contract document for the context into `dir`.
    fn write_pact_file(&self, pact: PactHandle, dir: &Path) -> Result<(), PersistenceError>;

    /// Release the mock server and its interaction state. Idempotent; returns
    /// whether a server was actually released.
    fn cleanup_mock_server(&self, port: u16) -> bool;
}
