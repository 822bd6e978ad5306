//! Shared in-memory engine fake for unit tests.

use crate::engine::{
    EngineClient, InteractionHandle, InteractionPart, PactHandle, SpecificationVersion,
};
use crate::error::{ConnectionError, PersistenceError, RegistrationError};
use serde_json::Value;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

pub(crate) const FAKE_PORT: u16 = 1234;

/// Records every primitive call in order; failure modes are scripted.
pub(crate) struct FakeEngine {
    calls: Mutex<Vec<String>>,
    refuse_interactions: bool,
    matched: bool,
    fail_write: bool,
    fail_start: bool,
    ready_after: u32,
    ready_polls: AtomicU32,
    cleanups: AtomicU32,
    server_live: Mutex<bool>,
}

impl FakeEngine {
    pub fn new() -> Self {
        FakeEngine {
            calls: Mutex::new(Vec::new()),
            refuse_interactions: false,
            matched: true,
            fail_write: false,
            fail_start: false,
            ready_after: 0,
            ready_polls: AtomicU32::new(0),
            cleanups: AtomicU32::new(0),
            server_live: Mutex::new(false),
        }
    }

    /// Refuse interaction handle allocation, as without an open context.
    pub fn refusing_interactions(mut self) -> Self {
        self.refuse_interactions = true;
        self
    }

    /// Report the registered interactions as not all matched.
    pub fn unmatched(mut self) -> Self {
        self.matched = false;
        self
    }

    pub fn failing_write(mut self) -> Self {
        self.fail_write = true;
        self
    }

    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    /// Report not-ready for the first `polls` readiness probes.
    pub fn ready_after(mut self, polls: u32) -> Self {
        self.ready_after = polls;
        self
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// How many times a live server was actually released.
    pub fn cleanup_count(&self) -> u32 {
        self.cleanups.load(Ordering::SeqCst)
    }
}

impl EngineClient for FakeEngine {
    fn init_logging(&self, level: &str) {
        self.record(format!("init_logging {level}"));
    }

    fn new_pact(&self, consumer: &str, provider: &str) -> Result<PactHandle, RegistrationError> {
        self.record(format!("new_pact {consumer} {provider}"));
        Ok(PactHandle(1))
    }

    fn with_specification(
        &self,
        _pact: PactHandle,
        version: SpecificationVersion,
    ) -> Result<(), RegistrationError> {
        self.record(format!("with_specification {}", version.as_str()));
        Ok(())
    }

    fn new_interaction(
        &self,
        _pact: PactHandle,
        description: &str,
    ) -> Result<InteractionHandle, RegistrationError> {
        if self.refuse_interactions {
            return Err(RegistrationError::NoPactContext);
        }
        self.record(format!("new_interaction {description}"));
        Ok(InteractionHandle(7))
    }

    fn upon_receiving(
        &self,
        _interaction: InteractionHandle,
        description: &str,
    ) -> Result<(), RegistrationError> {
        self.record(format!("upon_receiving {description}"));
        Ok(())
    }

    fn given(&self, _interaction: InteractionHandle, state: &str) -> Result<(), RegistrationError> {
        self.record(format!("given {state}"));
        Ok(())
    }

    fn given_with_param(
        &self,
        _interaction: InteractionHandle,
        state: &str,
        key: &str,
        value: &str,
    ) -> Result<(), RegistrationError> {
        self.record(format!("given_with_param {state} {key}={value}"));
        Ok(())
    }

    fn with_request(
        &self,
        _interaction: InteractionHandle,
        method: &str,
        path: &str,
    ) -> Result<(), RegistrationError> {
        self.record(format!("with_request {method} {path}"));
        Ok(())
    }

    fn with_query_parameter(
        &self,
        _interaction: InteractionHandle,
        key: &str,
        index: usize,
        value: &str,
    ) -> Result<(), RegistrationError> {
        self.record(format!("with_query_parameter {key}[{index}]={value}"));
        Ok(())
    }

    fn with_header(
        &self,
        _interaction: InteractionHandle,
        part: InteractionPart,
        name: &str,
        index: usize,
        value: &str,
    ) -> Result<(), RegistrationError> {
        self.record(format!(
            "with_header {} {name}[{index}]={value}",
            part.as_str()
        ));
        Ok(())
    }

    fn with_body(
        &self,
        _interaction: InteractionHandle,
        part: InteractionPart,
        content_type: &str,
        body: &str,
    ) -> Result<(), RegistrationError> {
        self.record(format!("with_body {} {content_type} {body}", part.as_str()));
        Ok(())
    }

    fn with_matching_rules(
        &self,
        _interaction: InteractionHandle,
        part: InteractionPart,
        rules: &Value,
    ) -> Result<(), RegistrationError> {
        self.record(format!("with_matching_rules {} {rules}", part.as_str()));
        Ok(())
    }

    fn with_generators(
        &self,
        _interaction: InteractionHandle,
        part: InteractionPart,
        generators: &Value,
    ) -> Result<(), RegistrationError> {
        self.record(format!("with_generators {} {generators}", part.as_str()));
        Ok(())
    }

    fn with_status(
        &self,
        _interaction: InteractionHandle,
        status: u16,
    ) -> Result<(), RegistrationError> {
        self.record(format!("with_status {status}"));
        Ok(())
    }

    fn start_mock_server(&self, _pact: PactHandle, addr: &str) -> Result<u16, ConnectionError> {
        if self.fail_start {
            return Err(ConnectionError::StartFailed {
                addr: addr.to_string(),
                reason: "address in use".to_string(),
            });
        }
        self.record(format!("start_mock_server {addr}"));
        *self.server_live.lock().unwrap() = true;
        Ok(FAKE_PORT)
    }

    fn mock_server_ready(&self, _port: u16) -> bool {
        self.ready_polls.fetch_add(1, Ordering::SeqCst) >= self.ready_after
    }

    fn mock_server_matched(&self, port: u16) -> bool {
        self.record(format!("mock_server_matched {port}"));
        self.matched
    }

    fn write_pact_file(&self, _pact: PactHandle, dir: &Path) -> Result<(), PersistenceError> {
        if self.fail_write {
            return Err(PersistenceError::WriteFailed {
                path: dir.display().to_string(),
                reason: "read-only output directory".to_string(),
            });
        }
        self.record(format!("write_pact_file {}", dir.display()));
        Ok(())
    }

    fn cleanup_mock_server(&self, port: u16) -> bool {
        self.record(format!("cleanup_mock_server {port}"));
        let mut live = self.server_live.lock().unwrap();
        if *live {
            *live = false;
            self.cleanups.fetch_add(1, Ordering::SeqCst);
            true
        } else {
            false
        }
    }
}
