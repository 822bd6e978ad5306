//! Error taxonomy for the consumer core.
//!
//! Construction problems surface immediately at build time, registration
//! problems abandon the sequence, and a verification mismatch is a plain
//! boolean outcome rather than an error. Nothing in this crate retries
//! silently.

use thiserror::Error;

/// Invalid matcher or generator parameters, rejected at build time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstructionError {
    #[error("status class '{0}' is not supported; supported classes are: {1}")]
    InvalidStatusClass(String, String),
    #[error("invalid regex pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("minimum {min} is greater than maximum {max}")]
    InvalidBounds { min: usize, max: usize },
    #[error("matcher '{0}' requires an example value or an attached generator")]
    MissingExample(String),
    #[error("{0}")]
    InvalidValue(String),
}

/// Generator parameters turned out to be self-contradictory at generation time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("random integer bounds are contradictory: {min} > {max}")]
    ContradictoryBounds { min: i64, max: i64 },
    #[error("cannot sample from regex '{pattern}': {reason}")]
    UnsampleablePattern { pattern: String, reason: String },
    #[error("unsupported date/time format token '{0}'")]
    UnsupportedFormatToken(String),
}

/// The engine refused a primitive registration call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    #[error("no active contract context for handle allocation")]
    NoPactContext,
    #[error("interaction handle {0} is unknown to the engine")]
    UnknownInteraction(u32),
    #[error("engine rejected '{call}': {reason}")]
    CallRejected { call: String, reason: String },
}

/// The engine could not write the contract document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PersistenceError {
    #[error("failed to write contract to '{path}': {reason}")]
    WriteFailed { path: String, reason: String },
    #[error("contract context {0} has no registered interactions")]
    EmptyContract(u32),
}

/// A collaborator lifecycle or readiness call failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConnectionError {
    #[error("mock server failed to start on {addr}: {reason}")]
    StartFailed { addr: String, reason: String },
    #[error("mock server on port {port} not ready within {waited_ms}ms")]
    ReadyTimeout { port: u16, waited_ms: u64 },
    #[error("mock server is not running")]
    NotRunning,
}

/// Umbrella error for the orchestration layer.
///
/// The registry composes registration, lifecycle, and persistence steps;
/// callers that want the precise failure can match on the variant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Construction(#[from] ConstructionError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}
