//! Consumer-driven contract testing.
//!
//! A consumer test describes the requests it will send and the responses it
//! expects, with matchers wherever a value may vary and generators for the
//! concrete examples. It registers the interaction with the contract engine,
//! exercises its own code against the served mock, and persists the contract
//! for the provider to verify.
//!
//! ```no_run
//! use accord_consumer::config::MockServerConfig;
//! use accord_consumer::matcher::Matcher;
//! use accord_consumer::model::{ConsumerRequest, Interaction, ProviderResponse};
//! use accord_consumer::registry::InteractionRegistry;
//! use serde_json::json;
//! # async fn example(client: std::sync::Arc<impl accord_consumer::engine::EngineClient>)
//! # -> Result<(), accord_consumer::error::Error> {
//!
//! let interaction = Interaction::new(
//!     "a get request to /goodbye/{name}",
//!     ConsumerRequest::new()
//!         .method("GET")
//!         .path("/goodbye/Bob")
//!         .add_header("Content-Type", "application/json"),
//!     ProviderResponse::new()
//!         .status(200u16)
//!         .add_header("Content-Type", "application/json")
//!         .body(json!({"message": "Goodbye, Bob"})),
//! )
//! .given("Get Goodbye");
//!
//! let config = MockServerConfig::new("goodbye-consumer", "goodbye-provider");
//! let mut registry = InteractionRegistry::from_engine(client, config)?;
//! registry.register(&interaction).await?;
//! // ... exercise the consumer against registry.base_url() ...
//! assert!(registry.verify_interactions()?);
//! # Ok(())
//! # }
//! ```

// ===== Matcher/generator composition =====
pub mod combinator;
pub mod generator;
pub mod matcher;
pub mod term;

// ===== Interaction model and registration =====
pub mod config;
pub mod contract;
pub mod driver;
pub mod engine;
pub mod error;
pub mod mock_server;
pub mod model;
pub mod registry;

#[cfg(test)]
mod testing;

// Re-export the types a consumer test touches directly.
pub use config::MockServerConfig;
pub use error::Error;
pub use matcher::{HttpStatusClass, Matcher};
pub use model::{ConsumerRequest, Interaction, ProviderResponse, ProviderState};
pub use registry::InteractionRegistry;
pub use term::Term;
