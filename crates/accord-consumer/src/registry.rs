//! The interaction registry: one full contract lifecycle.
//!
//! Registration drives the typed call sequence, the mock server is started
//! against the registered set, the caller exercises its consumer code, and
//! verification reports whether everything was matched. The contract is
//! persisted only when fully matched; cleanup runs exactly once on every
//! exit path, including persistence failure.

use crate::config::MockServerConfig;
use crate::driver::InteractionDriver;
use crate::engine::EngineClient;
use crate::error::Error;
use crate::mock_server::{EngineMockServer, MockServer};
use crate::model::Interaction;
use std::sync::Arc;
use tracing::{debug, warn};

/// Orchestrates registration, mock serving, verification, persistence, and
/// cleanup for one interaction set.
pub struct InteractionRegistry<C: EngineClient, S: MockServer> {
    driver: InteractionDriver<C>,
    mock_server: S,
}

impl<C: EngineClient> InteractionRegistry<C, EngineMockServer<C>> {
    /// Set up a registry against the engine: forward the log-level override
    /// if one was configured, open the contract context, and pin the
    /// specification version.
    pub fn from_engine(client: Arc<C>, config: MockServerConfig) -> Result<Self, Error> {
        if let Some(level) = config.log_level_ref() {
            client.init_logging(level);
        }
        let pact = client.new_pact(config.consumer_ref(), config.provider_ref())?;
        client.with_specification(pact, config.specification_ref())?;

        let driver = InteractionDriver::new(Arc::clone(&client), pact);
        let mock_server = EngineMockServer::new(client, pact, config);
        Ok(InteractionRegistry::new(driver, mock_server))
    }
}

impl<C: EngineClient, S: MockServer> InteractionRegistry<C, S> {
    pub fn new(driver: InteractionDriver<C>, mock_server: S) -> Self {
        InteractionRegistry {
            driver,
            mock_server,
        }
    }

    /// Register an interaction and make sure the mock server is serving the
    /// registered set.
    pub async fn register(&mut self, interaction: &Interaction) -> Result<(), Error> {
        self.driver.register(interaction)?;
        self.mock_server.start().await?;
        Ok(())
    }

    /// Base URL of the running mock server, for exercising the consumer.
    pub fn base_url(&self) -> Option<String> {
        self.mock_server.base_url()
    }

    /// Check whether every registered interaction was matched; persist the
    /// contract iff so. Unmatched interactions are a normal outcome, not an
    /// error. Cleanup runs whether matching succeeded, failed, or persistence
    /// raised.
    pub fn verify_interactions(&mut self) -> Result<bool, Error> {
        let matched = self.mock_server.is_matched();

        let persisted = if matched {
            debug!("all interactions matched; persisting contract");
            self.mock_server.write_pact()
        } else {
            warn!("interactions not all matched; contract not persisted");
            Ok(())
        };

        // Cleanup precedes error propagation; the mock server's drop backstop
        // covers panic unwinds.
        self.mock_server.clean_up();
        persisted?;
        Ok(matched)
    }
}
