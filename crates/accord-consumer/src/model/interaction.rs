//! One request/response exchange with its provider preconditions.

use super::request::ConsumerRequest;
use super::response::ProviderResponse;

/// A named provider precondition with substitution parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderState {
    name: String,
    params: Vec<(String, String)>,
}

impl ProviderState {
    pub fn new(name: &str) -> Self {
        ProviderState {
            name: name.to_string(),
            params: Vec::new(),
        }
    }

    pub fn with_params<K, V, I>(name: &str, params: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        ProviderState {
            name: name.to_string(),
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameters in insertion order.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// The immutable description of one exchange. Built by the consumer test and
/// consumed exactly once by the registration driver.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    description: String,
    provider_states: Vec<ProviderState>,
    request: ConsumerRequest,
    response: ProviderResponse,
}

impl Interaction {
    pub fn new(description: &str, request: ConsumerRequest, response: ProviderResponse) -> Self {
        Interaction {
            description: description.to_string(),
            provider_states: Vec::new(),
            request,
            response,
        }
    }

    /// Add a precondition by name.
    pub fn given(mut self, state: &str) -> Self {
        self.provider_states.push(ProviderState::new(state));
        self
    }

    /// Add a precondition with parameters.
    pub fn given_with_params<K, V, I>(mut self, state: &str, params: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.provider_states
            .push(ProviderState::with_params(state, params));
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn provider_states(&self) -> &[ProviderState] {
        &self.provider_states
    }

    pub fn request(&self) -> &ConsumerRequest {
        &self.request
    }

    pub fn response(&self) -> &ProviderResponse {
        &self.response
    }
}
