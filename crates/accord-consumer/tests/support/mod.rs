//! A document-building engine fake for end-to-end tests.
//!
//! Plays the external engine's role faithfully enough to test the whole
//! consumer flow: primitive registration calls accumulate into interaction
//! records, and `write_pact_file` assembles and writes the contract document
//! the way the engine would.

use accord_consumer::engine::{
    EngineClient, InteractionHandle, InteractionPart, PactHandle, SpecificationVersion,
};
use accord_consumer::error::{ConnectionError, PersistenceError, RegistrationError};
use serde_json::{json, Map, Value};
use std::path::Path;
use std::sync::Mutex;

pub const SERVER_PORT: u16 = 8155;

/// Route library tracing to test output; honors `RUST_LOG`.
pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[derive(Default)]
struct InteractionRecord {
    description: String,
    provider_states: Vec<(String, Vec<(String, String)>)>,
    method: String,
    path: String,
    query: Vec<(String, Vec<String>)>,
    request_headers: Vec<(String, Vec<String>)>,
    response_headers: Vec<(String, Vec<String>)>,
    request_body: Option<Value>,
    response_body: Option<Value>,
    status: u16,
    request_rules: Option<Value>,
    response_rules: Option<Value>,
    request_generators: Option<Value>,
    response_generators: Option<Value>,
}

#[derive(Default)]
struct EngineState {
    consumer: String,
    provider: String,
    specification: String,
    interactions: Vec<InteractionRecord>,
    server_live: bool,
    cleanups: u32,
    log_level: Option<String>,
}

/// Scripted fake of the external engine.
pub struct DocumentEngine {
    state: Mutex<EngineState>,
    matched: bool,
}

impl DocumentEngine {
    pub fn new() -> Self {
        DocumentEngine {
            state: Mutex::new(EngineState::default()),
            matched: true,
        }
    }

    pub fn unmatched() -> Self {
        DocumentEngine {
            state: Mutex::new(EngineState::default()),
            matched: false,
        }
    }

    pub fn cleanup_count(&self) -> u32 {
        self.state.lock().unwrap().cleanups
    }

    pub fn log_level(&self) -> Option<String> {
        self.state.lock().unwrap().log_level.clone()
    }

    fn document(&self) -> Value {
        let state = self.state.lock().unwrap();
        let interactions: Vec<Value> = state
            .interactions
            .iter()
            .map(|interaction| {
                let mut request = Map::new();
                request.insert("method".to_string(), json!(interaction.method));
                request.insert("path".to_string(), json!(interaction.path));
                if !interaction.query.is_empty() {
                    request.insert("query".to_string(), multimap(&interaction.query));
                }
                if !interaction.request_headers.is_empty() {
                    request.insert("headers".to_string(), multimap(&interaction.request_headers));
                }
                if let Some(body) = &interaction.request_body {
                    request.insert("body".to_string(), body.clone());
                }
                if let Some(rules) = &interaction.request_rules {
                    request.insert("matchingRules".to_string(), rules.clone());
                }
                if let Some(generators) = &interaction.request_generators {
                    request.insert("generators".to_string(), generators.clone());
                }

                let mut response = Map::new();
                response.insert("status".to_string(), json!(interaction.status));
                if !interaction.response_headers.is_empty() {
                    response.insert(
                        "headers".to_string(),
                        multimap(&interaction.response_headers),
                    );
                }
                if let Some(body) = &interaction.response_body {
                    response.insert("body".to_string(), body.clone());
                }
                if let Some(rules) = &interaction.response_rules {
                    response.insert("matchingRules".to_string(), rules.clone());
                }
                if let Some(generators) = &interaction.response_generators {
                    response.insert("generators".to_string(), generators.clone());
                }

                let provider_states: Vec<Value> = interaction
                    .provider_states
                    .iter()
                    .map(|(name, params)| {
                        if params.is_empty() {
                            json!({"name": name})
                        } else {
                            let params: Map<String, Value> = params
                                .iter()
                                .map(|(k, v)| (k.clone(), json!(v)))
                                .collect();
                            json!({"name": name, "params": params})
                        }
                    })
                    .collect();

                let mut entry = Map::new();
                entry.insert("description".to_string(), json!(interaction.description));
                if !provider_states.is_empty() {
                    entry.insert("providerStates".to_string(), Value::Array(provider_states));
                }
                entry.insert("request".to_string(), Value::Object(request));
                entry.insert("response".to_string(), Value::Object(response));
                Value::Object(entry)
            })
            .collect();

        json!({
            "consumer": {"name": state.consumer},
            "provider": {"name": state.provider},
            "interactions": interactions,
            "metadata": {"pactSpecification": {"version": state.specification}},
        })
    }
}

fn multimap(entries: &[(String, Vec<String>)]) -> Value {
    let map: Map<String, Value> = entries
        .iter()
        .map(|(key, values)| {
            let value = if values.len() == 1 {
                json!(values[0])
            } else {
                json!(values)
            };
            (key.clone(), value)
        })
        .collect();
    Value::Object(map)
}

impl EngineClient for DocumentEngine {
    fn init_logging(&self, level: &str) {
        self.state.lock().unwrap().log_level = Some(level.to_string());
    }

    fn new_pact(&self, consumer: &str, provider: &str) -> Result<PactHandle, RegistrationError> {
        let mut state = self.state.lock().unwrap();
        state.consumer = consumer.to_string();
        state.provider = provider.to_string();
        Ok(PactHandle(1))
    }

    fn with_specification(
        &self,
        _pact: PactHandle,
        version: SpecificationVersion,
    ) -> Result<(), RegistrationError> {
        self.state.lock().unwrap().specification = version.as_str().to_string();
        Ok(())
    }

    fn new_interaction(
        &self,
        _pact: PactHandle,
        description: &str,
    ) -> Result<InteractionHandle, RegistrationError> {
        let mut state = self.state.lock().unwrap();
        state.interactions.push(InteractionRecord {
            description: description.to_string(),
            ..Default::default()
        });
        Ok(InteractionHandle((state.interactions.len() - 1) as u32))
    }

    fn upon_receiving(
        &self,
        interaction: InteractionHandle,
        description: &str,
    ) -> Result<(), RegistrationError> {
        with_record(&self.state, interaction, |record| {
            record.description = description.to_string();
        })
    }

    fn given(&self, interaction: InteractionHandle, state: &str) -> Result<(), RegistrationError> {
        with_record(&self.state, interaction, |record| {
            record.provider_states.push((state.to_string(), Vec::new()));
        })
    }

    fn given_with_param(
        &self,
        interaction: InteractionHandle,
        state: &str,
        key: &str,
        value: &str,
    ) -> Result<(), RegistrationError> {
        with_record(&self.state, interaction, |record| {
            if let Some((_, params)) = record
                .provider_states
                .iter_mut()
                .rfind(|(name, _)| name == state)
            {
                params.push((key.to_string(), value.to_string()));
            }
        })
    }

    fn with_request(
        &self,
        interaction: InteractionHandle,
        method: &str,
        path: &str,
    ) -> Result<(), RegistrationError> {
        with_record(&self.state, interaction, |record| {
            record.method = method.to_string();
            record.path = path.to_string();
        })
    }

    fn with_query_parameter(
        &self,
        interaction: InteractionHandle,
        key: &str,
        _index: usize,
        value: &str,
    ) -> Result<(), RegistrationError> {
        with_record(&self.state, interaction, |record| {
            if let Some((_, values)) = record.query.iter_mut().find(|(k, _)| k == key) {
                values.push(value.to_string());
            } else {
                record.query.push((key.to_string(), vec![value.to_string()]));
            }
        })
    }

    fn with_header(
        &self,
        interaction: InteractionHandle,
        part: InteractionPart,
        name: &str,
        _index: usize,
        value: &str,
    ) -> Result<(), RegistrationError> {
        with_record(&self.state, interaction, |record| {
            let headers = match part {
                InteractionPart::Request => &mut record.request_headers,
                InteractionPart::Response => &mut record.response_headers,
            };
            if let Some((_, values)) = headers.iter_mut().find(|(n, _)| n == name) {
                values.push(value.to_string());
            } else {
                headers.push((name.to_string(), vec![value.to_string()]));
            }
        })
    }

    fn with_body(
        &self,
        interaction: InteractionHandle,
        part: InteractionPart,
        _content_type: &str,
        body: &str,
    ) -> Result<(), RegistrationError> {
        let parsed: Value =
            serde_json::from_str(body).map_err(|e| RegistrationError::CallRejected {
                call: "with_body".to_string(),
                reason: e.to_string(),
            })?;
        with_record(&self.state, interaction, |record| match part {
            InteractionPart::Request => record.request_body = Some(parsed.clone()),
            InteractionPart::Response => record.response_body = Some(parsed.clone()),
        })
    }

    fn with_matching_rules(
        &self,
        interaction: InteractionHandle,
        part: InteractionPart,
        rules: &Value,
    ) -> Result<(), RegistrationError> {
        with_record(&self.state, interaction, |record| match part {
            InteractionPart::Request => record.request_rules = Some(rules.clone()),
            InteractionPart::Response => record.response_rules = Some(rules.clone()),
        })
    }

    fn with_generators(
        &self,
        interaction: InteractionHandle,
        part: InteractionPart,
        generators: &Value,
    ) -> Result<(), RegistrationError> {
        with_record(&self.state, interaction, |record| match part {
            InteractionPart::Request => record.request_generators = Some(generators.clone()),
            InteractionPart::Response => record.response_generators = Some(generators.clone()),
        })
    }

    fn with_status(
        &self,
        interaction: InteractionHandle,
        status: u16,
    ) -> Result<(), RegistrationError> {
        with_record(&self.state, interaction, |record| {
            record.status = status;
        })
    }

    fn start_mock_server(&self, _pact: PactHandle, _addr: &str) -> Result<u16, ConnectionError> {
        self.state.lock().unwrap().server_live = true;
        Ok(SERVER_PORT)
    }

    fn mock_server_ready(&self, _port: u16) -> bool {
        true
    }

    fn mock_server_matched(&self, _port: u16) -> bool {
        self.matched
    }

    fn write_pact_file(&self, _pact: PactHandle, dir: &Path) -> Result<(), PersistenceError> {
        let document = self.document();
        let state = self.state.lock().unwrap();
        let file = dir.join(format!("{}-{}.json", state.consumer, state.provider));
        let rendered =
            serde_json::to_string_pretty(&document).map_err(|e| PersistenceError::WriteFailed {
                path: file.display().to_string(),
                reason: e.to_string(),
            })?;
        std::fs::write(&file, rendered).map_err(|e| PersistenceError::WriteFailed {
            path: file.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn cleanup_mock_server(&self, _port: u16) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.server_live {
            state.server_live = false;
            state.cleanups += 1;
            true
        } else {
            false
        }
    }
}

fn with_record(
    state: &Mutex<EngineState>,
    interaction: InteractionHandle,
    apply: impl FnOnce(&mut InteractionRecord),
) -> Result<(), RegistrationError> {
    let mut state = state.lock().unwrap();
    match state.interactions.get_mut(interaction.0 as usize) {
        Some(record) => {
            apply(record);
            Ok(())
        }
        None => Err(RegistrationError::UnknownInteraction(interaction.0)),
    }
}
