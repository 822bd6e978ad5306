//! The interaction registration driver.
//!
//! Registration is a strict one-shot sequence: allocate a handle and attach
//! the description, declare provider states, declare the request, declare the
//! response. Each stage is its own type and consumes itself to produce the
//! next, so an out-of-order primitive call cannot be written, let alone
//! issued. Any step can still fail, since the engine may refuse a call, and
//! the whole sequence is abandoned when one does.

use crate::combinator::{self, Flattened, GeneratorEntry, RuleEntry};
use crate::contract;
use crate::engine::{EngineClient, InteractionHandle, InteractionPart, PactHandle};
use crate::error::{Error, RegistrationError};
use crate::model::{ConsumerRequest, Interaction, ProviderResponse, ProviderState};
use crate::term::Term;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Drives the registration of interactions against an open contract context.
pub struct InteractionDriver<C: EngineClient> {
    client: Arc<C>,
    pact: PactHandle,
}

impl<C: EngineClient> InteractionDriver<C> {
    pub fn new(client: Arc<C>, pact: PactHandle) -> Self {
        InteractionDriver { client, pact }
    }

    /// Run the full registration sequence for one interaction.
    pub fn register(&self, interaction: &Interaction) -> Result<InteractionHandle, Error> {
        debug!(description = interaction.description(), "registering interaction");
        let registered = self
            .describe(interaction.description())?
            .declare_states(interaction.provider_states())?
            .declare_request(interaction.request())?
            .declare_response(interaction.response())?;
        info!(description = interaction.description(), "interaction registered");
        Ok(registered.finish())
    }

    /// `Created -> DescriptionSet`: allocate the handle, attach the
    /// description.
    fn describe(&self, description: &str) -> Result<DescriptionSet<'_, C>, RegistrationError> {
        let handle = self.client.new_interaction(self.pact, description)?;
        self.client.upon_receiving(handle, description)?;
        Ok(DescriptionSet {
            client: &self.client,
            handle,
        })
    }
}

/// Stage after the interaction handle exists and carries its description.
pub struct DescriptionSet<'d, C: EngineClient> {
    client: &'d Arc<C>,
    handle: InteractionHandle,
}

impl<'d, C: EngineClient> DescriptionSet<'d, C> {
    /// `DescriptionSet -> StatesDeclared`: declare each precondition by name,
    /// then its parameters in insertion order. No states is a no-op.
    pub fn declare_states(
        self,
        states: &[ProviderState],
    ) -> Result<StatesDeclared<'d, C>, RegistrationError> {
        for state in states {
            self.client.given(self.handle, state.name())?;
            for (key, value) in state.params() {
                self.client
                    .given_with_param(self.handle, state.name(), key, value)?;
            }
        }
        Ok(StatesDeclared {
            client: self.client,
            handle: self.handle,
        })
    }
}

/// Stage after provider states are declared.
pub struct StatesDeclared<'d, C: EngineClient> {
    client: &'d Arc<C>,
    handle: InteractionHandle,
}

impl<'d, C: EngineClient> StatesDeclared<'d, C> {
    /// `StatesDeclared -> RequestDeclared`: method and path first, then query
    /// parameters, then headers, then the flattened body.
    pub fn declare_request(
        self,
        request: &ConsumerRequest,
    ) -> Result<RequestDeclared<'d, C>, Error> {
        let mut rules = Vec::new();
        let mut generators = Vec::new();

        let path = flatten_into(request.path_ref(), "$.path", &mut rules, &mut generators)?;
        self.client
            .with_request(self.handle, request.method_ref(), &scalar_string(&path))?;

        for (key, values) in request.query_ref() {
            let base = combinator::child_path("$.query", key);
            for (index, value) in values.iter().enumerate() {
                let value = flatten_into(
                    value,
                    &format!("{base}[{index}]"),
                    &mut rules,
                    &mut generators,
                )?;
                self.client
                    .with_query_parameter(self.handle, key, index, &scalar_string(&value))?;
            }
        }

        declare_headers(
            self.client,
            self.handle,
            InteractionPart::Request,
            request.headers_ref(),
            &mut rules,
            &mut generators,
        )?;

        if let Some(body) = request.body_ref() {
            let body = flatten_into(body, "$.body", &mut rules, &mut generators)?;
            self.client.with_body(
                self.handle,
                InteractionPart::Request,
                request.content_type_ref(),
                &body_string(&body)?,
            )?;
        }

        attach_fragments(
            self.client,
            self.handle,
            InteractionPart::Request,
            &rules,
            &generators,
        )?;

        Ok(RequestDeclared {
            client: self.client,
            handle: self.handle,
        })
    }
}

/// Stage after the request side is fully declared.
pub struct RequestDeclared<'d, C: EngineClient> {
    client: &'d Arc<C>,
    handle: InteractionHandle,
}

impl<'d, C: EngineClient> RequestDeclared<'d, C> {
    /// `RequestDeclared -> ResponseDeclared`: status first, then headers,
    /// then the flattened body, symmetric to the request side.
    pub fn declare_response(
        self,
        response: &ProviderResponse,
    ) -> Result<ResponseDeclared, Error> {
        let mut rules = Vec::new();
        let mut generators = Vec::new();

        let status = flatten_into(response.status_ref(), "$.status", &mut rules, &mut generators)?;
        let status = status.as_u64().and_then(|s| u16::try_from(s).ok()).ok_or(
            RegistrationError::CallRejected {
                call: "with_status".to_string(),
                reason: format!("status did not resolve to an HTTP code: {status}"),
            },
        )?;
        self.client.with_status(self.handle, status)?;

        declare_headers(
            self.client,
            self.handle,
            InteractionPart::Response,
            response.headers_ref(),
            &mut rules,
            &mut generators,
        )?;

        if let Some(body) = response.body_ref() {
            let body = flatten_into(body, "$.body", &mut rules, &mut generators)?;
            self.client.with_body(
                self.handle,
                InteractionPart::Response,
                response.content_type_ref(),
                &body_string(&body)?,
            )?;
        }

        attach_fragments(
            self.client,
            self.handle,
            InteractionPart::Response,
            &rules,
            &generators,
        )?;

        Ok(ResponseDeclared {
            handle: self.handle,
        })
    }
}

/// Terminal stage: the interaction is fully described to the engine.
pub struct ResponseDeclared {
    handle: InteractionHandle,
}

impl ResponseDeclared {
    pub fn finish(self) -> InteractionHandle {
        self.handle
    }
}

fn flatten_into(
    term: &Term,
    root: &str,
    rules: &mut Vec<RuleEntry>,
    generators: &mut Vec<GeneratorEntry>,
) -> Result<Value, Error> {
    let Flattened {
        value,
        rules: mut part_rules,
        generators: mut part_generators,
    } = combinator::flatten(term, root)?;
    rules.append(&mut part_rules);
    generators.append(&mut part_generators);
    Ok(value)
}

fn declare_headers<C: EngineClient>(
    client: &Arc<C>,
    handle: InteractionHandle,
    part: InteractionPart,
    headers: &[(String, Vec<Term>)],
    rules: &mut Vec<RuleEntry>,
    generators: &mut Vec<GeneratorEntry>,
) -> Result<(), Error> {
    for (name, values) in headers {
        let base = combinator::child_path("$.headers", name);
        for (index, value) in values.iter().enumerate() {
            let path = if values.len() == 1 {
                base.clone()
            } else {
                format!("{base}[{index}]")
            };
            let value = flatten_into(value, &path, rules, generators)?;
            client.with_header(handle, part, name, index, &scalar_string(&value))?;
        }
    }
    Ok(())
}

fn attach_fragments<C: EngineClient>(
    client: &Arc<C>,
    handle: InteractionHandle,
    part: InteractionPart,
    rules: &[RuleEntry],
    generators: &[GeneratorEntry],
) -> Result<(), RegistrationError> {
    if !rules.is_empty() {
        client.with_matching_rules(handle, part, &contract::rules_document(rules))?;
    }
    if !generators.is_empty() {
        client.with_generators(handle, part, &contract::generators_document(generators))?;
    }
    Ok(())
}

/// Render a flattened scalar the way it appears on the wire: strings bare,
/// everything else as JSON.
fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn body_string(value: &Value) -> Result<String, RegistrationError> {
    serde_json::to_string(value).map_err(|e| RegistrationError::CallRejected {
        call: "with_body".to_string(),
        reason: e.to_string(),
    })
}
