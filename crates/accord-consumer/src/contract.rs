//! Wire-format fragments for the persisted contract document.
//!
//! Matching rules and generators are keyed by json path and merged into the
//! contract alongside the concrete request/response. These encodings are the
//! portable surface other tooling consumes; the shapes here follow the
//! version 4 contract specification.

use crate::combinator::{GeneratorEntry, RuleEntry};
use crate::generator::Generator;
use serde_json::{json, Map, Value};

/// Build the matching-rules fragment: one object per path, rules that landed
/// on the same path merged into a single `matchers` array combined with AND.
pub fn rules_document(entries: &[RuleEntry]) -> Value {
    let mut document = Map::new();
    for entry in entries {
        let slot = document
            .entry(entry.path.clone())
            .or_insert_with(|| json!({"matchers": [], "combine": "AND"}));
        if let Some(matchers) = slot["matchers"].as_array_mut() {
            matchers.push(entry.rule.to_json());
        }
    }
    Value::Object(document)
}

/// Build the generators fragment, keyed by json path.
pub fn generators_document(entries: &[GeneratorEntry]) -> Value {
    let mut document = Map::new();
    for entry in entries {
        document.insert(entry.path.clone(), generator_to_json(&entry.generator));
    }
    Value::Object(document)
}

/// The `{ "type": <kind>, ...parameters }` object for one generator.
pub fn generator_to_json(generator: &Generator) -> Value {
    let mut entry = Map::new();
    entry.insert("type".to_string(), Value::from(generator.kind()));
    entry.extend(generator.parameters());
    Value::Object(entry)
}
