//! The tagged matching-rule taxonomy.
//!
//! Each variant carries its rule-specific attributes; the tag plus attributes
//! are exactly what lands in the `matchers` array of the persisted contract
//! fragment. Keeping the taxonomy closed keeps serialization exhaustive.

use super::status::HttpStatusClass;
use serde_json::{Map, Value};

/// One pre-flattened variant of an `arrayContains` rule.
///
/// Variants are flattened at construction time: `value` is the concrete
/// element, `rules` and `generators` are contract fragments rooted at `$`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayVariant {
    pub index: usize,
    pub value: Value,
    pub rules: Value,
    pub generators: Value,
}

/// A typed rule describing acceptable values for a location in the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchingRule {
    /// Value must have the same type as the example.
    Type,
    /// Array of at least `min` elements, each matching the example's shape.
    MinType { min: usize },
    /// Array of at most `max` elements, each matching the example's shape.
    MaxType { max: usize },
    /// Array bounded on both sides.
    MinMaxType { min: usize, max: usize },
    /// Value must match the pattern.
    Regex { regex: String },
    /// Status must fall within the named class.
    StatusCode { status: HttpStatusClass },
    /// Value must equal the example exactly.
    Equality,
    /// String value must contain the given substring.
    Include { value: String },
    /// Content-type of the value must match.
    ContentType { value: String },
    /// Date conforming to the given calendar-format pattern.
    Date { format: String },
    /// Time conforming to the given calendar-format pattern.
    Time { format: String },
    /// Date-time conforming to the given calendar-format pattern.
    DateTime { format: String },
    /// Value must be a boolean.
    Boolean,
    /// Value must be an integer.
    Integer,
    /// Value must be a decimal number.
    Decimal,
    /// Value must be numeric.
    Number,
    /// Value must be null.
    Null,
    /// Value must be present and non-empty.
    NotEmpty,
    /// Each value in the mapping matches the example's shape; keys are free.
    Values,
    /// Value must be a valid semantic version.
    Semver,
    /// Array must contain each variant, anywhere, in any order.
    ArrayContains { variants: Vec<ArrayVariant> },
    /// Every key of the mapping must satisfy the given rules.
    EachKey { rules: Vec<MatchingRule> },
    /// Every value of the mapping must satisfy the given rules.
    EachValue { rules: Vec<MatchingRule> },
}

impl MatchingRule {
    /// The `match` tag recorded in the contract fragment.
    pub fn type_tag(&self) -> &'static str {
        match self {
            MatchingRule::Type
            | MatchingRule::MinType { .. }
            | MatchingRule::MaxType { .. }
            | MatchingRule::MinMaxType { .. } => "type",
            MatchingRule::Regex { .. } => "regex",
            MatchingRule::StatusCode { .. } => "statusCode",
            MatchingRule::Equality => "equality",
            MatchingRule::Include { .. } => "include",
            MatchingRule::ContentType { .. } => "contentType",
            MatchingRule::Date { .. } => "date",
            MatchingRule::Time { .. } => "time",
            MatchingRule::DateTime { .. } => "datetime",
            MatchingRule::Boolean => "boolean",
            MatchingRule::Integer => "integer",
            MatchingRule::Decimal => "decimal",
            MatchingRule::Number => "number",
            MatchingRule::Null => "null",
            MatchingRule::NotEmpty => "notEmpty",
            MatchingRule::Values => "values",
            MatchingRule::Semver => "semver",
            MatchingRule::ArrayContains { .. } => "arrayContains",
            MatchingRule::EachKey { .. } => "eachKey",
            MatchingRule::EachValue { .. } => "eachValue",
        }
    }

    /// Rule-specific attributes, serialized alongside the tag.
    pub fn attributes(&self) -> Map<String, Value> {
        let mut attributes = Map::new();
        match self {
            MatchingRule::MinType { min } => {
                attributes.insert("min".to_string(), Value::from(*min));
            }
            MatchingRule::MaxType { max } => {
                attributes.insert("max".to_string(), Value::from(*max));
            }
            MatchingRule::MinMaxType { min, max } => {
                attributes.insert("min".to_string(), Value::from(*min));
                attributes.insert("max".to_string(), Value::from(*max));
            }
            MatchingRule::Regex { regex } => {
                attributes.insert("regex".to_string(), Value::from(regex.clone()));
            }
            MatchingRule::StatusCode { status } => {
                attributes.insert("status".to_string(), Value::from(status.as_str()));
            }
            MatchingRule::Include { value } | MatchingRule::ContentType { value } => {
                attributes.insert("value".to_string(), Value::from(value.clone()));
            }
            MatchingRule::Date { format }
            | MatchingRule::Time { format }
            | MatchingRule::DateTime { format } => {
                attributes.insert("format".to_string(), Value::from(format.clone()));
            }
            MatchingRule::ArrayContains { variants } => {
                let variants: Vec<Value> = variants
                    .iter()
                    .map(|variant| {
                        let mut entry = Map::new();
                        entry.insert("index".to_string(), Value::from(variant.index));
                        entry.insert("rules".to_string(), variant.rules.clone());
                        entry.insert("generators".to_string(), variant.generators.clone());
                        Value::Object(entry)
                    })
                    .collect();
                attributes.insert("variants".to_string(), Value::Array(variants));
            }
            MatchingRule::EachKey { rules } | MatchingRule::EachValue { rules } => {
                let rules: Vec<Value> = rules.iter().map(MatchingRule::to_json).collect();
                attributes.insert("rules".to_string(), Value::Array(rules));
            }
            _ => {}
        }
        attributes
    }

    /// The `{ "match": <tag>, ...attributes }` object for the contract.
    pub fn to_json(&self) -> Value {
        let mut entry = Map::new();
        entry.insert("match".to_string(), Value::from(self.type_tag()));
        entry.extend(self.attributes());
        Value::Object(entry)
    }

    /// How many copies of the element example the concrete body carries.
    pub fn concrete_copies(&self) -> Option<usize> {
        match self {
            MatchingRule::MinType { min } | MatchingRule::MinMaxType { min, .. } => Some(*min),
            MatchingRule::MaxType { .. } => Some(1),
            _ => None,
        }
    }
}
