//! Matchers: typed rules with examples and optional generators.
//!
//! A matcher pairs a [`MatchingRule`] with the concrete example the protocol
//! serves while the rule stays abstract in the contract. When no explicit
//! example is supplied, a [`Generator`] is attached so the matcher can still
//! produce one; a matcher with neither is rejected at construction.
//!
//! # Module Structure
//!
//! - `rule` - The closed rule taxonomy and its contract serialization
//! - `status` - HTTP status classes for status-code rules

mod rule;
mod status;

pub use rule::{ArrayVariant, MatchingRule};
pub use status::HttpStatusClass;

use crate::combinator;
use crate::contract;
use crate::error::ConstructionError;
use crate::generator::{to_chrono_format, Generator};
use crate::term::Term;
use serde_json::Value;

// Canonical patterns for the convenience matchers. Kept compatible with the
// regex dialect the engine evaluates (no lookaround).
const ISO8601_DATE: &str = r"^\d{4}-[01]\d-[0-3]\d$";
const ISO8601_TIME: &str = r"^T[0-2]\d:[0-5]\d(:[0-5]\d(\.\d+)?)?(Z|[+-][0-2]\d:[0-5]\d)?$";
const ISO8601_DATETIME: &str =
    r"^\d{4}-[01]\d-[0-3]\dT[0-2]\d:[0-5]\d:[0-5]\d(Z|[+-][0-2]\d:[0-5]\d)$";
const ISO8601_DATETIME_MILLIS: &str =
    r"^\d{4}-[01]\d-[0-3]\dT[0-2]\d:[0-5]\d:[0-5]\d\.\d{3}(Z|[+-][0-2]\d:[0-5]\d)$";
const RFC3339_TIMESTAMP: &str = r"^(Mon|Tue|Wed|Thu|Fri|Sat|Sun),\s\d{2}\s(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s\d{4}\s\d{2}:\d{2}:\d{2}\s[+-]\d{4}$";
const UUID_PATTERN: &str = r"^[0-9a-fA-F]{8}(-[0-9a-fA-F]{4}){3}-[0-9a-fA-F]{12}$";
const HEX_PATTERN: &str = r"^[0-9a-fA-F]+$";
const IPV4_PATTERN: &str = r"^(\d{1,3}\.){3}\d{1,3}$";
const IPV6_PATTERN: &str =
    r"^([0-9a-fA-F]{0,4}:){1,7}([0-9a-fA-F]{0,4}|(\d{1,3}\.){3}\d{1,3})$";
const EMAIL_PATTERN: &str = "^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(\\.[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";

/// An immutable matching rule with its example and optional generator.
///
/// Equality is structural; two matchers built the same way compare equal.
#[derive(Debug, Clone, PartialEq)]
pub struct Matcher {
    rule: MatchingRule,
    example: Option<Term>,
    generator: Option<Generator>,
}

impl Matcher {
    fn with_example(rule: MatchingRule, example: impl Into<Term>) -> Self {
        Matcher {
            rule,
            example: Some(example.into()),
            generator: None,
        }
    }

    fn with_generator(rule: MatchingRule, generator: Generator) -> Self {
        Matcher {
            rule,
            example: None,
            generator: Some(generator),
        }
    }

    /// The rule this matcher applies.
    pub fn rule(&self) -> &MatchingRule {
        &self.rule
    }

    /// The contract type tag of the rule.
    pub fn type_tag(&self) -> &'static str {
        self.rule.type_tag()
    }

    /// The explicit example, if one was supplied.
    pub fn example(&self) -> Option<&Term> {
        self.example.as_ref()
    }

    /// The attached generator, if example synthesis is needed.
    pub fn generator(&self) -> Option<&Generator> {
        self.generator.as_ref()
    }

    // ========================================================================
    // Type-shape matchers
    // ========================================================================

    /// Any value with the same type as `example`.
    pub fn like(example: impl Into<Term>) -> Self {
        Matcher::with_example(MatchingRule::Type, example)
    }

    /// Array of one or more elements matching `example`'s shape; the concrete
    /// body carries one copy.
    pub fn each_like(example: impl Into<Term>) -> Self {
        Matcher::with_example(MatchingRule::MinType { min: 1 }, example)
    }

    /// Array of at least `min` elements; the concrete body carries `min`
    /// copies.
    pub fn at_least_like(example: impl Into<Term>, min: usize) -> Self {
        Matcher::with_example(MatchingRule::MinType { min }, example)
    }

    /// Array of at most `max` elements; the concrete body carries one copy.
    pub fn at_most_like(example: impl Into<Term>, max: usize) -> Self {
        Matcher::with_example(MatchingRule::MaxType { max }, example)
    }

    /// Array bounded on both sides; the concrete body carries `min` copies.
    pub fn constrained_array_like(
        example: impl Into<Term>,
        min: usize,
        max: usize,
    ) -> Result<Self, ConstructionError> {
        if min > max {
            return Err(ConstructionError::InvalidBounds { min, max });
        }
        Ok(Matcher::with_example(
            MatchingRule::MinMaxType { min, max },
            example,
        ))
    }

    /// Boolean by type; serves `true`.
    pub fn like_boolean() -> Self {
        Matcher::like(true)
    }

    /// Integer by type; serves `13`.
    pub fn like_integer() -> Self {
        Matcher::like(13i64)
    }

    /// Decimal by type; serves `13.01`.
    pub fn like_decimal() -> Self {
        Matcher::like(13.01)
    }

    /// String by type.
    pub fn like_string(example: &str) -> Self {
        Matcher::like(example)
    }

    // ========================================================================
    // Pattern matchers
    // ========================================================================

    /// Value must match `pattern`; `example` is served verbatim.
    ///
    /// The pattern is compile-checked here so a bad pattern fails the build,
    /// not the replay.
    pub fn regex(example: impl Into<Term>, pattern: &str) -> Result<Self, ConstructionError> {
        validate_pattern(pattern)?;
        Ok(Matcher::with_example(
            MatchingRule::Regex {
                regex: pattern.to_string(),
            },
            example,
        ))
    }

    /// Value must match `pattern`; the example is synthesized from it.
    pub fn regex_generated(pattern: &str) -> Result<Self, ConstructionError> {
        validate_pattern(pattern)?;
        Ok(Matcher::with_generator(
            MatchingRule::Regex {
                regex: pattern.to_string(),
            },
            Generator::Regex {
                regex: pattern.to_string(),
            },
        ))
    }

    /// ISO 8601 date; serves `2013-02-01` by default.
    pub fn date_iso8601() -> Self {
        Matcher::canonical_regex(ISO8601_DATE, "2013-02-01")
    }

    /// ISO 8601 time; serves `T22:44:30.652Z` by default.
    pub fn time_iso8601() -> Self {
        Matcher::canonical_regex(ISO8601_TIME, "T22:44:30.652Z")
    }

    /// ISO 8601 date-time; serves `2015-08-06T16:53:10+01:00` by default.
    pub fn datetime_iso8601() -> Self {
        Matcher::canonical_regex(ISO8601_DATETIME, "2015-08-06T16:53:10+01:00")
    }

    /// ISO 8601 date-time with milliseconds.
    pub fn datetime_with_millis_iso8601() -> Self {
        Matcher::canonical_regex(ISO8601_DATETIME_MILLIS, "2015-08-06T16:53:10.123+01:00")
    }

    /// RFC 3339 timestamp; serves `Mon, 31 Oct 2016 15:21:41 -0400`.
    pub fn timestamp_rfc3339() -> Self {
        Matcher::canonical_regex(RFC3339_TIMESTAMP, "Mon, 31 Oct 2016 15:21:41 -0400")
    }

    /// Version 4 UUID; a random one is generated when no example is given.
    pub fn uuid(example: Option<&str>) -> Self {
        match example {
            Some(example) => Matcher::canonical_regex(UUID_PATTERN, example),
            None => Matcher::with_generator(
                MatchingRule::Regex {
                    regex: UUID_PATTERN.to_string(),
                },
                Generator::Uuid { format: None },
            ),
        }
    }

    /// Hexadecimal string; a random one is generated when no example is given.
    pub fn hexadecimal(example: Option<&str>) -> Self {
        match example {
            Some(example) => Matcher::canonical_regex(HEX_PATTERN, example),
            None => Matcher::with_generator(
                MatchingRule::Regex {
                    regex: HEX_PATTERN.to_string(),
                },
                Generator::RandomHexadecimal { digits: 10 },
            ),
        }
    }

    /// IPv4 address; serves `127.0.0.13` by default.
    pub fn ipv4_address() -> Self {
        Matcher::canonical_regex(IPV4_PATTERN, "127.0.0.13")
    }

    /// IPv6 address; serves `::ffff:192.0.2.128` by default.
    pub fn ipv6_address() -> Self {
        Matcher::canonical_regex(IPV6_PATTERN, "::ffff:192.0.2.128")
    }

    /// Email address; serves `hello@pact.io` by default.
    pub fn email() -> Self {
        Matcher::canonical_regex(EMAIL_PATTERN, "hello@pact.io")
    }

    fn canonical_regex(pattern: &str, example: impl Into<Term>) -> Self {
        Matcher::with_example(
            MatchingRule::Regex {
                regex: pattern.to_string(),
            },
            example,
        )
    }

    // ========================================================================
    // Status matchers
    // ========================================================================

    /// Status within the named class. Without an explicit value, a random
    /// status bounded to the class range is generated.
    pub fn status_code(class: HttpStatusClass, value: Option<u16>) -> Self {
        match value {
            Some(value) => {
                Matcher::with_example(MatchingRule::StatusCode { status: class }, value)
            }
            None => {
                let (min, max) = class.bounds();
                Matcher::with_generator(
                    MatchingRule::StatusCode { status: class },
                    Generator::RandomInt {
                        min: min as i64,
                        max: max as i64,
                    },
                )
            }
        }
    }

    /// Like [`Matcher::status_code`], parsing the class from its contract
    /// tag; an unrecognized class fails construction.
    pub fn status_code_str(class: &str, value: Option<u16>) -> Result<Self, ConstructionError> {
        Ok(Matcher::status_code(class.parse()?, value))
    }

    // ========================================================================
    // Equality and content matchers
    // ========================================================================

    /// Value must equal the example exactly.
    pub fn equal(example: impl Into<Term>) -> Self {
        Matcher::with_example(MatchingRule::Equality, example)
    }

    /// String value must contain the given substring.
    pub fn includes(value: &str) -> Self {
        Matcher::with_example(
            MatchingRule::Include {
                value: value.to_string(),
            },
            value,
        )
    }

    /// Value's content type must match.
    pub fn content_type(value: &str) -> Self {
        Matcher::with_example(
            MatchingRule::ContentType {
                value: value.to_string(),
            },
            value,
        )
    }

    /// Value must be null.
    pub fn null_value() -> Self {
        Matcher::with_example(MatchingRule::Null, Term::null())
    }

    /// Value must be present and non-empty.
    pub fn not_empty(example: impl Into<Term>) -> Self {
        Matcher::with_example(MatchingRule::NotEmpty, example)
    }

    /// Each value of the mapping (or element of the sequence) matches the
    /// example's shape; keys are unconstrained.
    pub fn values(example: impl Into<Term>) -> Self {
        Matcher::with_example(MatchingRule::Values, example)
    }

    /// Value must be a valid semantic version; serves `1.0.0` by default.
    pub fn semver(example: Option<&str>) -> Self {
        Matcher::with_example(MatchingRule::Semver, example.unwrap_or("1.0.0"))
    }

    // ========================================================================
    // Primitive-type matchers
    // ========================================================================

    /// Value must be a boolean; a random one is generated without an example.
    pub fn boolean(value: Option<bool>) -> Self {
        match value {
            Some(value) => Matcher::with_example(MatchingRule::Boolean, value),
            None => Matcher::with_generator(MatchingRule::Boolean, Generator::RandomBoolean),
        }
    }

    /// Value must be an integer; a random 0..=10 is generated without an
    /// example.
    pub fn integer(value: Option<i64>) -> Self {
        match value {
            Some(value) => Matcher::with_example(MatchingRule::Integer, value),
            None => Matcher::with_generator(
                MatchingRule::Integer,
                Generator::RandomInt { min: 0, max: 10 },
            ),
        }
    }

    /// Value must be a decimal; a random one is generated without an example.
    pub fn decimal(value: Option<f64>) -> Self {
        match value {
            Some(value) => Matcher::with_example(MatchingRule::Decimal, value),
            None => Matcher::with_generator(
                MatchingRule::Decimal,
                Generator::RandomDecimal { digits: 10 },
            ),
        }
    }

    /// Value must be numeric.
    pub fn number(value: impl Into<Term>) -> Self {
        Matcher::with_example(MatchingRule::Number, value)
    }

    // ========================================================================
    // Calendar matchers
    // ========================================================================

    /// Date conforming to the calendar-format pattern. Without an example,
    /// one is generated from the pattern.
    pub fn date(format: &str, example: Option<&str>) -> Result<Self, ConstructionError> {
        validate_format(format)?;
        let rule = MatchingRule::Date {
            format: format.to_string(),
        };
        Ok(match example {
            Some(example) => Matcher::with_example(rule, example),
            None => Matcher::with_generator(
                rule,
                Generator::Date {
                    format: Some(format.to_string()),
                    expression: None,
                },
            ),
        })
    }

    /// Time conforming to the calendar-format pattern.
    pub fn time(format: &str, example: Option<&str>) -> Result<Self, ConstructionError> {
        validate_format(format)?;
        let rule = MatchingRule::Time {
            format: format.to_string(),
        };
        Ok(match example {
            Some(example) => Matcher::with_example(rule, example),
            None => Matcher::with_generator(
                rule,
                Generator::Time {
                    format: Some(format.to_string()),
                    expression: None,
                },
            ),
        })
    }

    /// Date-time conforming to the calendar-format pattern.
    pub fn datetime(format: &str, example: Option<&str>) -> Result<Self, ConstructionError> {
        validate_format(format)?;
        let rule = MatchingRule::DateTime {
            format: format.to_string(),
        };
        Ok(match example {
            Some(example) => Matcher::with_example(rule, example),
            None => Matcher::with_generator(
                rule,
                Generator::DateTime {
                    format: Some(format.to_string()),
                    expression: None,
                },
            ),
        })
    }

    // ========================================================================
    // Structural matchers over collections
    // ========================================================================

    /// Array must contain each variant, anywhere, in any order. Variants are
    /// flattened eagerly; nested matchers inside them are honored.
    pub fn array_containing(variants: Vec<Term>) -> Result<Self, crate::error::Error> {
        let mut flattened = Vec::with_capacity(variants.len());
        let mut concrete = Vec::with_capacity(variants.len());
        for (index, variant) in variants.iter().enumerate() {
            let part = combinator::flatten(variant, "$")?;
            concrete.push(part.value.clone());
            flattened.push(ArrayVariant {
                index,
                value: part.value,
                rules: contract::rules_document(&part.rules),
                generators: contract::generators_document(&part.generators),
            });
        }
        Ok(Matcher::with_example(
            MatchingRule::ArrayContains {
                variants: flattened,
            },
            Term::Literal(Value::Array(concrete)),
        ))
    }

    /// Every key of the mapping must satisfy the constraint matchers' rules.
    pub fn each_key(example: impl Into<Term>, constraints: Vec<Matcher>) -> Self {
        Matcher::with_example(
            MatchingRule::EachKey {
                rules: constraints.into_iter().map(|m| m.rule).collect(),
            },
            example,
        )
    }

    /// Every value of the mapping must satisfy the constraint matchers' rules.
    pub fn each_value(example: impl Into<Term>, constraints: Vec<Matcher>) -> Self {
        Matcher::with_example(
            MatchingRule::EachValue {
                rules: constraints.into_iter().map(|m| m.rule).collect(),
            },
            example,
        )
    }

    /// Substitute the concrete value from a provider state parameter during
    /// replay; the explicit example (if any) is still served locally.
    pub fn from_provider_state(mut self, expression: &str) -> Self {
        self.generator = Some(Generator::ProviderState {
            expression: expression.to_string(),
        });
        self
    }

    /// Resolve the term the concrete body is built from: the explicit
    /// example, or one synthesized by the attached generator.
    pub(crate) fn resolve_example(&self) -> Result<Term, crate::error::Error> {
        if let Some(example) = &self.example {
            return Ok(example.clone());
        }
        if let Some(generator) = &self.generator {
            return Ok(Term::Literal(generator.generate()?));
        }
        // Unreachable through the public constructors; every generative
        // matcher either carries an example or a generator.
        Err(crate::error::ConstructionError::MissingExample(self.type_tag().to_string()).into())
    }
}

fn validate_pattern(pattern: &str) -> Result<(), ConstructionError> {
    regex::Regex::new(pattern)
        .map(|_| ())
        .map_err(|e| ConstructionError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
}

fn validate_format(format: &str) -> Result<(), ConstructionError> {
    to_chrono_format(format)
        .map(|_| ())
        .map_err(|e| ConstructionError::InvalidValue(e.to_string()))
}
