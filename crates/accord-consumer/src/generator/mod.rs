//! Example-value generation strategies.
//!
//! A generator is attached to a matcher when the consumer supplies no literal
//! example: the rule stays abstract in the contract while the generator
//! produces the concrete value the mock protocol needs. Generators are
//! immutable once constructed and serialize to `{ "type": <kind>,
//! ...parameters }` fragments in the persisted contract.

mod format;

pub use format::to_chrono_format;

use crate::error::GenerationError;
use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::{Map, Value};

/// Relative date/time expressions: `+1 day`, `- 2 hours`, `now`.
static EXPRESSION: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^([+-])\s*(\d+)\s*(second|minute|hour|day|week|month|year)s?$")
        .unwrap()
});

/// UUID rendering for the `Uuid` generator kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UuidFormat {
    Simple,
    LowerCaseHyphenated,
    UpperCaseHyphenated,
    Urn,
}

impl UuidFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            UuidFormat::Simple => "simple",
            UuidFormat::LowerCaseHyphenated => "lower-case-hyphenated",
            UuidFormat::UpperCaseHyphenated => "upper-case-hyphenated",
            UuidFormat::Urn => "URN",
        }
    }
}

/// A named strategy for producing an example value.
#[derive(Debug, Clone, PartialEq)]
pub enum Generator {
    /// Random integer within inclusive bounds.
    RandomInt { min: i64, max: i64 },
    /// Random decimal with the given number of significant digits.
    RandomDecimal { digits: u32 },
    /// Random hexadecimal string of the given length.
    RandomHexadecimal { digits: u32 },
    /// Random alphanumeric string of the given length.
    RandomString { size: u32 },
    /// Random string conforming to a regular expression.
    Regex { regex: String },
    /// Random version 4 UUID.
    Uuid { format: Option<UuidFormat> },
    /// Random boolean.
    RandomBoolean,
    /// Calendar date, optionally offset from now by an expression.
    Date {
        format: Option<String>,
        expression: Option<String>,
    },
    /// Wall-clock time, optionally offset from now by an expression.
    Time {
        format: Option<String>,
        expression: Option<String>,
    },
    /// Combined date and time, optionally offset from now by an expression.
    DateTime {
        format: Option<String>,
        expression: Option<String>,
    },
    /// Value substituted from a provider state parameter during replay.
    ProviderState { expression: String },
}

impl Generator {
    /// The kind tag used in the generators fragment of the contract.
    pub fn kind(&self) -> &'static str {
        match self {
            Generator::RandomInt { .. } => "RandomInt",
            Generator::RandomDecimal { .. } => "RandomDecimal",
            Generator::RandomHexadecimal { .. } => "RandomHexadecimal",
            Generator::RandomString { .. } => "RandomString",
            Generator::Regex { .. } => "Regex",
            Generator::Uuid { .. } => "Uuid",
            Generator::RandomBoolean => "RandomBoolean",
            Generator::Date { .. } => "Date",
            Generator::Time { .. } => "Time",
            Generator::DateTime { .. } => "DateTime",
            Generator::ProviderState { .. } => "ProviderState",
        }
    }

    /// Strategy parameters, serialized alongside the kind tag.
    pub fn parameters(&self) -> Map<String, Value> {
        let mut params = Map::new();
        match self {
            Generator::RandomInt { min, max } => {
                params.insert("min".to_string(), Value::from(*min));
                params.insert("max".to_string(), Value::from(*max));
            }
            Generator::RandomDecimal { digits } | Generator::RandomHexadecimal { digits } => {
                params.insert("digits".to_string(), Value::from(*digits));
            }
            Generator::RandomString { size } => {
                params.insert("size".to_string(), Value::from(*size));
            }
            Generator::Regex { regex } => {
                params.insert("regex".to_string(), Value::from(regex.clone()));
            }
            Generator::Uuid { format } => {
                if let Some(format) = format {
                    params.insert("format".to_string(), Value::from(format.as_str()));
                }
            }
            Generator::RandomBoolean => {}
            Generator::Date { format, expression }
            | Generator::Time { format, expression }
            | Generator::DateTime { format, expression } => {
                if let Some(format) = format {
                    params.insert("format".to_string(), Value::from(format.clone()));
                }
                if let Some(expression) = expression {
                    params.insert("expression".to_string(), Value::from(expression.clone()));
                }
            }
            Generator::ProviderState { expression } => {
                params.insert("expression".to_string(), Value::from(expression.clone()));
            }
        }
        params
    }

    /// Produce a concrete example value.
    pub fn generate(&self) -> Result<Value, GenerationError> {
        self.generate_with(&mut rand::thread_rng(), Utc::now())
    }

    /// Produce a concrete example value with an explicit random source and
    /// time base. Date/time kinds are deterministic given the base.
    pub fn generate_with<R: Rng>(
        &self,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<Value, GenerationError> {
        match self {
            Generator::RandomInt { min, max } => {
                if min > max {
                    return Err(GenerationError::ContradictoryBounds {
                        min: *min,
                        max: *max,
                    });
                }
                Ok(Value::from(rng.gen_range(*min..=*max)))
            }
            Generator::RandomDecimal { digits } => Ok(Value::from(random_decimal(*digits, rng))),
            Generator::RandomHexadecimal { digits } => {
                const HEX: &[u8] = b"0123456789ABCDEF";
                let value: String = (0..*digits)
                    .map(|_| HEX[rng.gen_range(0..HEX.len())] as char)
                    .collect();
                Ok(Value::from(value))
            }
            Generator::RandomString { size } => {
                let value: String = (0..*size)
                    .map(|_| char::from(rng.sample(Alphanumeric)))
                    .collect();
                Ok(Value::from(value))
            }
            Generator::Regex { regex } => {
                // Anchors constrain matching, not sampling; the distribution
                // compiler rejects them.
                let trimmed = regex.strip_prefix('^').unwrap_or(regex);
                let trimmed = trimmed.strip_suffix('$').unwrap_or(trimmed);
                let dist = rand_regex::Regex::compile(trimmed, 10).map_err(|e| {
                    GenerationError::UnsampleablePattern {
                        pattern: regex.clone(),
                        reason: e.to_string(),
                    }
                })?;
                let value: String = rng.sample(&dist);
                Ok(Value::from(value))
            }
            Generator::Uuid { format } => {
                let id = uuid::Uuid::new_v4();
                let value = match format.unwrap_or(UuidFormat::LowerCaseHyphenated) {
                    UuidFormat::Simple => id.simple().to_string(),
                    UuidFormat::LowerCaseHyphenated => id.hyphenated().to_string(),
                    UuidFormat::UpperCaseHyphenated => id.hyphenated().to_string().to_uppercase(),
                    UuidFormat::Urn => id.urn().to_string(),
                };
                Ok(Value::from(value))
            }
            Generator::RandomBoolean => Ok(Value::from(rng.gen::<bool>())),
            Generator::Date { format, expression } => {
                let base = apply_expression(now, expression.as_deref())?;
                let format = to_chrono_format(format.as_deref().unwrap_or("yyyy-MM-dd"))?;
                Ok(Value::from(base.format(&format).to_string()))
            }
            Generator::Time { format, expression } => {
                let base = apply_expression(now, expression.as_deref())?;
                let format = to_chrono_format(format.as_deref().unwrap_or("HH:mm:ss"))?;
                Ok(Value::from(base.format(&format).to_string()))
            }
            Generator::DateTime { format, expression } => {
                let base = apply_expression(now, expression.as_deref())?;
                let format =
                    to_chrono_format(format.as_deref().unwrap_or("yyyy-MM-dd'T'HH:mm:ss"))?;
                Ok(Value::from(base.format(&format).to_string()))
            }
            // Resolved from provider state parameters during replay; the
            // expression itself stands in locally.
            Generator::ProviderState { expression } => Ok(Value::from(expression.clone())),
        }
    }
}

/// Offset `now` by a relative expression such as `+1 day`. `now`, `today`,
/// and an absent expression leave the base unchanged.
fn apply_expression(
    now: DateTime<Utc>,
    expression: Option<&str>,
) -> Result<DateTime<Utc>, GenerationError> {
    let expression = match expression {
        None => return Ok(now),
        Some(e) => e.trim(),
    };
    if expression.is_empty() || expression == "now" || expression == "today" {
        return Ok(now);
    }

    let captures = EXPRESSION.captures(expression).ok_or_else(|| {
        GenerationError::UnsupportedFormatToken(expression.to_string())
    })?;
    let amount: i64 = captures[2].parse().map_err(|_| {
        GenerationError::UnsupportedFormatToken(expression.to_string())
    })?;
    let amount = if &captures[1] == "-" { -amount } else { amount };
    let offset = match &captures[3] {
        "second" => Duration::seconds(amount),
        "minute" => Duration::minutes(amount),
        "hour" => Duration::hours(amount),
        "day" => Duration::days(amount),
        "week" => Duration::weeks(amount),
        "month" => Duration::days(30 * amount),
        _ => Duration::days(365 * amount),
    };
    Ok(now + offset)
}

fn random_decimal<R: Rng>(digits: u32, rng: &mut R) -> f64 {
    let digits = digits.clamp(2, 15) as usize;
    let mut raw = String::with_capacity(digits + 1);
    raw.push(char::from(b'1' + rng.gen_range(0..9u8)));
    for _ in 1..digits {
        raw.push(char::from(b'0' + rng.gen_range(0..10u8)));
    }
    // Keep two fractional digits so the value reads as a decimal, not an int.
    raw.insert(digits - 2, '.');
    raw.parse().unwrap_or(0.0)
}
