//! Value trees for request/response bodies, paths, queries, and headers.
//!
//! A `Term` is an arbitrarily nested value where any leaf or substructure may
//! be a [`Matcher`](crate::matcher::Matcher) instead of a literal. Consumers
//! build bodies out of terms; the combinator flattens them into a concrete
//! JSON value plus path-addressed matching rules.

use crate::matcher::Matcher;
use serde_json::Value;

/// A node in a value tree.
///
/// `Object` keeps entries in declaration order so the flattened body and the
/// recorded rule paths are stable across runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// A plain JSON value with no embedded matchers.
    Literal(Value),
    /// An ordered sequence; elements may themselves contain matchers.
    Array(Vec<Term>),
    /// A key/value mapping in declaration order.
    Object(Vec<(String, Term)>),
    /// A matching rule standing in for the value at this position.
    Matcher(Box<Matcher>),
}

impl Term {
    /// Build an object term from key/term pairs, preserving order.
    pub fn object<K, T, I>(entries: I) -> Self
    where
        K: Into<String>,
        T: Into<Term>,
        I: IntoIterator<Item = (K, T)>,
    {
        Term::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build an array term from elements.
    pub fn array<T, I>(elements: I) -> Self
    where
        T: Into<Term>,
        I: IntoIterator<Item = T>,
    {
        Term::Array(elements.into_iter().map(Into::into).collect())
    }

    /// Null literal.
    pub fn null() -> Self {
        Term::Literal(Value::Null)
    }

    /// True when no matcher is embedded anywhere in the tree.
    pub fn is_literal_tree(&self) -> bool {
        match self {
            Term::Literal(_) => true,
            Term::Array(items) => items.iter().all(Term::is_literal_tree),
            Term::Object(entries) => entries.iter().all(|(_, t)| t.is_literal_tree()),
            Term::Matcher(_) => false,
        }
    }
}

impl From<Value> for Term {
    fn from(value: Value) -> Self {
        Term::Literal(value)
    }
}

impl From<Matcher> for Term {
    fn from(matcher: Matcher) -> Self {
        Term::Matcher(Box::new(matcher))
    }
}

impl From<&str> for Term {
    fn from(value: &str) -> Self {
        Term::Literal(Value::String(value.to_string()))
    }
}

impl From<String> for Term {
    fn from(value: String) -> Self {
        Term::Literal(Value::String(value))
    }
}

impl From<bool> for Term {
    fn from(value: bool) -> Self {
        Term::Literal(Value::Bool(value))
    }
}

impl From<i64> for Term {
    fn from(value: i64) -> Self {
        Term::Literal(Value::from(value))
    }
}

impl From<u16> for Term {
    fn from(value: u16) -> Self {
        Term::Literal(Value::from(value))
    }
}

impl From<f64> for Term {
    fn from(value: f64) -> Self {
        Term::Literal(Value::from(value))
    }
}
