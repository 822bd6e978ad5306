//! Flattening value trees into concrete values plus path-addressed rules.
//!
//! Depth-first traversal keeps the current json path. A matcher node records
//! a rule entry at the current path, then its example is expanded *at the
//! same path*, so matchers nested inside examples compose: the innermost
//! matcher wins for value production while every rule on the path is
//! recorded. Bounded-array rules expand their element example under a `[*]`
//! wildcard and replicate the result; plain sequences recurse per index.

use crate::error::Error;
use crate::generator::Generator;
use crate::matcher::MatchingRule;
use crate::term::Term;
use serde_json::{Map, Value};

/// A matching rule addressed at a json path.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEntry {
    pub path: String,
    pub rule: MatchingRule,
}

/// A generator addressed at a json path.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorEntry {
    pub path: String,
    pub generator: Generator,
}

/// The output of flattening one value tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Flattened {
    pub value: Value,
    pub rules: Vec<RuleEntry>,
    pub generators: Vec<GeneratorEntry>,
}

/// Flatten `term` with rule paths rooted at `root` (e.g. `$` or `$.body`).
pub fn flatten(term: &Term, root: &str) -> Result<Flattened, Error> {
    let mut rules = Vec::new();
    let mut generators = Vec::new();
    let value = walk(term, root, &mut rules, &mut generators)?;
    Ok(Flattened {
        value,
        rules,
        generators,
    })
}

fn walk(
    term: &Term,
    path: &str,
    rules: &mut Vec<RuleEntry>,
    generators: &mut Vec<GeneratorEntry>,
) -> Result<Value, Error> {
    match term {
        Term::Literal(value) => Ok(value.clone()),
        Term::Object(entries) => {
            let mut object = Map::new();
            for (key, child) in entries {
                let value = walk(child, &child_path(path, key), rules, generators)?;
                object.insert(key.clone(), value);
            }
            Ok(Value::Object(object))
        }
        Term::Array(items) => {
            let mut array = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                array.push(walk(item, &format!("{path}[{index}]"), rules, generators)?);
            }
            Ok(Value::Array(array))
        }
        Term::Matcher(matcher) => {
            rules.push(RuleEntry {
                path: path.to_string(),
                rule: matcher.rule().clone(),
            });
            if let Some(generator) = matcher.generator() {
                generators.push(GeneratorEntry {
                    path: path.to_string(),
                    generator: generator.clone(),
                });
            }

            let example = matcher.resolve_example()?;
            match matcher.rule().concrete_copies() {
                Some(copies) => {
                    // One element example stands for every element.
                    let element = walk(&example, &format!("{path}[*]"), rules, generators)?;
                    Ok(Value::Array(vec![element; copies]))
                }
                None => walk(&example, path, rules, generators),
            }
        }
    }
}

/// Extend a path by an object key: dotted for plain keys, bracket-quoted
/// otherwise.
pub(crate) fn child_path(path: &str, key: &str) -> String {
    let plain = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if plain {
        format!("{path}.{key}")
    } else {
        format!("{path}['{key}']")
    }
}
