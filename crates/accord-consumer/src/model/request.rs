//! The consumer's description of the request it will send.

use crate::term::Term;

/// An HTTP request description. Path, query values, headers, and body may all
/// embed matchers in place of literals.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumerRequest {
    method: String,
    path: Term,
    query: Vec<(String, Vec<Term>)>,
    headers: Vec<(String, Vec<Term>)>,
    body: Option<Term>,
    content_type: Option<String>,
}

impl ConsumerRequest {
    pub fn new() -> Self {
        ConsumerRequest {
            method: "GET".to_string(),
            path: Term::from("/"),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            content_type: None,
        }
    }

    pub fn method(mut self, method: &str) -> Self {
        self.method = method.to_uppercase();
        self
    }

    pub fn path(mut self, path: impl Into<Term>) -> Self {
        self.path = path.into();
        self
    }

    /// Declare a query parameter with one or more values.
    ///
    /// Every declared value is recorded in the contract and introspectable
    /// via the raw query, but an engine-side single-value accessor observes
    /// only the last one. That asymmetry is the wrapped engine's HTTP
    /// semantics and is preserved here as-is.
    pub fn add_query_parameter<T, I>(mut self, key: &str, values: I) -> Self
    where
        T: Into<Term>,
        I: IntoIterator<Item = T>,
    {
        let values: Vec<Term> = values.into_iter().map(Into::into).collect();
        if let Some(entry) = self.query.iter_mut().find(|(k, _)| k == key) {
            entry.1.extend(values);
        } else {
            self.query.push((key.to_string(), values));
        }
        self
    }

    /// Declare a header value; repeated calls for the same name accumulate.
    pub fn add_header(mut self, name: &str, value: impl Into<Term>) -> Self {
        if let Some(entry) = self.headers.iter_mut().find(|(n, _)| n == name) {
            entry.1.push(value.into());
        } else {
            self.headers.push((name.to_string(), vec![value.into()]));
        }
        self
    }

    pub fn body(mut self, body: impl Into<Term>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }

    pub fn method_ref(&self) -> &str {
        &self.method
    }

    pub fn path_ref(&self) -> &Term {
        &self.path
    }

    pub fn query_ref(&self) -> &[(String, Vec<Term>)] {
        &self.query
    }

    pub fn headers_ref(&self) -> &[(String, Vec<Term>)] {
        &self.headers
    }

    pub fn body_ref(&self) -> Option<&Term> {
        self.body.as_ref()
    }

    /// Effective body content type; JSON unless overridden.
    pub fn content_type_ref(&self) -> &str {
        self.content_type.as_deref().unwrap_or("application/json")
    }
}

impl Default for ConsumerRequest {
    fn default() -> Self {
        ConsumerRequest::new()
    }
}
