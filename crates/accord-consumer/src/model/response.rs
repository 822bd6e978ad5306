//! The provider response the consumer expects back.

use crate::term::Term;

/// An HTTP response description. Status, headers, and body may embed
/// matchers in place of literals.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    status: Term,
    headers: Vec<(String, Vec<Term>)>,
    body: Option<Term>,
    content_type: Option<String>,
}

impl ProviderResponse {
    pub fn new() -> Self {
        ProviderResponse {
            status: Term::from(200u16),
            headers: Vec::new(),
            body: None,
            content_type: None,
        }
    }

    /// Expected status: a literal code or a status-class matcher.
    pub fn status(mut self, status: impl Into<Term>) -> Self {
        self.status = status.into();
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

    pub fn status_ref(&self) -> &Term {
        &self.status
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

impl Default for ProviderResponse {
    fn default() -> Self {
        ProviderResponse::new()
    }
}
