//! Request description handed to the executor.
//!
//! # Design
//! A `Request` is a plain value built with a consuming builder and then
//! passed by reference to `HttpClient::execute`. Executing never mutates it,
//! so nothing leaks from one call into the next.

use std::fmt;

use crate::types::{Credentials, Headers};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
        }
    }

    /// Whether a body set on the request is sent as the entity.
    pub fn carries_body(self) -> bool {
        !matches!(self, Method::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    pub body: Option<Vec<u8>>,
    pub credentials: Option<Credentials>,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            body: None,
            credentials: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::Put, url)
    }

    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(Method::Patch, url)
    }

    /// Set a header; a later call with the same label replaces the value.
    pub fn header(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(label, value);
        self
    }

    /// Merge a whole header set into the request, last write wins.
    pub fn headers<I, L, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (L, V)>,
        L: Into<String>,
        V: Into<String>,
    {
        self.headers.extend(headers);
        self
    }

    /// Attach a body. Ignored when the method is GET.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::new(username, password));
        self
    }

    /// The bytes actually sent as the entity, if any.
    pub(crate) fn entity(&self) -> Option<&[u8]> {
        if self.method.carries_body() {
            self.body.as_deref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_all_parts() {
        let req = Request::patch("http://localhost:3000/item")
            .header("Test-Header", "Test-Value")
            .body("Test data")
            .basic_auth("testuser", "testpass");

        assert_eq!(req.method, Method::Patch);
        assert_eq!(req.url, "http://localhost:3000/item");
        assert_eq!(req.headers.get("test-header"), Some("Test-Value"));
        assert_eq!(req.entity(), Some(&b"Test data"[..]));
        let creds = req.credentials.unwrap();
        assert_eq!(creds.username, "testuser");
        assert_eq!(creds.password, "testpass");
    }

    #[test]
    fn get_ignores_body() {
        let req = Request::get("http://localhost:3000").body("ignored");
        assert!(req.body.is_some());
        assert!(req.entity().is_none());
    }

    #[test]
    fn repeated_header_keeps_last_value() {
        let req = Request::get("http://localhost:3000")
            .headers([("X-Mode", "a"), ("X-Other", "b")])
            .header("x-mode", "c");
        assert_eq!(req.headers.len(), 2);
        assert_eq!(req.headers.get("X-Mode"), Some("c"));
    }

    #[test]
    fn method_names_are_uppercase() {
        let names: Vec<String> = [Method::Get, Method::Post, Method::Put, Method::Patch]
            .iter()
            .map(|m| m.to_string())
            .collect();
        assert_eq!(names, vec!["GET", "POST", "PUT", "PATCH"]);
    }
}
