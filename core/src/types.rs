//! Header and credential values attached to a request.
//!
//! # Design
//! `Headers` keeps insertion order but has set semantics: setting a label
//! that is already present (compared ASCII case-insensitively, as HTTP does)
//! replaces the earlier value in place. The transport therefore only ever
//! sees one value per label.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{ClientError, Result};

/// Ordered header list where the last write for a label wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `label` to `value`, overwriting any earlier value for that label.
    pub fn set(&mut self, label: impl Into<String>, value: impl Into<String>) {
        let label = label.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&label))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(label))
            .map(|(_, value)| value.as_str())
    }

    /// Drop `label` if present.
    pub fn remove(&mut self, label: &str) {
        self.entries
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(label));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }
}

impl<L, V> FromIterator<(L, V)> for Headers
where
    L: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (L, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        headers.extend(iter);
        headers
    }
}

impl<L, V> Extend<(L, V)> for Headers
where
    L: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (L, V)>>(&mut self, iter: I) {
        for (label, value) in iter {
            self.set(label, value);
        }
    }
}

/// Username and password for HTTP Basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Value for the `Authorization` header.
    ///
    /// Both fields must be non-empty; otherwise the call is rejected with
    /// `MissingCredentials` rather than silently sent unauthenticated.
    pub fn authorization(&self) -> Result<String> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(ClientError::MissingCredentials);
        }
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        Ok(format!("Basic {token}"))
    }
}

// Keep passwords out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
