//! Error types for the request executor.
//!
//! # Design
//! Each variant names the pipeline step that failed, so callers can tell a
//! bad request apart from an unreachable host or a refusing server. Transport
//! failures keep the underlying `ureq::Error` as their source. Non-2xx
//! responses land in `Status` with the raw code and the body that was read.

/// Errors returned by `HttpClient::execute` and friends.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The address or a header could not be turned into a valid request.
    #[error("invalid request: {0}")]
    RequestConstruction(String),

    /// Credentials were attached but the username or password is empty.
    #[error("no credentials provided for http request with authentication")]
    MissingCredentials,

    /// The round trip could not complete (refused, DNS, TLS, timeout).
    #[error("network error: {0}")]
    Network(#[source] ureq::Error),

    /// A redirect could not be followed (bad `Location`, too many hops).
    #[error("redirect failed: {0}")]
    Redirect(String),

    /// The response body could not be read to the end.
    #[error("failed to read response body: {0}")]
    BodyRead(#[source] ureq::Error),

    /// The server answered with a status outside `200..300`.
    #[error("non-successful status code received [{code}]")]
    Status { code: u16, body: Vec<u8> },
}

impl ClientError {
    /// The HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// True when the failure happened before or during the round trip and
    /// no response was obtained.
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;
