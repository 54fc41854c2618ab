//! Blocking HTTP request executor with timeouts, headers and Basic auth.
//!
//! # Overview
//! Describe a call as a `Request` (method, URL, headers, optional body,
//! optional credentials), hand it to `HttpClient::execute`, and get back the
//! full response body or a `ClientError` naming the step that failed.
//!
//! # Design
//! - One pipeline for every verb; `Method` selects the transport call.
//! - `Request` is an immutable value, never reused by the client.
//! - `HttpClient` holds only the agent and `ClientConfig`, so it can be
//!   cloned and shared across threads.
//! - Statuses outside `200..300` are errors; the body is kept on the error.
//!
//! ```no_run
//! use webclient_core::{HttpClient, Request};
//!
//! let client = HttpClient::new();
//! let body = client.execute(
//!     &Request::patch("http://localhost:3000/item")
//!         .header("Test-Header", "Test-Value")
//!         .body("Test data")
//!         .basic_auth("testuser", "testpass"),
//! )?;
//! assert!(!body.is_empty());
//! # Ok::<(), webclient_core::ClientError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use client::{execute, HttpClient, MAX_REDIRECTS};
pub use config::{ClientConfig, VERBOSE_LOG_LEVEL};
pub use error::{ClientError, Result};
pub use http::{Method, Request};
pub use types::{Credentials, Headers};
