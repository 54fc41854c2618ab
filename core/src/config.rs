//! Client configuration.
//!
//! # Design
//! Timeouts are stored as whole milliseconds so the struct (de)serializes to
//! plain numbers and can be embedded in a caller's own config file. Missing
//! fields fall back to the defaults below.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// `log_level` at or above which every outbound request is logged.
pub const VERBOSE_LOG_LEVEL: u8 = 75;

/// Timeouts and logging verbosity for an `HttpClient`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Verbosity of diagnostic output, `0..=100`.
    pub log_level: u8,
    /// Time allowed to open the TCP connection.
    pub connect_timeout_ms: u64,
    /// Time allowed for the TLS handshake once connected.
    pub tls_handshake_timeout_ms: u64,
    /// Total time for the whole call, including reading the body.
    pub receive_timeout_ms: u64,
    /// How long an unused pooled connection is kept.
    pub idle_timeout_ms: u64,
    /// Upper bound on the buffered response body. `None` reads it all.
    pub max_body_bytes: Option<u64>,
    /// Overrides the transport's default `User-Agent`.
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            log_level: 0,
            connect_timeout_ms: 5_000,
            tls_handshake_timeout_ms: 5_000,
            receive_timeout_ms: 60_000,
            idle_timeout_ms: 300_000,
            max_body_bytes: None,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn tls_handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.tls_handshake_timeout_ms)
    }

    pub fn receive_timeout(&self) -> Duration {
        Duration::from_millis(self.receive_timeout_ms)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    /// The transport's connect phase covers both the TCP connect and the TLS
    /// handshake, so it gets the sum of the two budgets.
    pub(crate) fn connect_phase_timeout(&self) -> Duration {
        self.connect_timeout() + self.tls_handshake_timeout()
    }

    pub(crate) fn is_verbose(&self) -> bool {
        self.log_level >= VERBOSE_LOG_LEVEL
    }
}
