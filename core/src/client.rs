//! Blocking request executor built on a `ureq` agent.
//!
//! # Design
//! `HttpClient` owns one agent configured from `ClientConfig` and carries no
//! per-request state. Every call runs the same linear pipeline: validate the
//! request, attach headers and Basic auth, dispatch, follow any redirect,
//! drain the body, then classify the status. The response is owned by the call frame, so the
//! connection is released on every exit path.

use std::sync::Arc;

use ureq::http::{header, HeaderName, HeaderValue, Response, Uri};
use ureq::typestate::WithBody;
use ureq::{Body, RequestBuilder};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::http::{Method, Request};
use crate::types::Headers;

/// Redirect hops followed before giving up.
pub const MAX_REDIRECTS: usize = 10;

/// Executes `Request` values and returns the response body.
///
/// Cheap to clone; clones share the agent's connection pool and the
/// configuration.
#[derive(Clone)]
pub struct HttpClient {
    agent: ureq::Agent,
    config: Arc<ClientConfig>,
}

impl HttpClient {
    /// Client with the default timeouts (60s total, 5s connect, 5s TLS).
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        // Status codes and redirects are handled here, not by the transport.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .timeout_global(Some(config.receive_timeout()))
            .timeout_connect(Some(config.connect_phase_timeout()))
            .max_idle_age(config.idle_timeout())
            .build()
            .new_agent();

        Self {
            agent,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn get(&self, url: &str) -> Result<Vec<u8>> {
        self.execute(&Request::get(url))
    }

    pub fn post(&self, url: &str, body: impl Into<Vec<u8>>) -> Result<Vec<u8>> {
        self.execute(&Request::post(url).body(body))
    }

    pub fn put(&self, url: &str, body: impl Into<Vec<u8>>) -> Result<Vec<u8>> {
        self.execute(&Request::put(url).body(body))
    }

    pub fn patch(&self, url: &str, body: impl Into<Vec<u8>>) -> Result<Vec<u8>> {
        self.execute(&Request::patch(url).body(body))
    }

    /// Perform the round trip for `request`, following redirects.
    ///
    /// Returns the full body on a 2xx status. Any other status yields
    /// `ClientError::Status` with the code and the body that was read. A
    /// 301/302/303/307/308 carrying a `Location` is followed (at most
    /// `MAX_REDIRECTS` hops); without one it is returned as a status error.
    pub fn execute(&self, request: &Request) -> Result<Vec<u8>> {
        if self.config.is_verbose() {
            tracing::info!(
                "http {}: {}",
                request.method.as_str().to_ascii_lowercase(),
                request.url
            );
        }

        validate_url(&request.url)?;
        let mut headers = self.outbound_headers(request)?;
        let mut method = request.method;
        let mut url = request.url.clone();
        let mut entity = request.entity();
        let mut redirects = 0;

        loop {
            let mut response = self.dispatch(method, &url, &headers, entity)?;
            let status = response.status().as_u16();

            if let Some(location) = redirect_location(&response) {
                if redirects == MAX_REDIRECTS {
                    return Err(ClientError::Redirect(format!(
                        "stopped after {MAX_REDIRECTS} redirects"
                    )));
                }
                let next = resolve_location(&url, &location)?;
                tracing::debug!("{} {} -> {} redirect to {}", method, url, status, next);

                // 301/302/303 turn the request into a body-less GET.
                if matches!(status, 301 | 302 | 303) && method != Method::Get {
                    method = Method::Get;
                    entity = None;
                }
                if !same_host(&url, &next) {
                    headers.remove("Authorization");
                }
                url = next;
                redirects += 1;
                continue;
            }

            let body = self.read_body(&mut response)?;
            tracing::debug!("{} {} -> {} ({} bytes)", method, url, status, body.len());

            if !(200..300).contains(&status) {
                return Err(ClientError::Status { code: status, body });
            }
            return Ok(body);
        }
    }

    /// Caller headers, then the configured user agent if the caller did not
    /// set one, then Basic auth, which overrides any `Authorization` header.
    fn outbound_headers(&self, request: &Request) -> Result<Headers> {
        let mut headers = request.headers.clone();
        if let Some(agent) = &self.config.user_agent {
            if headers.get("user-agent").is_none() {
                headers.set("User-Agent", agent.as_str());
            }
        }
        if let Some(credentials) = &request.credentials {
            headers.set("Authorization", credentials.authorization()?);
        }
        for (label, value) in headers.iter() {
            validate_header(label, value)?;
        }
        Ok(headers)
    }

    fn dispatch(
        &self,
        method: Method,
        url: &str,
        headers: &Headers,
        entity: Option<&[u8]>,
    ) -> Result<Response<Body>> {
        let result = match method {
            Method::Get => with_headers(self.agent.get(url), headers).call(),
            Method::Post => send(with_headers(self.agent.post(url), headers), entity),
            Method::Put => send(with_headers(self.agent.put(url), headers), entity),
            Method::Patch => send(with_headers(self.agent.patch(url), headers), entity),
        };

        result.map_err(|err| match err {
            ureq::Error::BadUri(msg) => ClientError::RequestConstruction(msg),
            ureq::Error::Http(e) => ClientError::RequestConstruction(e.to_string()),
            other => ClientError::Network(other),
        })
    }

    fn read_body(&self, response: &mut Response<Body>) -> Result<Vec<u8>> {
        let limit = self.config.max_body_bytes.unwrap_or(u64::MAX);
        response
            .body_mut()
            .with_config()
            .limit(limit)
            .read_to_vec()
            .map_err(ClientError::BodyRead)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Execute `request` on a client built just for this call.
pub fn execute(config: &ClientConfig, request: &Request) -> Result<Vec<u8>> {
    HttpClient::with_config(config.clone()).execute(request)
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &Headers) -> RequestBuilder<B> {
    for (label, value) in headers.iter() {
        builder = builder.header(label, value);
    }
    builder
}

fn send(
    builder: RequestBuilder<WithBody>,
    entity: Option<&[u8]>,
) -> std::result::Result<Response<Body>, ureq::Error> {
    match entity {
        Some(bytes) => builder.send(bytes),
        None => builder.send_empty(),
    }
}

/// `Location` of a followable redirect, if `response` is one.
fn redirect_location(response: &Response<Body>) -> Option<String> {
    if !matches!(response.status().as_u16(), 301 | 302 | 303 | 307 | 308) {
        return None;
    }
    let location = response.headers().get(header::LOCATION)?.to_str().ok()?;
    Some(location.to_string())
}

fn resolve_location(current: &str, location: &str) -> Result<String> {
    let next = Url::parse(current)
        .and_then(|base| base.join(location))
        .map_err(|e| ClientError::Redirect(format!("bad Location {location:?}: {e}")))?;
    let next = String::from(next);
    validate_url(&next).map_err(|e| ClientError::Redirect(e.to_string()))?;
    Ok(next)
}

fn same_host(a: &str, b: &str) -> bool {
    match (Url::parse(a), Url::parse(b)) {
        (Ok(a), Ok(b)) => a.host_str() == b.host_str(),
        _ => false,
    }
}

fn validate_url(url: &str) -> Result<()> {
    let uri: Uri = url
        .parse()
        .map_err(|e| ClientError::RequestConstruction(format!("{url}: {e}")))?;

    match uri.scheme_str() {
        Some("http") | Some("https") => {}
        _ => {
            return Err(ClientError::RequestConstruction(format!(
                "{url}: scheme must be http or https"
            )))
        }
    }
    if uri.host().map_or(true, str::is_empty) {
        return Err(ClientError::RequestConstruction(format!("{url}: missing host")));
    }
    Ok(())
}

fn validate_header(label: &str, value: &str) -> Result<()> {
    HeaderName::from_bytes(label.as_bytes())
        .map_err(|e| ClientError::RequestConstruction(format!("header {label:?}: {e}")))?;
    HeaderValue::from_str(value)
        .map_err(|e| ClientError::RequestConstruction(format!("header {label:?} value: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    // Nothing listens on port 1; every test below must fail before dispatch.
    const UNREACHABLE: &str = "http://127.0.0.1:1/ping";

    #[test]
    fn rejects_relative_and_non_http_urls() {
        for url in ["not a url", "/relative/path", "ftp://example.com/file", ""] {
            let err = HttpClient::new().get(url).unwrap_err();
            assert!(
                matches!(err, ClientError::RequestConstruction(_)),
                "{url:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn rejects_invalid_header_label() {
        let req = Request::get(UNREACHABLE).header("Bad Header", "value");
        let err = HttpClient::new().execute(&req).unwrap_err();
        assert!(matches!(err, ClientError::RequestConstruction(_)));
    }

    #[test]
    fn rejects_header_value_with_newline() {
        let req = Request::get(UNREACHABLE).header("X-Test", "line\nbreak");
        let err = HttpClient::new().execute(&req).unwrap_err();
        assert!(matches!(err, ClientError::RequestConstruction(_)));
    }

    #[test]
    fn half_filled_credentials_fail_before_dispatch() {
        let req = Request::patch(UNREACHABLE)
            .body("Test data")
            .basic_auth("testuser", "");
        let err = HttpClient::new().execute(&req).unwrap_err();
        assert!(matches!(err, ClientError::MissingCredentials));
    }

    #[test]
    fn client_keeps_its_config() {
        let config = ClientConfig {
            log_level: 90,
            receive_timeout_ms: 1_000,
            ..Default::default()
        };
        let client = HttpClient::with_config(config.clone());
        assert_eq!(client.config(), &config);
        assert_eq!(client.clone().config(), &config);
    }

    #[test]
    fn relative_location_resolves_against_current_url() {
        let next = resolve_location("http://127.0.0.1:8080/a/b", "/landed").unwrap();
        assert_eq!(next, "http://127.0.0.1:8080/landed");
        let next = resolve_location("http://127.0.0.1:8080/a/b", "c").unwrap();
        assert_eq!(next, "http://127.0.0.1:8080/a/c");
    }

    #[test]
    fn non_http_location_is_a_redirect_error() {
        let err = resolve_location("http://127.0.0.1:8080/", "ftp://example.com/x").unwrap_err();
        assert!(matches!(err, ClientError::Redirect(_)));
    }

    #[test]
    fn host_comparison_ignores_path_and_port() {
        assert!(same_host("http://a.test:1/x", "http://a.test:2/y"));
        assert!(!same_host("http://a.test/x", "http://b.test/x"));
    }

    #[traced_test]
    #[test]
    fn verbose_config_logs_outbound_address() {
        let client = HttpClient::with_config(ClientConfig {
            log_level: 75,
            ..Default::default()
        });
        let req = Request::get(UNREACHABLE).basic_auth("", "");
        let _ = client.execute(&req);
        assert!(logs_contain("http get: http://127.0.0.1:1/ping"));
    }

    #[traced_test]
    #[test]
    fn quiet_config_does_not_log_address() {
        let req = Request::put(UNREACHABLE).basic_auth("", "");
        let _ = HttpClient::new().execute(&req);
        assert!(!logs_contain("http put:"));
    }
}
