use std::{collections::BTreeMap, time::Duration};

use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, Method, StatusCode},
    routing::any,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

pub const GREETING: &str = "Hello world";

/// What the echo endpoint saw of the incoming request.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Echo {
    pub greeting: String,
    pub headers: BTreeMap<String, String>,
    pub method: String,
    pub username: String,
    pub password: String,
    pub postdata: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/status/{code}", any(status))
        .route("/delay/{ms}", any(delay))
        .route("/redirect/{code}", any(redirect))
        .route("/loop", any(redirect_loop))
        .fallback(echo)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    Json(describe(&method, &headers, &body))
}

async fn status(Path(code): Path<String>) -> (StatusCode, String) {
    match code.parse::<u16>().ok().and_then(|c| StatusCode::from_u16(c).ok()) {
        Some(status) => (status, format!("status {}", status.as_u16())),
        None => (StatusCode::BAD_REQUEST, format!("invalid status {code}")),
    }
}

type Redirect = (StatusCode, [(header::HeaderName, &'static str); 1], String);

/// Answer with `code` and `Location: /landed`.
async fn redirect(Path(code): Path<u16>) -> Result<Redirect, StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    if !status.is_redirection() {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok((status, [(header::LOCATION, "/landed")], format!("redirect {code}")))
}

async fn redirect_loop() -> Redirect {
    (StatusCode::FOUND, [(header::LOCATION, "/loop")], String::new())
}

async fn delay(
    Path(ms): Path<u64>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Echo> {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    Json(describe(&method, &headers, &body))
}

pub fn describe(method: &Method, headers: &HeaderMap, body: &[u8]) -> Echo {
    let mut echo = Echo {
        greeting: GREETING.to_string(),
        method: method.as_str().to_string(),
        postdata: String::from_utf8_lossy(body).into_owned(),
        ..Default::default()
    };

    for name in headers.keys() {
        let values: Vec<&str> = headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        echo.headers
            .insert(canonical_header_name(name.as_str()), values.join(", "));
    }

    if let Some((user, pass)) = basic_auth(headers) {
        echo.username = user;
        echo.password = pass;
    }
    echo
}

/// `test-header` -> `Test-Header`.
pub fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Decode `Authorization: Basic <base64(user:pass)>`.
pub fn basic_auth(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Basic ")?;
    let decoded = String::from_utf8(STANDARD.decode(token.trim()).ok()?).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn canonicalizes_header_names() {
        assert_eq!(canonical_header_name("test-header"), "Test-Header");
        assert_eq!(canonical_header_name("content-type"), "Content-Type");
        assert_eq!(canonical_header_name("x-API-key"), "X-Api-Key");
        assert_eq!(canonical_header_name("accept"), "Accept");
    }

    #[test]
    fn decodes_basic_auth() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dGVzdHVzZXI6dGVzdHBhc3M="),
        );
        assert_eq!(
            basic_auth(&headers),
            Some(("testuser".to_string(), "testpass".to_string()))
        );
    }

    #[test]
    fn ignores_non_basic_authorization() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(basic_auth(&headers), None);
    }

    #[test]
    fn describe_joins_repeated_header_values() {
        let mut headers = HeaderMap::new();
        headers.append("x-mode", HeaderValue::from_static("a"));
        headers.append("x-mode", HeaderValue::from_static("b"));
        let echo = describe(&Method::PATCH, &headers, b"Test data");
        assert_eq!(echo.method, "PATCH");
        assert_eq!(echo.postdata, "Test data");
        assert_eq!(echo.greeting, GREETING);
        assert_eq!(echo.headers["X-Mode"], "a, b");
        assert!(echo.username.is_empty());
    }
}
