// ============================================================================
// Session Cookie <-> Bearer Token Bridge
// ============================================================================
//
// The session cookie carries the upstream API token itself. This module owns
// the cookie's name and attributes and turns a presented cookie back into the
// bearer token forwarded upstream. Nothing here is persisted: the token lives
// in the browser and in the memory of the request that carries it.
//
// ============================================================================

use axum::http::{HeaderMap, HeaderValue, header::COOKIE};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use crate::config::Config;
use crate::error::AppError;

/// Upstream API token presented by the browser for one request.
///
/// `Debug` is redacted so the token can never end up in a log line.
pub struct BearerToken(SecretString);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Raw token value, for building the upstream `Authorization` header only
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

/// A `Set-Cookie` header value produced by the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieDirective(String);

impl CookieDirective {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_header_value(&self) -> Result<HeaderValue, AppError> {
        HeaderValue::from_str(&self.0)
            .map_err(|_| AppError::internal("session cookie is not a valid header value"))
    }
}

/// Build the directive that stores `api_key` as the session cookie.
///
/// The key must already have passed UUID validation. It is not checked
/// against the upstream API; an unusable key surfaces on the first
/// authenticated call.
pub fn establish_session(config: &Config, api_key: &str) -> CookieDirective {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Strict",
        config.session_cookie_name(),
        api_key
    );
    if config.secure_cookies() {
        cookie.push_str("; Secure");
    }
    CookieDirective(cookie)
}

/// Build the directive that clears the session cookie (same name and path).
/// Valid whether or not the browser currently holds the cookie.
pub fn destroy_session(config: &Config) -> CookieDirective {
    let mut cookie = format!(
        "{}=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
        config.session_cookie_name()
    );
    if config.secure_cookies() {
        cookie.push_str("; Secure");
    }
    CookieDirective(cookie)
}

/// Resolve the bearer token from the request's cookies.
///
/// Presence of a non-empty session cookie is the only check; the upstream API
/// stays the authority on whether the token is still valid.
pub fn require_session(config: &Config, headers: &HeaderMap) -> Result<BearerToken, AppError> {
    read_cookie(headers, config.session_cookie_name())
        .filter(|value| !value.is_empty())
        .map(BearerToken::new)
        .ok_or_else(|| AppError::auth("Unauthorized"))
}

/// Find a cookie by name across every `Cookie` header of the request
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Environment, UpstreamConfig};

    const KEY: &str = "550e8400-e29b-41d4-a716-446655440000";

    fn config(environment: Environment) -> Config {
        Config {
            hostname: "127.0.0.1".to_string(),
            port: 0,
            dashboard_url: "http://localhost:3000".to_string(),
            environment,
            rust_log: "info".to_string(),
            upstream: UpstreamConfig::default(),
        }
    }

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_establish_session_development() {
        let directive = establish_session(&config(Environment::Development), KEY);
        assert_eq!(
            directive.as_str(),
            "railway-key=550e8400-e29b-41d4-a716-446655440000; Path=/; HttpOnly; SameSite=Strict"
        );
    }

    #[test]
    fn test_establish_session_production_is_host_locked_and_secure() {
        let directive = establish_session(&config(Environment::Production), KEY);
        let value = directive.as_str();
        assert!(value.starts_with("__Host-railway-key=550e8400-e29b-41d4-a716-446655440000;"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("SameSite=Strict"));
        assert!(value.contains("Path=/"));
        assert!(value.ends_with("; Secure"));
        assert!(!value.contains("Max-Age"));
        assert!(!value.contains("Expires"));
    }

    #[test]
    fn test_destroy_session_expires_cookie() {
        let directive = destroy_session(&config(Environment::Development));
        let value = directive.as_str();
        assert!(value.starts_with("railway-key=;"));
        assert!(value.contains("Path=/"));
        assert!(value.contains("Max-Age=0"));
    }

    #[test]
    fn test_require_session_reads_token() {
        let cfg = config(Environment::Development);
        let headers = headers_with_cookie(&format!("theme=dark; railway-key={}", KEY));
        let token = require_session(&cfg, &headers).unwrap();
        assert_eq!(token.expose(), KEY);
    }

    #[test]
    fn test_require_session_missing_cookie() {
        let cfg = config(Environment::Development);
        let err = require_session(&cfg, &HeaderMap::new()).unwrap_err();
        assert!(matches!(err, AppError::Auth(_)));
    }

    #[test]
    fn test_require_session_ignores_other_environment_name() {
        // A plain-named cookie must not authenticate a host-locked deployment
        let cfg = config(Environment::Production);
        let headers = headers_with_cookie(&format!("railway-key={}", KEY));
        assert!(require_session(&cfg, &headers).is_err());
    }

    #[test]
    fn test_require_session_rejects_empty_value() {
        let cfg = config(Environment::Development);
        let headers = headers_with_cookie("railway-key=");
        assert!(require_session(&cfg, &headers).is_err());
    }

    #[test]
    fn test_read_cookie_across_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1"));
        headers.append(COOKIE, HeaderValue::from_static("b=2; c=3"));
        assert_eq!(read_cookie(&headers, "c").as_deref(), Some("3"));
        assert_eq!(read_cookie(&headers, "d"), None);
    }

    #[test]
    fn test_bearer_token_debug_is_redacted() {
        let token = BearerToken::new(KEY);
        let debug = format!("{:?}", token);
        assert!(!debug.contains(KEY));
        assert!(debug.contains("REDACTED"));
    }
}
