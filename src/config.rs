use anyhow::{Context, Result};
use std::str::FromStr;
use url::Url;

mod upstream;

pub use upstream::{CircuitBreakerConfig, UpstreamConfig};

// ============================================================================
// Configuration Constants
// ============================================================================

const DEFAULT_HOSTNAME: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 4000;
const DEFAULT_RUST_LOG: &str = "info";

/// Session cookie name used in development (plain HTTP on localhost)
pub const DEV_SESSION_COOKIE_NAME: &str = "railway-key";
/// Session cookie name used everywhere else. The `__Host-` prefix makes the
/// browser reject the cookie unless it is Secure, host-only and Path=/.
pub const HOST_SESSION_COOKIE_NAME: &str = "__Host-railway-key";

/// CORS preflight cache lifetime (one week)
pub const CORS_MAX_AGE_SECS: u64 = 604_800;

// ============================================================================
// Configuration Structures
// ============================================================================

/// Runtime mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            _ => anyhow::bail!(
                "Invalid environment: {}. Must be 'development', 'production' or 'test'",
                s
            ),
        }
    }
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Host to bind the HTTP listener to
    pub hostname: String,
    pub port: u16,
    /// Dashboard URL. Used as the single allowed CORS origin and as the
    /// redirect target after login/logout.
    pub dashboard_url: String,
    pub environment: Environment,
    pub rust_log: String,
    pub upstream: UpstreamConfig,
}

/// Parse an optional variable, falling back to `default` only when unset.
/// A value that is set but does not parse is an error.
pub(crate) fn parse_var<T, F>(var: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", key, value)),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dashboard_url = var("DASHBOARD_URL").context("DASHBOARD_URL must be set")?;
        Url::parse(&dashboard_url)
            .with_context(|| format!("DASHBOARD_URL is not a valid URL: {}", dashboard_url))?;

        let environment = match var("NODE_ENV").or_else(|| var("APP_ENV")) {
            Some(value) => value.parse()?,
            None => Environment::Development,
        };

        Ok(Self {
            hostname: var("HOSTNAME").unwrap_or_else(|| DEFAULT_HOSTNAME.to_string()),
            port: parse_var(&var, "PORT", DEFAULT_PORT)?,
            dashboard_url,
            environment,
            rust_log: var("RUST_LOG").unwrap_or_else(|| DEFAULT_RUST_LOG.to_string()),
            upstream: UpstreamConfig::from_vars(&var)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }

    /// Origin (scheme://host[:port]) of the dashboard, as browsers send it in
    /// the `Origin` header.
    pub fn dashboard_origin(&self) -> String {
        match Url::parse(&self.dashboard_url) {
            Ok(url) => url.origin().ascii_serialization(),
            Err(_) => self.dashboard_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn session_cookie_name(&self) -> &'static str {
        if self.environment.is_development() {
            DEV_SESSION_COOKIE_NAME
        } else {
            HOST_SESSION_COOKIE_NAME
        }
    }

    pub fn secure_cookies(&self) -> bool {
        self.environment.is_production()
    }
}
