// ============================================================================
// Upstream Configuration
// ============================================================================

use anyhow::Context;

use super::parse_var;

const DEFAULT_GRAPHQL_URL: &str = "https://backboard.railway.app/graphql/v2";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Upstream GraphQL API configuration
#[derive(Clone, Debug)]
pub struct UpstreamConfig {
    /// GraphQL endpoint every forwarded operation is sent to
    pub graphql_url: String,
    /// Request timeout applied by the HTTP client (seconds)
    pub timeout_secs: u64,
    pub circuit_breaker: CircuitBreakerConfig,
}

/// Circuit breaker configuration for the upstream client
#[derive(Clone, Debug)]
pub struct CircuitBreakerConfig {
    /// Disabled by default: requests then share no state with each other
    pub enabled: bool,
    /// Consecutive failures before the circuit opens
    pub failure_threshold: u32,
    /// Successes in half-open state before the circuit closes
    pub success_threshold: u32,
    /// How long the circuit stays open before probing again (seconds)
    pub timeout_secs: u64,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            failure_threshold: 5,
            success_threshold: 2,
            timeout_secs: 60,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            circuit_breaker: CircuitBreakerConfig::default(),
        }
    }
}

impl UpstreamConfig {
    pub(crate) fn from_vars<F>(var: &F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = CircuitBreakerConfig::default();

        let graphql_url =
            var("UPSTREAM_GRAPHQL_URL").unwrap_or_else(|| DEFAULT_GRAPHQL_URL.to_string());
        if url::Url::parse(&graphql_url).is_err() {
            anyhow::bail!("UPSTREAM_GRAPHQL_URL is not a valid URL: {}", graphql_url);
        }

        // "TRUE" and "True" are accepted; anything but true/false is not
        let enabled = match var("UPSTREAM_CIRCUIT_BREAKER_ENABLED") {
            Some(value) => value.trim().to_lowercase().parse().with_context(|| {
                format!("UPSTREAM_CIRCUIT_BREAKER_ENABLED has an invalid value: {}", value)
            })?,
            None => defaults.enabled,
        };

        Ok(Self {
            graphql_url,
            timeout_secs: parse_var(var, "UPSTREAM_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            circuit_breaker: CircuitBreakerConfig {
                enabled,
                failure_threshold: parse_var(
                    var,
                    "UPSTREAM_CB_FAILURE_THRESHOLD",
                    defaults.failure_threshold,
                )?,
                success_threshold: parse_var(
                    var,
                    "UPSTREAM_CB_SUCCESS_THRESHOLD",
                    defaults.success_threshold,
                )?,
                timeout_secs: parse_var(var, "UPSTREAM_CB_TIMEOUT_SECS", defaults.timeout_secs)?,
            },
        })
    }
}
