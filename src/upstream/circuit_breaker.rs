// ============================================================================
// Circuit Breaker
// ============================================================================
//
// Optional guard around the upstream transport. When the platform keeps
// failing, requests are rejected immediately instead of waiting on it.
// It never retries: a rejected request is reported as an upstream failure.
//
// States:
// - Closed: Normal operation, requests pass through
// - Open: Upstream is failing, requests are rejected immediately
// - Half-Open: Testing if upstream recovered, allowing requests through
//
// ============================================================================

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::config::CircuitBreakerConfig;
use crate::upstream::UpstreamError;

/// Circuit breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug)]
struct Inner {
    state: CircuitState,
    failure_count: u32,
    success_count: u32,
    opened_at: Option<Instant>,
}

/// Circuit breaker shared by every request sent through one transport
#[derive(Clone)]
pub struct CircuitBreaker {
    config: Arc<CircuitBreakerConfig>,
    inner: Arc<Mutex<Inner>>,
}

impl CircuitBreaker {
    pub fn new(config: Arc<CircuitBreakerConfig>) -> Self {
        Self {
            config,
            inner: Arc::new(Mutex::new(Inner {
                state: CircuitState::Closed,
                failure_count: 0,
                success_count: 0,
                opened_at: None,
            })),
        }
    }

    /// Check if a request should be allowed
    pub async fn allow_request(&self) -> Result<(), UpstreamError> {
        let mut inner = self.inner.lock().await;

        match inner.state {
            CircuitState::Closed | CircuitState::HalfOpen => Ok(()),
            CircuitState::Open => {
                let timeout = Duration::from_secs(self.config.timeout_secs);
                match inner.opened_at {
                    Some(opened) if opened.elapsed() >= timeout => {
                        inner.state = CircuitState::HalfOpen;
                        inner.success_count = 0;
                        tracing::info!("Circuit breaker transitioning to half-open");
                        Ok(())
                    }
                    _ => Err(UpstreamError::CircuitOpen),
                }
            }
        }
    }

    /// Record a successful request
    pub async fn record_success(&self) {
        let mut inner = self.inner.lock().await;

        match inner.state {
            CircuitState::Closed => {
                inner.failure_count = 0;
            }
            CircuitState::HalfOpen => {
                inner.success_count += 1;
                if inner.success_count >= self.config.success_threshold {
                    inner.state = CircuitState::Closed;
                    inner.failure_count = 0;
                    inner.success_count = 0;
                    inner.opened_at = None;
                    tracing::info!("Circuit breaker closed after successful recovery");
                }
            }
            CircuitState::Open => {}
        }
    }

    /// Record a failed request
    pub async fn record_failure(&self) {
        let mut inner = self.inner.lock().await;

        match inner.state {
            CircuitState::Closed => {
                inner.failure_count += 1;
                if inner.failure_count >= self.config.failure_threshold {
                    inner.state = CircuitState::Open;
                    inner.opened_at = Some(Instant::now());
                    tracing::warn!(
                        failure_count = inner.failure_count,
                        threshold = self.config.failure_threshold,
                        "Circuit breaker opened due to failures"
                    );
                }
            }
            CircuitState::HalfOpen => {
                // Any failure while probing reopens immediately
                inner.state = CircuitState::Open;
                inner.opened_at = Some(Instant::now());
                inner.success_count = 0;
                tracing::warn!("Circuit breaker reopened after failure in half-open state");
            }
            CircuitState::Open => {}
        }
    }

    pub async fn state(&self) -> CircuitState {
        self.inner.lock().await.state
    }
}
