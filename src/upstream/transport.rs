// ============================================================================
// GraphQL Transport
// ============================================================================
//
// Sends one GraphQL operation to the platform with the caller's bearer token
// and returns the `data` object. There is no retry: each call is a single
// request/response exchange, and any failure is returned to the route, which
// logs it once as `AppError::Upstream`.
//
// ============================================================================

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::config::UpstreamConfig;
use crate::session::BearerToken;
use crate::upstream::UpstreamError;
use crate::upstream::circuit_breaker::CircuitBreaker;
use crate::upstream::operations::Operation;

/// Body of a GraphQL HTTP request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest {
    pub query: &'static str,
    pub operation_name: &'static str,
    pub variables: Value,
}

impl GraphQlRequest {
    pub fn new(operation: Operation, variables: Value) -> Self {
        Self {
            query: operation.document,
            operation_name: operation.name,
            variables,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphQlErrorMessage>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorMessage {
    message: String,
}

/// One upstream round trip. Implemented over HTTP in production and by
/// in-memory fakes in tests.
#[async_trait]
pub trait GraphQlTransport: Send + Sync {
    async fn execute(
        &self,
        token: &BearerToken,
        request: GraphQlRequest,
    ) -> Result<Value, UpstreamError>;
}

/// HTTP transport to the platform GraphQL endpoint
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    breaker: Option<CircuitBreaker>,
}

impl HttpTransport {
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .tcp_keepalive(Duration::from_secs(30))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        let breaker = config
            .circuit_breaker
            .enabled
            .then(|| CircuitBreaker::new(Arc::new(config.circuit_breaker.clone())));

        Ok(Self {
            client,
            endpoint: config.graphql_url.clone(),
            breaker,
        })
    }

    async fn send(&self, token: &BearerToken, request: &GraphQlRequest) -> Result<Value, UpstreamError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token.expose())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let bytes = response.bytes().await?;
        let body: GraphQlResponse = serde_json::from_slice(&bytes)?;

        if let Some(errors) = body.errors.filter(|errors| !errors.is_empty()) {
            return Err(UpstreamError::GraphQl(
                errors.into_iter().map(|e| e.message).collect(),
            ));
        }

        match body.data {
            Some(Value::Null) | None => Err(UpstreamError::MissingData),
            Some(data) => Ok(data),
        }
    }
}

#[async_trait]
impl GraphQlTransport for HttpTransport {
    async fn execute(
        &self,
        token: &BearerToken,
        request: GraphQlRequest,
    ) -> Result<Value, UpstreamError> {
        if let Some(breaker) = &self.breaker {
            breaker.allow_request().await?;
        }

        let result = self.send(token, &request).await;

        if let Some(breaker) = &self.breaker {
            match &result {
                // Only an unreachable or erroring platform counts against it
                Err(UpstreamError::Transport(_)) => breaker.record_failure().await,
                Err(UpstreamError::Status(status)) if status.is_server_error() => {
                    breaker.record_failure().await
                }
                _ => breaker.record_success().await,
            }
        }

        result
    }
}
