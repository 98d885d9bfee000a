// ============================================================================
// Upstream Platform API
// ============================================================================
//
// Everything that talks to the platform's GraphQL endpoint:
// - operations.rs: the fixed set of named GraphQL documents
// - types.rs: typed views of the fields those documents select
// - transport.rs: one HTTP round trip carrying the bearer token
// - client.rs: typed operation methods used by the routes
// - circuit_breaker.rs: optional fail-fast guard around the transport
//
// ============================================================================

pub mod circuit_breaker;
pub mod client;
pub mod operations;
pub mod transport;
pub mod types;

use axum::http::StatusCode;
use thiserror::Error;

pub use client::PlatformClient;
pub use transport::{GraphQlRequest, GraphQlTransport, HttpTransport};

/// Failure of a single forwarded upstream call
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream responded with status {0}")]
    Status(StatusCode),

    #[error("upstream returned GraphQL errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("upstream response carried no data")]
    MissingData,

    #[error("upstream response did not match the expected shape: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("circuit breaker is open - upstream is unavailable")]
    CircuitOpen,
}
