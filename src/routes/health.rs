// ============================================================================
// Health Route
// ============================================================================
//
// Endpoints:
// - GET /healthz - Liveness only; the upstream API is not contacted
//
// ============================================================================

/// GET /healthz
pub async fn healthz() -> &'static str {
    "ok"
}
