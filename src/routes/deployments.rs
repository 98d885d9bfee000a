// ============================================================================
// Deployment Routes
// ============================================================================
//
// Endpoints:
// - DELETE /deployments/:id - Remove a deployment
// - GET /deployments/:id/logs - Runtime log lines of a deployment
// - POST /deployments/:id/cancel - Cancel an in-progress deployment
// - POST /deployments/:id/restart - Restart a deployment
//
// ============================================================================

use axum::{Json, extract::State};
use std::sync::Arc;

use crate::context::AppContext;
use crate::error::AppError;
use crate::routes::extractors::{Session, UuidPath};
use crate::upstream::types::LogLine;

/// DELETE /deployments/:id
pub async fn remove_deployment(
    State(ctx): State<Arc<AppContext>>,
    Session(token): Session,
    UuidPath(id): UuidPath,
) -> Result<Json<bool>, AppError> {
    let removed = ctx.platform.deployment_remove(&token, id).await?;
    tracing::info!(deployment_id = %id, removed, "Deployment remove forwarded");
    Ok(Json(removed))
}

/// GET /deployments/:id/logs
pub async fn deployment_logs(
    State(ctx): State<Arc<AppContext>>,
    Session(token): Session,
    UuidPath(id): UuidPath,
) -> Result<Json<Vec<LogLine>>, AppError> {
    Ok(Json(ctx.platform.deployment_logs(&token, id).await?))
}

/// POST /deployments/:id/cancel
pub async fn cancel_deployment(
    State(ctx): State<Arc<AppContext>>,
    Session(token): Session,
    UuidPath(id): UuidPath,
) -> Result<Json<bool>, AppError> {
    let cancelled = ctx.platform.deployment_cancel(&token, id).await?;
    tracing::info!(deployment_id = %id, cancelled, "Deployment cancel forwarded");
    Ok(Json(cancelled))
}

/// POST /deployments/:id/restart
pub async fn restart_deployment(
    State(ctx): State<Arc<AppContext>>,
    Session(token): Session,
    UuidPath(id): UuidPath,
) -> Result<Json<bool>, AppError> {
    let restarted = ctx.platform.deployment_restart(&token, id).await?;
    tracing::info!(deployment_id = %id, restarted, "Deployment restart forwarded");
    Ok(Json(restarted))
}
