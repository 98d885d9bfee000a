// ============================================================================
// Service Routes
// ============================================================================
//
// Endpoints:
// - GET /services/:id - Service with its instances and deployments
// - DELETE /services/:id - Delete a service from one environment
//
// ============================================================================

use axum::{Json, extract::State};
use std::sync::Arc;

use crate::context::AppContext;
use crate::error::AppError;
use crate::projection::ServiceView;
use crate::routes::extractors::{Session, UuidPath, ValidJson};
use crate::validation::DeleteServiceRequest;

/// GET /services/:id
pub async fn get_service(
    State(ctx): State<Arc<AppContext>>,
    Session(token): Session,
    UuidPath(id): UuidPath,
) -> Result<Json<ServiceView>, AppError> {
    let service = ctx.platform.service(&token, id).await?;
    Ok(Json(service.into()))
}

/// DELETE /services/:id
pub async fn delete_service(
    State(ctx): State<Arc<AppContext>>,
    Session(token): Session,
    UuidPath(id): UuidPath,
    ValidJson(body): ValidJson<DeleteServiceRequest>,
) -> Result<Json<bool>, AppError> {
    let environment_id = body.environment_id()?;
    let deleted = ctx.platform.service_delete(&token, id, environment_id).await?;
    tracing::info!(
        service_id = %id,
        environment_id = %environment_id,
        deleted,
        "Service delete forwarded"
    );
    Ok(Json(deleted))
}
