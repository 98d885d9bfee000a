// ============================================================================
// Project Routes
// ============================================================================
//
// Endpoints:
// - POST /projects - Create an empty project
// - GET /projects/:id - Project with environments and services
// - POST /project/:id/services - Create a service in a project
// - POST /project/:id/deploy-template - Deploy a template into a project
//
// ============================================================================

use axum::{Json, extract::State};
use std::sync::Arc;

use crate::context::AppContext;
use crate::error::AppError;
use crate::projection::{CreatedProjectView, CreatedServiceView, ProjectView, TemplateDeployView};
use crate::routes::extractors::{Session, UuidPath, ValidJson};
use crate::validation::{CreateServiceRequest, DeployTemplateRequest};

/// POST /projects
pub async fn create_project(
    State(ctx): State<Arc<AppContext>>,
    Session(token): Session,
) -> Result<Json<CreatedProjectView>, AppError> {
    let project = ctx.platform.project_create(&token).await?;
    tracing::info!(project_id = %project.id, "Project created");
    Ok(Json(project.into()))
}

/// GET /projects/:id
pub async fn get_project(
    State(ctx): State<Arc<AppContext>>,
    Session(token): Session,
    UuidPath(id): UuidPath,
) -> Result<Json<ProjectView>, AppError> {
    let project = ctx.platform.project(&token, id).await?;
    Ok(Json(project.into()))
}

/// POST /project/:id/services
pub async fn create_service(
    State(ctx): State<Arc<AppContext>>,
    Session(token): Session,
    UuidPath(project_id): UuidPath,
    ValidJson(body): ValidJson<CreateServiceRequest>,
) -> Result<Json<CreatedServiceView>, AppError> {
    let input = body.into_input(project_id)?;
    let service = ctx.platform.service_create(&token, input).await?;
    tracing::info!(
        project_id = %project_id,
        service_id = %service.id,
        "Service created"
    );
    Ok(Json(service.into()))
}

/// POST /project/:id/deploy-template
pub async fn deploy_template(
    State(ctx): State<Arc<AppContext>>,
    Session(token): Session,
    UuidPath(project_id): UuidPath,
    ValidJson(body): ValidJson<DeployTemplateRequest>,
) -> Result<Json<TemplateDeployView>, AppError> {
    let input = body.into_input(project_id)?;
    let template_code = input.template_code.clone();
    let payload = ctx.platform.template_deploy(&token, input).await?;
    tracing::info!(
        project_id = %project_id,
        template_code = %template_code,
        "Template deployed"
    );
    Ok(Json(payload.into()))
}
