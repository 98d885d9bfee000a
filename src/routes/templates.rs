use axum::{Json, extract::State};
use std::sync::Arc;

use crate::context::AppContext;
use crate::error::AppError;
use crate::projection::template_edges;
use crate::routes::extractors::Session;
use crate::upstream::types::{Edge, Template};

/// GET /templates
pub async fn list_templates(
    State(ctx): State<Arc<AppContext>>,
    Session(token): Session,
) -> Result<Json<Vec<Edge<Template>>>, AppError> {
    let templates = ctx.platform.templates(&token).await?;
    Ok(Json(template_edges(templates)))
}
