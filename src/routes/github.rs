use axum::{Json, extract::State};
use std::sync::Arc;

use crate::context::AppContext;
use crate::error::AppError;
use crate::routes::extractors::Session;
use crate::upstream::types::GithubRepo;

/// GET /github/repos
pub async fn list_repos(
    State(ctx): State<Arc<AppContext>>,
    Session(token): Session,
) -> Result<Json<Vec<GithubRepo>>, AppError> {
    Ok(Json(ctx.platform.github_repos(&token).await?))
}

/// GET /github/scopes
pub async fn list_scopes(
    State(ctx): State<Arc<AppContext>>,
    Session(token): Session,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(ctx.platform.github_writable_scopes(&token).await?))
}
