// ============================================================================
// Session Routes
// ============================================================================
//
// Endpoints:
// - POST /sessions - Store the API key as the session cookie, redirect
// - GET /sessions - Current user and their projects
// - GET /sessions/destroy - Clear the session cookie, redirect
//
// ============================================================================

use axum::{
    Json,
    extract::State,
    http::{
        StatusCode,
        header::{LOCATION, SET_COOKIE},
    },
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::config::Config;
use crate::context::AppContext;
use crate::error::AppError;
use crate::projection::SessionView;
use crate::routes::extractors::{Session, ValidForm};
use crate::session::{CookieDirective, destroy_session, establish_session};
use crate::validation::LoginForm;

/// POST /sessions
pub async fn create_session(
    State(ctx): State<Arc<AppContext>>,
    ValidForm(form): ValidForm<LoginForm>,
) -> Result<Response, AppError> {
    let api_key = form.into_api_key()?;
    let cookie = establish_session(&ctx.config, &api_key);

    tracing::debug!("Session established");
    redirect_to_dashboard(&ctx.config, &cookie)
}

/// GET /sessions
pub async fn get_session(
    State(ctx): State<Arc<AppContext>>,
    Session(token): Session,
) -> Result<Json<SessionView>, AppError> {
    let me = ctx.platform.me(&token).await?;
    Ok(Json(me.into()))
}

/// GET /sessions/destroy
pub async fn destroy(State(ctx): State<Arc<AppContext>>) -> Result<Response, AppError> {
    let cookie = destroy_session(&ctx.config);
    redirect_to_dashboard(&ctx.config, &cookie)
}

/// 302 to the dashboard carrying one `Set-Cookie`
fn redirect_to_dashboard(config: &Config, cookie: &CookieDirective) -> Result<Response, AppError> {
    let location = axum::http::HeaderValue::from_str(&config.dashboard_url)
        .map_err(|_| AppError::internal("dashboard URL is not a valid header value"))?;

    Ok((
        StatusCode::FOUND,
        [(LOCATION, location), (SET_COOKIE, cookie.to_header_value()?)],
    )
        .into_response())
}
